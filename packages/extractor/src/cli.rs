//! Command-line interface for the extractor.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{CsvQuoting, Settings, DEFAULT_SETTINGS_FILE};
use crate::convert::{ConversionReport, LayerConverter};
use crate::error::Result;
use crate::extractor::{Extractor, RunMode, RunSummary};
use crate::logging::{init_logging, LogTarget};

/// CopData extractor - Download map-service layers and convert them to CSV.
#[derive(Parser)]
#[command(name = "copdata-extractor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the commands that read the settings file.
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Settings file (default: extractor.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Layer specification overriding the settings file (e.g., 1-5,8)
    #[arg(short, long)]
    pub layers: Option<String>,
}

impl SettingsArgs {
    fn load(&self) -> Result<Settings> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        let settings = Settings::load(&path)?;
        match &self.layers {
            Some(spec) => settings.with_layers(spec.as_str()),
            None => Ok(settings),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every catalog, then convert every catalog to CSV.
    Run {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Skip the start and close prompts even if the settings enable them
        #[arg(long)]
        no_prompt: bool,
    },

    /// Fetch every catalog without converting.
    Fetch {
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Convert the layer files of one directory to CSV.
    Convert {
        /// Directory containing saved layer documents
        dir: PathBuf,

        /// Cell quoting mode
        #[arg(short, long, value_enum, default_value_t = CsvQuoting::Legacy)]
        quoting: CsvQuoting,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            settings,
            no_prompt,
        } => {
            let settings = settings.load()?;
            extract_command(&settings, RunMode::Full, settings.prompt_for_run && !no_prompt)
        }
        Commands::Fetch { settings } => {
            let settings = settings.load()?;
            extract_command(&settings, RunMode::FetchOnly, false)
        }
        Commands::Convert { dir, quoting } => convert_command(&dir, quoting),
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn prompt(term: &Term, message: &str) -> Result<()> {
    term.write_line(message)?;
    term.read_line()?;
    Ok(())
}

/// Execute the run and fetch commands.
fn extract_command(settings: &Settings, mode: RunMode, prompt_for_run: bool) -> Result<()> {
    init_logging(&LogTarget::from_settings(settings))?;

    let term = Term::stdout();
    if prompt_for_run {
        prompt(&term, "Press enter to start...")?;
    }

    let extractor = Extractor::new(settings)?;

    // Progress goes to the terminal only when log entries do not
    let pb = settings.file_logging_enabled.then(spinner);
    let result = extractor.run(mode, |stage| {
        if let Some(pb) = &pb {
            pb.set_message(stage.to_string());
        }
    });
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    let summary = result?;
    print_summary(&summary);

    if prompt_for_run {
        prompt(&term, "Press enter to close...")?;
    }

    Ok(())
}

/// Execute the convert command.
fn convert_command(dir: &Path, quoting: CsvQuoting) -> Result<()> {
    init_logging(&LogTarget::Stdout)?;

    let report = LayerConverter::new(quoting).convert_directory(dir)?;
    print_conversion(&dir.display().to_string(), &report);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    for catalog in &summary.catalogs {
        println!(
            "{} {} layers",
            style("Catalog").bold(),
            style(&catalog.language).cyan()
        );
        println!("  Fetched: {}", style(catalog.fetch.written.len()).green());
        for failure in &catalog.fetch.failures {
            println!(
                "  {} layer {} ({}): {}",
                style("Failed").red(),
                failure.layer,
                failure.url,
                failure.error
            );
        }
        if let Some(report) = &catalog.conversion {
            print_conversion("  Converted", report);
        }
        if let Some(error) = &catalog.conversion_error {
            println!("  {} {}", style("Conversion skipped:").red(), error);
        }
    }

    let failures = summary.failure_count();
    if failures > 0 {
        println!(
            "{} {}",
            style("Failures:").yellow().bold(),
            style(failures).yellow()
        );
    }
}

fn print_conversion(label: &str, report: &ConversionReport) {
    println!("{}: {}", label, style(report.written.len()).green());
    for failure in &report.failures {
        println!(
            "  {} {}: {}",
            style("Failed").red(),
            failure.path.display(),
            failure.error
        );
    }
}
