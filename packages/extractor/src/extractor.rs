//! Main extractor service that ties fetching and conversion together.

use std::fs;

use crate::config::Settings;
use crate::convert::{ConversionReport, LayerConverter};
use crate::error::{ExtractorError, Result};
use crate::fetch::{FetchReport, LayerFetcher};

/// Which stages a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Fetch every catalog, then convert every catalog.
    Full,
    /// Fetch only; existing CSV files are left alone.
    FetchOnly,
}

/// Outcome for one catalog.
#[derive(Debug)]
pub struct CatalogRun {
    pub language: String,
    pub fetch: FetchReport,
    pub conversion: Option<ConversionReport>,
    /// Directory-level conversion failure (the catalog was skipped).
    pub conversion_error: Option<String>,
}

impl CatalogRun {
    /// Number of per-layer and per-file failures.
    pub fn failure_count(&self) -> usize {
        self.fetch.failures.len()
            + self.conversion.as_ref().map_or(0, |c| c.failures.len())
            + usize::from(self.conversion_error.is_some())
    }
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub catalogs: Vec<CatalogRun>,
}

impl RunSummary {
    pub fn failure_count(&self) -> usize {
        self.catalogs.iter().map(CatalogRun::failure_count).sum()
    }
}

/// Runs the fetch and convert stages over every configured catalog.
pub struct Extractor<'a> {
    settings: &'a Settings,
    fetcher: LayerFetcher,
    converter: LayerConverter,
}

impl<'a> Extractor<'a> {
    /// Create an extractor with a fetcher and converter built from `settings`.
    pub fn new(settings: &'a Settings) -> Result<Self> {
        Ok(Self {
            settings,
            fetcher: LayerFetcher::new(settings.http_timeout_secs)?,
            converter: LayerConverter::new(settings.csv_quoting),
        })
    }

    pub fn with_fetcher(mut self, fetcher: LayerFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Create every catalog output directory.
    pub fn create_output_directories(&self) -> Result<()> {
        for catalog in &self.settings.catalogs {
            fs::create_dir_all(&catalog.output_dir)
                .map_err(|e| ExtractorError::io_at(&catalog.output_dir, e))?;
        }
        Ok(())
    }

    /// Run the requested stages.
    ///
    /// All catalogs are fetched before any is converted. `on_stage` receives
    /// a short description of each stage as it starts.
    pub fn run(&self, mode: RunMode, mut on_stage: impl FnMut(&str)) -> Result<RunSummary> {
        let layers = self.settings.layer_ids()?;
        self.create_output_directories()?;

        let mut summary = RunSummary::default();

        for catalog in &self.settings.catalogs {
            let stage = format!("Getting JSON layer data for {} layers", catalog.language);
            tracing::info!("{stage}");
            on_stage(stage.as_str());

            let fetch = self.fetcher.fetch_catalog(catalog, &layers);
            tracing::info!(
                language = %catalog.language,
                written = fetch.written.len(),
                failed = fetch.failures.len(),
                "Finished fetching layers"
            );

            summary.catalogs.push(CatalogRun {
                language: catalog.language.clone(),
                fetch,
                conversion: None,
                conversion_error: None,
            });
        }

        if mode == RunMode::FetchOnly {
            return Ok(summary);
        }

        for (catalog, run) in self.settings.catalogs.iter().zip(&mut summary.catalogs) {
            let stage = format!(
                "Converting JSON layer data for {} layers to CSV",
                catalog.language
            );
            tracing::info!("{stage}");
            on_stage(stage.as_str());

            match self.converter.convert_directory(&catalog.output_dir) {
                Ok(report) => {
                    tracing::info!(
                        language = %catalog.language,
                        written = report.written.len(),
                        failed = report.failures.len(),
                        "Finished converting layers"
                    );
                    run.conversion = Some(report);
                }
                Err(e) => {
                    tracing::error!(
                        path = %catalog.output_dir.display(),
                        error = %e,
                        "Failed to convert catalog directory"
                    );
                    run.conversion_error = Some(e.to_string());
                }
            }
        }

        Ok(summary)
    }
}
