//! Log sink setup.
//!
//! Entries go to stdout by default or to a log file when file logging is
//! enabled. `RUST_LOG` overrides the default `info` filter.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::error::{ExtractorError, Result};

/// Where log entries are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    File(PathBuf),
}

impl LogTarget {
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.file_logging_enabled {
            Self::File(settings.log_file.clone())
        } else {
            Self::Stdout
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. A log file is truncated first.
pub fn init_logging(target: &LogTarget) -> Result<()> {
    let result = match target {
        LogTarget::Stdout => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(false)
            .try_init(),
        LogTarget::File(path) => {
            let file = File::create(path).map_err(|e| ExtractorError::io_at(path, e))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    result.map_err(|e| ExtractorError::Config(format!("failed to initialise logging: {e}")))
}
