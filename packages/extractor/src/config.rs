//! Configuration constants, settings loading and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::{ExtractorError, Result};

/// Default settings file name, looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "extractor.yaml";

/// Default log file used when file logging is enabled.
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// HTTP timeout in seconds.
///
/// Layer queries return every feature of a layer in one response, which can
/// take a while on large layers.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Query suffix requesting every record with all fields as JSON.
pub const LAYER_QUERY: &str = "query?where=1=1&f=json&outFields=*";

/// Name of the subdirectory that receives converted tables.
pub const CSV_DIR_NAME: &str = "csv";

/// One token of a layer specification: `N` or `N-M`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LAYER_TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\s*-\s*(\d+))?$").expect("valid regex"));

/// How cells are quoted in the produced tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CsvQuoting {
    /// Literal join: string cells wrapped in quotes, nothing escaped.
    ///
    /// Matches the files downstream consumers already read. Values containing
    /// a comma or a quote will break the row.
    #[default]
    Legacy,

    /// Strict CSV: quote only when needed and double embedded quotes.
    Rfc4180,
}

/// One language catalog of the map service.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Human-readable language label, used in logs.
    pub language: String,

    /// Map service base URL (e.g. `https://host/arcgis/rest/services/X/MapServer`).
    pub base_url: String,

    /// Output file base names, indexed by `layer - 1`.
    #[serde(deserialize_with = "comma_separated")]
    pub layer_names: Vec<String>,

    /// Directory receiving raw `<name>.json` files and the `csv/` subdirectory.
    pub output_dir: PathBuf,
}

impl CatalogConfig {
    /// Output name for a layer identifier, if the name table has a non-empty one.
    pub fn layer_name(&self, layer: u32) -> Result<&str> {
        let index = usize::try_from(layer)
            .ok()
            .and_then(|l| l.checked_sub(1));
        index
            .and_then(|i| self.layer_names.get(i))
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(ExtractorError::LayerNameMissing {
                layer,
                available: self.layer_names.len(),
            })
    }
}

/// Settings for a complete extraction run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Layer specification shared by every catalog (e.g. `1-5,8`).
    pub layers: String,

    /// Catalogs, fetched and converted in this order.
    pub catalogs: Vec<CatalogConfig>,

    #[serde(default)]
    pub file_logging_enabled: bool,

    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Wait for Enter before starting and before exiting.
    #[serde(default)]
    pub prompt_for_run: bool,

    #[serde(default)]
    pub csv_quoting: CsvQuoting,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_http_timeout() -> u64 {
    HTTP_TIMEOUT_SECS
}

fn comma_separated<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(split_list(&raw))
}

/// Split a comma-separated configuration list, trimming each entry.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

impl Settings {
    /// Load and validate settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ExtractorError::io_at(path, e))?;
        Self::from_yaml_str(&text)
    }

    /// Parse and validate settings from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let settings: Settings = serde_yaml_ng::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the values a run cannot start without.
    pub fn validate(&self) -> Result<()> {
        parse_layer_spec(&self.layers)?;

        if self.catalogs.is_empty() {
            return Err(ExtractorError::Config("no catalogs configured".into()));
        }

        for catalog in &self.catalogs {
            if catalog.language.trim().is_empty() {
                return Err(ExtractorError::Config("catalog without language".into()));
            }
            if catalog.base_url.trim().is_empty() {
                return Err(ExtractorError::Config(format!(
                    "base_url not set for {} catalog",
                    catalog.language
                )));
            }
            if catalog.layer_names.iter().all(|n| n.is_empty()) {
                return Err(ExtractorError::Config(format!(
                    "layer_names not set for {} catalog",
                    catalog.language
                )));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "http_timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Expanded layer identifiers.
    pub fn layer_ids(&self) -> Result<Vec<u32>> {
        parse_layer_spec(&self.layers)
    }

    /// Replace the layer specification, validating it first.
    pub fn with_layers(mut self, spec: impl Into<String>) -> Result<Self> {
        let spec = spec.into();
        parse_layer_spec(&spec)?;
        self.layers = spec;
        Ok(self)
    }
}

/// Expand a layer specification into layer identifiers.
///
/// Tokens are either a literal (`4`) or an inclusive range (`5-7`). Order
/// follows the tokens, ascending within a range. Empty tokens are skipped.
///
/// # Examples
/// ```
/// use copdata_extractor::config::parse_layer_spec;
///
/// assert_eq!(parse_layer_spec("2,5-7").unwrap(), vec![2, 5, 6, 7]);
/// assert!(parse_layer_spec("7-3").is_err());
/// ```
pub fn parse_layer_spec(spec: &str) -> Result<Vec<u32>> {
    let mut layers = Vec::new();

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let invalid = || ExtractorError::InvalidLayerSpec(token.to_string());
        let caps = LAYER_TOKEN_PATTERN.captures(token).ok_or_else(invalid)?;

        let start: u32 = caps[1].parse().map_err(|_| invalid())?;
        match caps.get(2) {
            Some(end) => {
                let end: u32 = end.as_str().parse().map_err(|_| invalid())?;
                if end < start {
                    return Err(invalid());
                }
                layers.extend(start..=end);
            }
            None => layers.push(start),
        }
    }

    Ok(layers)
}

/// Build the query URL for one layer of a catalog.
///
/// # Examples
/// ```
/// use copdata_extractor::config::layer_query_url;
///
/// assert_eq!(
///     layer_query_url("https://maps.example/MapServer/", 3),
///     "https://maps.example/MapServer/3/query?where=1=1&f=json&outFields=*"
/// );
/// ```
pub fn layer_query_url(base_url: &str, layer: u32) -> String {
    format!("{}/{layer}/{LAYER_QUERY}", base_url.trim_end_matches('/'))
}
