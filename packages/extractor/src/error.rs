//! Error types for the extractor.
//!
//! A single `ExtractorError` covers retrieval, lookup, parse, I/O and
//! configuration failures. Per-layer and per-file errors are caught by the
//! fetcher and converter; only configuration and directory-level errors
//! reach the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the extractor library.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// HTTP request failed (transport, timeout, invalid URL).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// A configured layer has no entry in the catalog's name table.
    #[error("No layer name configured for layer {layer} (name table has {available} entries)")]
    LayerNameMissing { layer: u32, available: usize },

    /// A feature attribute has no matching field descriptor.
    #[error("Attribute '{name}' is not declared in the layer fields")]
    UnknownField { name: String },

    /// A feature carries no `attributes` object.
    #[error("Feature {index} has no attributes object")]
    MissingAttributes { index: usize },

    /// The same field name is declared twice.
    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    /// The document is the service's error envelope instead of a layer.
    #[error("Map service returned error {code}: {message}")]
    ServiceError { code: i64, message: String },

    /// JSON parsing failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error("CSV writing failed: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error tied to a specific path.
    #[error("IO error at {}: {source}", .path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file could not be parsed.
    #[error("Settings parsing failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Invalid layer specification token.
    #[error("Invalid layer specification token: '{0}'. Expected N or N-M with N <= M (e.g., 2,5-7)")]
    InvalidLayerSpec(String),

    /// Missing or invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Attach a path to an IO error.
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoAt {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, ExtractorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractorError::InvalidLayerSpec("7-3".to_string());
        assert!(err.to_string().contains("7-3"));
        assert!(err.to_string().contains("N-M"));
    }

    #[test]
    fn test_layer_name_missing_display() {
        let err = ExtractorError::LayerNameMissing {
            layer: 4,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "No layer name configured for layer 4 (name table has 2 entries)"
        );
    }

    #[test]
    fn test_io_at_includes_path() {
        let err = ExtractorError::io_at(
            "out/csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "IO error at out/csv: denied");
    }
}
