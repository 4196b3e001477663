//! Conversion of saved layer documents to CSV.
//!
//! Every file directly inside a catalog directory is converted on its own
//! into `<dir>/csv/<file name>.csv`. A failing file is logged and recorded;
//! the remaining files are still converted.

mod cell;
mod rows;
mod table;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub use cell::{format_cell, value_text, Cell};
pub use rows::{build_table, parse_document, LayerSchema, RowBuild};
pub use table::CsvTable;

use crate::config::{CsvQuoting, CSV_DIR_NAME};
use crate::error::{ExtractorError, Result};

/// A file whose conversion hit an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of converting one directory.
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// CSV files written, in source file order.
    pub written: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl ConversionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of converting one file.
#[derive(Debug)]
pub struct FileConversion {
    pub source: PathBuf,
    pub output: PathBuf,
    pub data_rows: usize,
    /// Error that stopped reading or row building.
    pub row_error: Option<ExtractorError>,
    /// Error that prevented the table from being written.
    pub write_error: Option<ExtractorError>,
}

impl FileConversion {
    pub fn written(&self) -> bool {
        self.write_error.is_none()
    }
}

/// Converts layer documents to CSV tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerConverter {
    quoting: CsvQuoting,
}

impl LayerConverter {
    pub fn new(quoting: CsvQuoting) -> Self {
        Self { quoting }
    }

    /// Convert every file directly inside `dir`.
    ///
    /// Creates `<dir>/csv` if needed. Fails only when that directory cannot
    /// be created or `dir` cannot be listed.
    pub fn convert_directory(&self, dir: &Path) -> Result<ConversionReport> {
        let csv_dir = dir.join(CSV_DIR_NAME);
        fs::create_dir_all(&csv_dir).map_err(|e| ExtractorError::io_at(&csv_dir, e))?;

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| ExtractorError::io_at(dir, e))? {
            let path = entry.map_err(|e| ExtractorError::io_at(dir, e))?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut report = ConversionReport::default();
        for file in files {
            let conversion = self.convert_json_file(&file, &csv_dir);

            if let Some(e) = &conversion.row_error {
                report.failures.push(FileFailure {
                    path: conversion.source.clone(),
                    error: e.to_string(),
                });
            }
            match &conversion.write_error {
                Some(e) => report.failures.push(FileFailure {
                    path: conversion.output.clone(),
                    error: e.to_string(),
                }),
                None => report.written.push(conversion.output),
            }
        }

        Ok(report)
    }

    /// Convert one layer document into `csv_dir`.
    ///
    /// Errors are logged and returned in the outcome. When row building
    /// stops early the rows built so far are still written.
    pub fn convert_json_file(&self, file: &Path, csv_dir: &Path) -> FileConversion {
        let output = csv_path(file, csv_dir);

        let build = match fs::read_to_string(file) {
            Ok(text) => build_table(&text),
            Err(e) => RowBuild {
                table: CsvTable::default(),
                error: Some(ExtractorError::io_at(file, e)),
            },
        };

        if let Some(e) = &build.error {
            tracing::error!(path = %file.display(), error = %e, "Failed to build CSV rows");
        }

        let write_error = self.write_table(&build.table, &output).err();
        match &write_error {
            Some(e) => {
                tracing::error!(path = %output.display(), error = %e, "Failed to write CSV file");
            }
            None => {
                tracing::debug!(
                    path = %output.display(),
                    rows = build.table.data_rows(),
                    "Wrote CSV file"
                );
            }
        }

        FileConversion {
            source: file.to_path_buf(),
            output,
            data_rows: build.table.data_rows(),
            row_error: build.error,
            write_error,
        }
    }

    fn write_table(&self, table: &CsvTable, output: &Path) -> Result<()> {
        let text = table.render(self.quoting)?;
        fs::write(output, text).map_err(|e| ExtractorError::io_at(output, e))
    }
}

/// Output path for a source file: `<csv_dir>/<file name>.csv`.
pub fn csv_path(file: &Path, csv_dir: &Path) -> PathBuf {
    let mut name = file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(".csv");
    csv_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const LAYER: &str = r#"{"fields": [{"name": "id", "type": "esriFieldTypeInteger"},
                                       {"name": "label", "type": "esriFieldTypeString"}],
                            "features": [{"attributes": {"id": 7, "label": " Seven "}}]}"#;

    #[test]
    fn test_csv_path_keeps_source_extension() {
        assert_eq!(
            csv_path(Path::new("/data/en/Roads.json"), Path::new("/data/en/csv")),
            PathBuf::from("/data/en/csv/Roads.json.csv")
        );
    }

    #[test]
    fn test_convert_json_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Roads.json");
        fs::write(&source, LAYER).unwrap();
        let csv_dir = dir.path().join("csv");
        fs::create_dir(&csv_dir).unwrap();

        let conversion = LayerConverter::default().convert_json_file(&source, &csv_dir);

        assert!(conversion.written());
        assert!(conversion.row_error.is_none());
        assert_eq!(conversion.data_rows, 1);
        assert_eq!(
            fs::read_to_string(csv_dir.join("Roads.json.csv")).unwrap(),
            "id,label\n7,\"Seven\"\n"
        );
    }

    #[test]
    fn test_unreadable_source_still_writes_empty_table() {
        let dir = TempDir::new().unwrap();
        let csv_dir = dir.path().join("csv");
        fs::create_dir(&csv_dir).unwrap();

        let conversion =
            LayerConverter::default().convert_json_file(&dir.path().join("missing.json"), &csv_dir);

        assert!(matches!(conversion.row_error, Some(ExtractorError::IoAt { .. })));
        assert!(conversion.written());
        assert_eq!(
            fs::read_to_string(csv_dir.join("missing.json.csv")).unwrap(),
            ""
        );
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Roads.json");
        fs::write(&source, LAYER).unwrap();

        // csv directory was never created
        let conversion =
            LayerConverter::default().convert_json_file(&source, &dir.path().join("csv"));

        assert!(conversion.row_error.is_none());
        assert!(!conversion.written());
    }

    #[test]
    fn test_convert_directory_creates_csv_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Roads.json"), LAYER).unwrap();

        let report = LayerConverter::default()
            .convert_directory(dir.path())
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.written, vec![dir.path().join("csv/Roads.json.csv")]);

        // Second run: csv/ already exists and is not treated as an input
        let report = LayerConverter::default()
            .convert_directory(dir.path())
            .unwrap();
        assert_eq!(report.written.len(), 1);
    }

    #[test]
    fn test_convert_missing_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "").unwrap();

        let result = LayerConverter::default().convert_directory(&file);
        assert!(matches!(result, Err(ExtractorError::IoAt { .. })));
    }
}
