//! In-memory table and its text rendering.

use std::io;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::cell::Cell;
use crate::config::CsvQuoting;
use crate::error::{ExtractorError, Result};

/// Rows of one converted layer. Row 0, when present, is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    rows: Vec<Vec<Cell>>,
}

impl CsvTable {
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows after the header.
    pub fn data_rows(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as text, one `\n`-terminated line per row.
    pub fn render(&self, quoting: CsvQuoting) -> Result<String> {
        match quoting {
            CsvQuoting::Legacy => Ok(self.render_legacy()),
            CsvQuoting::Rfc4180 => self.render_strict(),
        }
    }

    fn render_legacy(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(Cell::legacy).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }

    fn render_strict(&self) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for row in &self.rows {
            writer.write_record(row.iter().map(Cell::value))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExtractorError::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| ExtractorError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}
