//! Building table rows from a layer document.

use std::collections::HashMap;

use serde_json::Value;

use super::cell::{format_cell, Cell};
use super::table::CsvTable;
use crate::error::{ExtractorError, Result};
use crate::types::{feature_attributes, FieldDescriptor, LayerDocument, ServiceErrorBody};

/// Field descriptors of one layer, by name and in declaration order.
#[derive(Debug, Clone)]
pub struct LayerSchema {
    order: Vec<String>,
    by_name: HashMap<String, FieldDescriptor>,
}

impl LayerSchema {
    /// Index the declared fields. Field names must be unique.
    pub fn from_fields(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut order = Vec::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());

        for field in fields {
            if by_name.contains_key(&field.name) {
                return Err(ExtractorError::DuplicateField(field.name));
            }
            order.push(field.name.clone());
            by_name.insert(field.name.clone(), field);
        }

        Ok(Self { order, by_name })
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name)
    }

    pub fn field_names(&self) -> &[String] {
        &self.order
    }

    /// Header row: field names in declaration order.
    pub fn header(&self) -> Vec<Cell> {
        self.order.iter().map(|n| Cell::Plain(n.clone())).collect()
    }

    /// Format one feature's attributes, in their source order.
    pub fn format_row(&self, attributes: &serde_json::Map<String, Value>) -> Result<Vec<Cell>> {
        attributes
            .iter()
            .map(|(name, value)| {
                let field = self
                    .get(name)
                    .ok_or_else(|| ExtractorError::UnknownField { name: name.clone() })?;
                Ok(format_cell(&field.field_type, value))
            })
            .collect()
    }
}

/// Rows built from one document, and the error that stopped building, if any.
#[derive(Debug)]
pub struct RowBuild {
    pub table: CsvTable,
    pub error: Option<ExtractorError>,
}

/// Parse a layer document, recognising the service's error envelope.
pub fn parse_document(text: &str) -> Result<LayerDocument> {
    let value: Value = serde_json::from_str(text)?;

    if let Some(error) = value.get("error").filter(|e| e.is_object()) {
        let body: ServiceErrorBody = serde_json::from_value(error.clone())?;
        return Err(ExtractorError::ServiceError {
            code: body.code,
            message: body.message,
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Build the table for one layer document.
///
/// Row building is all-or-nothing per document: the first unknown attribute
/// or malformed feature stops it, and the rows built up to that point are
/// kept.
pub fn build_table(text: &str) -> RowBuild {
    let mut table = CsvTable::default();
    let error = fill_table(text, &mut table).err();
    RowBuild { table, error }
}

fn fill_table(text: &str, table: &mut CsvTable) -> Result<()> {
    let document = parse_document(text)?;
    let schema = LayerSchema::from_fields(document.fields)?;

    table.push_row(schema.header());

    for (index, feature) in document.features.iter().enumerate() {
        let attributes =
            feature_attributes(feature).ok_or(ExtractorError::MissingAttributes { index })?;
        table.push_row(schema.format_row(attributes)?);
    }

    Ok(())
}
