//! Type-directed formatting of attribute values.

use serde_json::Value;

use crate::types::{CellClass, FieldType};

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Text that is wrapped in quotes in legacy output.
    Text(String),
    /// Written as is.
    Plain(String),
}

impl Cell {
    /// Cell content without any quoting.
    pub fn value(&self) -> &str {
        match self {
            Self::Text(s) | Self::Plain(s) => s,
        }
    }

    /// Legacy rendering: text wrapped in quotes, nothing escaped.
    pub fn legacy(&self) -> String {
        match self {
            Self::Text(s) => format!("\"{s}\""),
            Self::Plain(s) => s.clone(),
        }
    }
}

/// Textual form of a JSON value.
///
/// Strings are used without their JSON quotes, `null` is empty and nested
/// values are compact JSON. Numbers keep their source text.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Format one attribute value according to its declared field type.
pub fn format_cell(field_type: &FieldType, value: &Value) -> Cell {
    match field_type.cell_class() {
        CellClass::Text => Cell::Text(value_text(value).trim().to_string()),
        CellClass::Dropped => Cell::Plain(String::new()),
        CellClass::Plain => Cell::Plain(value_text(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_is_trimmed_and_quoted() {
        let cell = format_cell(&FieldType::String, &json!("  A,B  "));
        assert_eq!(cell, Cell::Text("A,B".to_string()));
        assert_eq!(cell.legacy(), "\"A,B\"");
    }

    #[test]
    fn test_date_and_guid_are_quoted() {
        assert_eq!(
            format_cell(&FieldType::Date, &json!(1700000000000_i64)).legacy(),
            "\"1700000000000\""
        );
        assert_eq!(
            format_cell(&FieldType::Guid, &json!("{ABC-123}")).legacy(),
            "\"{ABC-123}\""
        );
    }

    #[test]
    fn test_binary_types_are_dropped() {
        for field_type in [
            FieldType::Blob,
            FieldType::Raster,
            FieldType::Xml,
            FieldType::Geometry,
        ] {
            let cell = format_cell(&field_type, &json!({"x": 1.5, "y": 2.5}));
            assert_eq!(cell.legacy(), "");
        }
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(format_cell(&FieldType::Integer, &json!(42)).legacy(), "42");
        assert_eq!(format_cell(&FieldType::Double, &json!(3.25)).legacy(), "3.25");
        assert_eq!(format_cell(&FieldType::Oid, &json!(-7)).legacy(), "-7");
    }

    #[test]
    fn test_number_source_text_is_kept() {
        let doc: Value =
            serde_json::from_str(r#"[1.50, 1E3, 18446744073709551616, -0.0]"#).unwrap();
        let cells: Vec<String> = doc
            .as_array()
            .unwrap()
            .iter()
            .map(|v| format_cell(&FieldType::Double, v).legacy())
            .collect();
        assert_eq!(cells, vec!["1.50", "1E3", "18446744073709551616", "-0.0"]);
    }

    #[test]
    fn test_unknown_type_passes_through_untrimmed() {
        let field_type = FieldType::Unknown("esriFieldTypeBigInteger".to_string());
        assert_eq!(format_cell(&field_type, &json!(" x ")).legacy(), " x ");
    }

    #[test]
    fn test_null_values() {
        assert_eq!(format_cell(&FieldType::String, &Value::Null).legacy(), "\"\"");
        assert_eq!(format_cell(&FieldType::Integer, &Value::Null).legacy(), "");
    }

    #[test]
    fn test_value_text_other_kinds() {
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!([1, 2])), "[1,2]");
    }
}
