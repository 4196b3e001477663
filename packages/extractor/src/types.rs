//! Core data types for map-service layer documents.
//!
//! A layer query response carries a `fields` schema and a `features` list.
//! Only the parts the converter needs are modelled; everything else in the
//! document (geometry, spatial reference, paging flags) is ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field types declared by the map service.
///
/// The service may introduce new type strings; those are kept as
/// [`FieldType::Unknown`] and rendered like numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Date,
    Guid,
    Blob,
    Raster,
    Xml,
    Geometry,
    Double,
    Single,
    Integer,
    SmallInteger,
    Oid,
    GlobalId,
    Unknown(String),
}

impl FieldType {
    /// Get the service's string for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "esriFieldTypeString",
            Self::Date => "esriFieldTypeDate",
            Self::Guid => "esriFieldTypeGUID",
            Self::Blob => "esriFieldTypeBlob",
            Self::Raster => "esriFieldTypeRaster",
            Self::Xml => "esriFieldTypeXML",
            Self::Geometry => "esriFieldTypeGeometry",
            Self::Double => "esriFieldTypeDouble",
            Self::Single => "esriFieldTypeSingle",
            Self::Integer => "esriFieldTypeInteger",
            Self::SmallInteger => "esriFieldTypeSmallInteger",
            Self::Oid => "esriFieldTypeOID",
            Self::GlobalId => "esriFieldTypeGlobalID",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// How values of this type are rendered in a table.
    #[must_use]
    pub fn cell_class(&self) -> CellClass {
        match self {
            Self::String | Self::Date | Self::Guid => CellClass::Text,
            Self::Blob | Self::Raster | Self::Xml | Self::Geometry => CellClass::Dropped,
            Self::Double
            | Self::Single
            | Self::Integer
            | Self::SmallInteger
            | Self::Oid
            | Self::GlobalId
            | Self::Unknown(_) => CellClass::Plain,
        }
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "esriFieldTypeString" => Self::String,
            "esriFieldTypeDate" => Self::Date,
            "esriFieldTypeGUID" => Self::Guid,
            "esriFieldTypeBlob" => Self::Blob,
            "esriFieldTypeRaster" => Self::Raster,
            "esriFieldTypeXML" => Self::Xml,
            "esriFieldTypeGeometry" => Self::Geometry,
            "esriFieldTypeDouble" => Self::Double,
            "esriFieldTypeSingle" => Self::Single,
            "esriFieldTypeInteger" => Self::Integer,
            "esriFieldTypeSmallInteger" => Self::SmallInteger,
            "esriFieldTypeOID" => Self::Oid,
            "esriFieldTypeGlobalID" => Self::GlobalId,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

/// Rendering rule shared by a group of field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    /// Trimmed text, quoted.
    Text,
    /// Binary or complex payload, always an empty cell.
    Dropped,
    /// Value's own textual form, unquoted.
    Plain,
}

/// Schema entry from a layer's `fields` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub alias: Option<String>,

    #[serde(default)]
    pub length: Option<i64>,
}

/// A layer query response.
///
/// Features stay as raw JSON so that one malformed feature fails only when
/// its row is built, after the preceding rows.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerDocument {
    pub fields: Vec<FieldDescriptor>,
    pub features: Vec<Value>,
}

/// Error envelope the map service returns in place of a layer.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Attributes of one feature, in source order.
pub fn feature_attributes(feature: &Value) -> Option<&Map<String, Value>> {
    feature.get("attributes").and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_known_values() {
        assert_eq!(
            FieldType::from("esriFieldTypeOID".to_string()),
            FieldType::Oid
        );
        assert_eq!(
            FieldType::from("esriFieldTypeGUID".to_string()),
            FieldType::Guid
        );
        assert_eq!(FieldType::Guid.as_str(), "esriFieldTypeGUID");
    }

    #[test]
    fn test_field_type_unknown_is_kept() {
        let field_type = FieldType::from("esriFieldTypeBigInteger".to_string());
        assert_eq!(
            field_type,
            FieldType::Unknown("esriFieldTypeBigInteger".to_string())
        );
        assert_eq!(field_type.as_str(), "esriFieldTypeBigInteger");
        assert_eq!(field_type.cell_class(), CellClass::Plain);
    }

    #[test]
    fn test_cell_classes() {
        assert_eq!(FieldType::Date.cell_class(), CellClass::Text);
        assert_eq!(FieldType::Geometry.cell_class(), CellClass::Dropped);
        assert_eq!(FieldType::SmallInteger.cell_class(), CellClass::Plain);
    }

    #[test]
    fn test_descriptor_defaults() {
        let field: FieldDescriptor =
            serde_json::from_value(json!({"name": "id", "type": "esriFieldTypeInteger"}))
                .unwrap();
        assert_eq!(field.name, "id");
        assert_eq!(field.field_type, FieldType::Integer);
        assert_eq!(field.alias, None);
        assert_eq!(field.length, None);
    }

    #[test]
    fn test_descriptor_accepts_null_alias_and_length() {
        let field: FieldDescriptor = serde_json::from_value(
            json!({"name": "id", "type": "esriFieldTypeInteger", "alias": null, "length": null}),
        )
        .unwrap();
        assert_eq!(field.alias, None);
        assert_eq!(field.length, None);
    }

    #[test]
    fn test_feature_attributes_keep_source_order() {
        let feature: Value =
            serde_json::from_str(r#"{"attributes": {"z": 1, "a": 2, "m": 3}}"#).unwrap();
        let names: Vec<&str> = feature_attributes(&feature)
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }
}
