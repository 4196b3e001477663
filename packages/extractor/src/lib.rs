//! CopData extractor - Download map-service feature layers and flatten them to CSV.
//!
//! Each catalog (one per language) names a map service, the layers to query
//! and an output directory. Layers are saved verbatim as `<name>.json`, then
//! every saved document is converted to `csv/<name>.json.csv`.
//!
//! # Example
//!
//! ```
//! use copdata_extractor::config::{layer_query_url, parse_layer_spec};
//!
//! let layers = parse_layer_spec("1,3-4").unwrap();
//! assert_eq!(layers, vec![1, 3, 4]);
//! assert_eq!(
//!     layer_query_url("https://maps.example/MapServer", layers[0]),
//!     "https://maps.example/MapServer/1/query?where=1=1&f=json&outFields=*"
//! );
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Settings, layer specifications and URL building
//! - [`types`]: Layer document types (field descriptors, field types)
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client for the map service
//! - [`fetch`]: Layer fetcher
//! - [`convert`]: JSON layer to CSV conversion
//! - [`logging`]: Log sink setup
//! - [`extractor`]: Fetch-then-convert run over all catalogs
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod types;

// Re-export commonly used items
pub use config::{parse_layer_spec, CatalogConfig, CsvQuoting, Settings};
pub use convert::{ConversionReport, LayerConverter};
pub use error::{ExtractorError, Result};
pub use extractor::{Extractor, RunMode, RunSummary};
pub use fetch::{FetchReport, LayerFetcher};
pub use types::{FieldDescriptor, FieldType};
