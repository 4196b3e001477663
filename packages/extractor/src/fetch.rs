//! Layer fetching: one query per configured layer, body saved verbatim.

use std::fs;
use std::path::PathBuf;

use reqwest::blocking::Client;

use crate::config::{layer_query_url, CatalogConfig};
use crate::error::{ExtractorError, Result};
use crate::http::{create_client, download_bytes};

/// A layer that could not be fetched or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerFailure {
    pub layer: u32,
    pub url: String,
    pub error: String,
}

/// Outcome of fetching one catalog.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Raw layer files written, in request order.
    pub written: Vec<PathBuf>,
    pub failures: Vec<LayerFailure>,
}

impl FetchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Downloads map-service layers into a catalog's output directory.
pub struct LayerFetcher {
    client: Client,
}

impl LayerFetcher {
    /// Create a fetcher with its own HTTP client.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self::with_client(create_client(timeout_secs)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch every layer of a catalog.
    ///
    /// Each layer is independent: a failed lookup, request or write is
    /// logged and recorded, and the next layer is attempted.
    pub fn fetch_catalog(&self, catalog: &CatalogConfig, layers: &[u32]) -> FetchReport {
        let mut report = FetchReport::default();

        for &layer in layers {
            let url = layer_query_url(&catalog.base_url, layer);
            tracing::info!(language = %catalog.language, layer, url = %url, "Requesting layer data");

            match self.fetch_layer(catalog, layer, &url) {
                Ok(path) => {
                    tracing::debug!(path = %path.display(), "Saved layer");
                    report.written.push(path);
                }
                Err(e) => {
                    tracing::error!(layer, url = %url, error = %e, "Failed to fetch layer");
                    report.failures.push(LayerFailure {
                        layer,
                        url,
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }

    fn fetch_layer(&self, catalog: &CatalogConfig, layer: u32, url: &str) -> Result<PathBuf> {
        let name = catalog.layer_name(layer)?;
        let bytes = download_bytes(&self.client, url)?;

        let path = catalog.output_dir.join(format!("{name}.json"));
        fs::write(&path, &bytes).map_err(|e| ExtractorError::io_at(&path, e))?;
        Ok(path)
    }
}
