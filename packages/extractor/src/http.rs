//! HTTP client wrapper for querying the map service.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{ExtractorError, Result};

/// User agent string identifying this extractor.
const USER_AGENT: &str = concat!("copdata-extractor/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Arguments
/// * `timeout_secs` - Total request timeout
pub fn create_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download the body of a URL.
///
/// A single attempt: transport errors and non-success statuses are returned
/// to the caller, which decides whether to move on.
///
/// # Returns
/// Raw bytes of the response body
pub fn download_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractorError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = response.bytes()?;
    Ok(bytes.to_vec())
}
