//! Blocking text download behind an injectable trait, so the rest of the
//! crate (and its tests) never talks to reqwest directly.

use log::{info, warn};
use reqwest::blocking::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),
}

/// Downloads the text body of a URL.
///
/// Implemented over HTTP for real use; tests substitute a canned fetcher so
/// cache behavior can be observed without the network.
pub trait TextFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// [`TextFetcher`] over a blocking reqwest client. One fetch is one request:
/// no retries, no caching.
pub struct HttpTextFetcher {
    client: Client,
}

impl HttpTextFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpTextFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFetcher for HttpTextFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        info!("fetch {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        response
            .text()
            .map_err(|e| FetchError::BodyRead(url.to_string(), e))
    }
}
