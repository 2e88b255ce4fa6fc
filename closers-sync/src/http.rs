//! HTTP client abstraction for testability.

use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{SyncError, SyncResult};

/// Trait for HTTP client operations.
///
/// The version resolver, manifest fetch and patch downloader all go through
/// this seam so tests can substitute canned responses.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// Only `200 OK` counts as success; any other status is returned as
    /// [`SyncError::Network`].
    fn get(&self, url: &str) -> SyncResult<Vec<u8>>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client. `None` disables the per-request timeout.
    pub fn new(timeout: Option<Duration>) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("closers-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> SyncResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| SyncError::network(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SyncError::network(url, format!("HTTP {}", status)));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| SyncError::network(url, format!("failed to read body: {}", e)))
    }
}
