//! Errors raised by network vault sources.

use thiserror::Error;

/// A per-network fetch failure.
///
/// The aggregator recovers from every variant by skipping the network.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("cannot connect to vault provider at {0}")]
    Connect(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vault provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed vault payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl FetchError {
    /// Classify a transport error from the HTTP client.
    pub fn from_transport(err: reqwest::Error, url: &str, seconds: u64) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                seconds,
            }
        } else if err.is_connect() {
            FetchError::Connect(url.to_string())
        } else {
            FetchError::Http(err)
        }
    }
}
