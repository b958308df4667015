//! EVM vault source backed by the vault provider's HTTP API.
//!
//! The provider takes a POST with the caller's session identity and answers
//! with `{"data": [VaultRecord, ...]}`.

use super::VaultSource;
use crate::error::FetchError;
use crate::models::{Session, VaultRecord, VaultResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Default provider endpoint for EVM vaults.
pub const DEFAULT_EVM_URL: &str =
    "https://blueprint.api.sui-dev.bluefin.io/api/tools/evm/get-vaults";

/// Fetches EVM vaults from the provider API.
#[derive(Debug, Clone)]
pub struct EvmSource {
    url: String,
    timeout: Duration,
}

impl EvmSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    /// Decode a provider response body.
    fn parse_body(body: &str) -> Result<Vec<VaultRecord>, FetchError> {
        let response: VaultResponse = serde_json::from_str(body)?;
        Ok(response.data)
    }
}

#[async_trait]
impl VaultSource for EvmSource {
    fn network(&self) -> &str {
        "EVM"
    }

    async fn fetch(&self, session: &Session) -> Result<Vec<VaultRecord>, FetchError> {
        let seconds = self.timeout.as_secs();

        // One client per call; its connection pool is dropped with it.
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        debug!("POST {} for conversation {}", self.url, session.conversation_id);

        let response = client
            .post(&self.url)
            .json(session)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, &self.url, seconds))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_transport(e, &self.url, seconds))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let vaults = Self::parse_body(&body)?;
        info!("Fetched {} EVM vaults", vaults.len());

        Ok(vaults)
    }
}
