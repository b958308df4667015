//! Placeholder source for networks without a provider integration yet.

use super::VaultSource;
use crate::error::FetchError;
use crate::models::{Session, VaultRecord};
use async_trait::async_trait;
use tracing::debug;

/// A registered network that always contributes no vaults.
#[derive(Debug, Clone)]
pub struct PendingSource {
    network: String,
}

impl PendingSource {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
        }
    }
}

#[async_trait]
impl VaultSource for PendingSource {
    fn network(&self) -> &str {
        &self.network
    }

    async fn fetch(&self, _session: &Session) -> Result<Vec<VaultRecord>, FetchError> {
        debug!(network = %self.network, "No provider integration for network, returning no vaults");
        Ok(Vec::new())
    }
}
