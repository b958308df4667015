//! Per-network vault sources.
//!
//! Every network is served by one [`VaultSource`]. Sources are registered by
//! network name in a [`SourceRegistry`], which is fixed once the aggregator is
//! built and resolved by lookup at call time.

pub mod evm;
pub mod pending;

pub use evm::{EvmSource, DEFAULT_EVM_URL};
pub use pending::PendingSource;

use crate::error::FetchError;
use crate::models::{Session, VaultRecord};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Capability: fetch the vaults of one network.
#[async_trait]
pub trait VaultSource: Send + Sync {
    /// Network identifier this source serves (e.g. "EVM").
    fn network(&self) -> &str;

    /// Fetch every vault the source knows about.
    ///
    /// An empty list is a valid answer.
    async fn fetch(&self, session: &Session) -> Result<Vec<VaultRecord>, FetchError>;
}

/// Shared handle to a registered source.
pub type SharedSource = Arc<dyn VaultSource>;

/// Ordered mapping of network name to source.
///
/// Registration order is the order used when every network is selected.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<SharedSource>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under its network name, replacing any previous
    /// source for the same network in place.
    pub fn register(&mut self, source: SharedSource) {
        match self
            .sources
            .iter_mut()
            .find(|s| s.network() == source.network())
        {
            Some(slot) => *slot = source,
            None => self.sources.push(source),
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, source: impl VaultSource + 'static) -> Self {
        self.register(Arc::new(source));
        self
    }

    /// Look up the source for a network (case-sensitive).
    pub fn get(&self, network: &str) -> Option<&SharedSource> {
        self.sources.iter().find(|s| s.network() == network)
    }

    /// Registered network names in registration order.
    pub fn networks(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.network()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("networks", &self.networks())
            .finish()
    }
}

/// The standard registry: a live EVM source plus Sui and Solana placeholders.
pub fn default_registry(evm_url: &str, timeout: Duration) -> SourceRegistry {
    SourceRegistry::new()
        .with(EvmSource::new(evm_url, timeout))
        .with(PendingSource::new("Sui"))
        .with(PendingSource::new("Solana"))
}
