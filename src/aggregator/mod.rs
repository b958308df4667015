//! Multi-network vault aggregation.
//!
//! The aggregator resolves a [`NetworkSelection`] against its registry, asks
//! each selected source for vaults, merges the successful contributions and
//! ranks them by `vaultScore`. A failing network is logged and skipped; it
//! never fails the aggregation as a whole.

pub mod ranking;

pub use ranking::{
    calculate_score, network_distribution, rank_by_vault_score, top_vaults, ScoreWeights,
};

use crate::models::{Session, VaultRecord, VaultResponse};
use crate::sources::{SharedSource, SourceRegistry};
use futures::future::join_all;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Sentinel that selects every registered network.
pub const ALL_NETWORKS: &str = "ALL";

/// Which networks to fetch from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSelection {
    /// Every registered network, in registration order.
    All,
    /// Explicit identifiers, in the given order.
    Named(Vec<String>),
}

impl NetworkSelection {
    /// Parse `"ALL"`, a single identifier, or a comma-separated list.
    pub fn parse(input: &str) -> Self {
        if input.trim() == ALL_NETWORKS {
            return NetworkSelection::All;
        }

        NetworkSelection::Named(
            input
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn single(network: impl Into<String>) -> Self {
        NetworkSelection::Named(vec![network.into()])
    }
}

impl fmt::Display for NetworkSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkSelection::All => write!(f, "{}", ALL_NETWORKS),
            NetworkSelection::Named(names) => write!(f, "{}", names.join(", ")),
        }
    }
}

/// How per-network fetches are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// One network after another.
    #[default]
    Sequential,
    /// All networks at once, joined in selection order.
    Parallel,
}

/// Result of fetching one network.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchStatus {
    Fetched { count: usize },
    Failed { reason: String },
}

/// Per-network outcome of an aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkOutcome {
    pub network: String,
    #[serde(flatten)]
    pub status: FetchStatus,
}

impl NetworkOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, FetchStatus::Failed { .. })
    }
}

/// Full result of an aggregation.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Ranked vaults from every network that succeeded.
    pub vaults: Vec<VaultRecord>,
    /// One entry per selected, registered network, in selection order.
    pub outcomes: Vec<NetworkOutcome>,
    /// Requested identifiers with no registered source.
    pub unknown: Vec<String>,
}

impl Aggregation {
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// True when at least one network was attempted and every one failed.
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.failed_count() == self.outcomes.len()
    }

    /// Process exit code for this run: 2 when every network failed, else 0.
    pub fn exit_code(&self) -> i32 {
        if self.all_failed() {
            2
        } else {
            0
        }
    }
}

/// Fetches, merges and ranks vaults across networks.
#[derive(Debug, Clone)]
pub struct VaultAggregator {
    registry: SourceRegistry,
    session: Session,
    weights: ScoreWeights,
    mode: FetchMode,
}

impl VaultAggregator {
    pub fn new(registry: SourceRegistry, session: Session) -> Self {
        Self {
            registry,
            session,
            weights: ScoreWeights::default(),
            mode: FetchMode::default(),
        }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Fetch and rank vaults from the selected networks.
    ///
    /// Never fails: failed or unknown networks contribute nothing.
    pub async fn fetch_vaults(&self, selection: &NetworkSelection) -> Vec<VaultRecord> {
        self.aggregate(selection).await.vaults
    }

    /// Same as [`fetch_vaults`](Self::fetch_vaults), wrapped in the provider
    /// envelope.
    pub async fn fetch_response(&self, selection: &NetworkSelection) -> VaultResponse {
        VaultResponse {
            data: self.fetch_vaults(selection).await,
        }
    }

    /// Fetch and rank vaults, reporting what happened to each network.
    pub async fn aggregate(&self, selection: &NetworkSelection) -> Aggregation {
        let (sources, unknown) = self.resolve(selection);

        for name in &unknown {
            warn!(network = %name, "Ignoring network with no registered source");
        }

        info!(
            "Fetching vaults from {} network(s): {}",
            sources.len(),
            sources
                .iter()
                .map(|s| s.network())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let results = match self.mode {
            FetchMode::Sequential => {
                let mut results = Vec::with_capacity(sources.len());
                for source in &sources {
                    results.push(self.fetch_one(source).await);
                }
                results
            }
            FetchMode::Parallel => join_all(sources.iter().map(|s| self.fetch_one(s))).await,
        };

        let mut vaults = Vec::new();
        let mut outcomes = Vec::with_capacity(results.len());

        for (network, result) in results {
            let status = match result {
                Ok(mut fetched) => {
                    let count = fetched.len();
                    vaults.append(&mut fetched);
                    FetchStatus::Fetched { count }
                }
                Err(reason) => FetchStatus::Failed { reason },
            };
            outcomes.push(NetworkOutcome { network, status });
        }

        rank_by_vault_score(&mut vaults);

        Aggregation {
            vaults,
            outcomes,
            unknown,
        }
    }

    /// Combined yield/risk score using this aggregator's weights.
    pub fn score(&self, vault: &VaultRecord) -> f64 {
        calculate_score(vault, self.weights.weight_yield, self.weights.weight_risk)
    }

    /// Split a selection into registered sources and unknown identifiers.
    ///
    /// Repeated identifiers are fetched once.
    fn resolve(&self, selection: &NetworkSelection) -> (Vec<SharedSource>, Vec<String>) {
        match selection {
            NetworkSelection::All => (
                self.registry
                    .networks()
                    .into_iter()
                    .filter_map(|n| self.registry.get(n).cloned())
                    .collect(),
                Vec::new(),
            ),
            NetworkSelection::Named(names) => {
                let mut sources: Vec<SharedSource> = Vec::new();
                let mut unknown: Vec<String> = Vec::new();

                for name in names {
                    match self.registry.get(name) {
                        Some(source) => {
                            if !sources.iter().any(|s| s.network() == name) {
                                sources.push(source.clone());
                            }
                        }
                        None => {
                            if !unknown.contains(name) {
                                unknown.push(name.clone());
                            }
                        }
                    }
                }

                (sources, unknown)
            }
        }
    }

    /// Fetch one network, turning failure into a reason string.
    async fn fetch_one(&self, source: &SharedSource) -> (String, Result<Vec<VaultRecord>, String>) {
        let network = source.network().to_string();

        match source.fetch(&self.session).await {
            Ok(vaults) => {
                debug!(network = %network, count = vaults.len(), "Network fetch succeeded");
                (network, Ok(vaults))
            }
            Err(err) => {
                warn!(network = %network, error = %err, "Error fetching vaults, skipping network");
                (network, Err(err.to_string()))
            }
        }
    }
}
