//! Aggregation reports.

pub mod generator;

pub use generator::{generate_data_output, generate_json_report, generate_markdown_report};

use crate::aggregator::{top_vaults, Aggregation, NetworkOutcome, ScoreWeights};
use crate::models::VaultRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata about one aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// The network selection as requested.
    pub networks_requested: String,
    /// Wall time spent fetching, in seconds.
    pub duration_seconds: f64,
    /// Vaults fetched before any `top` truncation.
    pub total_vaults: usize,
    /// Weights used for the combined score column.
    pub weights: ScoreWeights,
}

/// A complete aggregation report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Per-network results in selection order.
    pub outcomes: Vec<NetworkOutcome>,
    /// Requested networks that have no registered source.
    pub unknown_networks: Vec<String>,
    /// Ranked vaults, highest vault score first.
    pub data: Vec<VaultRecord>,
}

impl Report {
    /// Build a report from an aggregation, keeping at most `top` vaults.
    pub fn new(
        aggregation: Aggregation,
        networks_requested: String,
        duration_seconds: f64,
        weights: ScoreWeights,
        top: Option<usize>,
    ) -> Self {
        let total_vaults = aggregation.vaults.len();
        let data = match top {
            Some(n) => top_vaults(&aggregation.vaults, n).to_vec(),
            None => aggregation.vaults,
        };

        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                networks_requested,
                duration_seconds,
                total_vaults,
                weights,
            },
            outcomes: aggregation.outcomes,
            unknown_networks: aggregation.unknown,
            data,
        }
    }
}
