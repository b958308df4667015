//! VaultScout - multi-network yield vault aggregation.
//!
//! Vaults are fetched from per-network [`sources::VaultSource`]s registered in
//! a [`sources::SourceRegistry`], merged by the
//! [`aggregator::VaultAggregator`] and ranked by vault score.

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod sources;

pub use aggregator::{Aggregation, FetchMode, NetworkSelection, VaultAggregator};
pub use error::FetchError;
pub use models::{Session, VaultRecord, VaultResponse};
