//! Data models for vault records.
//!
//! These types mirror the vault provider's JSON payload. Field names in code
//! are snake_case; the wire names (camelCase, plus the literal `1day`/`7day`/
//! `30day` APY keys) are preserved through serde renames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric quantity that providers send either as a string or a number.
///
/// The value re-serializes in the form it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl Amount {
    /// Parse the amount as a float, if it holds a valid number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Text(s) => s.trim().parse().ok(),
            Amount::Number(n) => n.as_f64(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Text(s) => write!(f, "{}", s),
            Amount::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Amount::Text(s.to_string())
    }
}

/// The deposit token of a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub symbol: String,
    pub address: String,
    pub decimals: u32,
}

/// Yield percentages over trailing 1/7/30 day windows.
///
/// Missing buckets default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ApyMetrics {
    #[serde(rename = "1day", default)]
    pub day1: f64,
    #[serde(rename = "7day", default)]
    pub day7: f64,
    #[serde(rename = "30day", default)]
    pub day30: f64,
}

/// Base and total (base plus rewards) APY.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Apy {
    pub base: ApyMetrics,
    pub total: ApyMetrics,
}

/// Externally computed risk and quality scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    /// Who computed the scores.
    pub provider: String,
    pub asset_score: f64,
    /// Primary ranking key.
    pub vault_score: f64,
    pub holder_score: f64,
    pub network_score: f64,
    pub vault_tvl_score: f64,
    pub protocol_tvl_score: f64,
}

/// One yield-bearing vault as reported by a network source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    /// On-chain address (opaque).
    pub address: String,
    /// EVM chain id, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    pub name: String,
    pub description: String,
    pub protocol: String,
    pub number_of_holders: Amount,
    pub tvl_usd: Amount,
    /// TVL denominated in the deposit token, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvl_native: Option<Amount>,
    pub token: Token,
    pub apy: Apy,
    pub scores: Scores,
    pub has_withdraw_delay: bool,
    /// Network identifier, e.g. "EVM", "Sui" or "Solana".
    pub network: String,
    pub tags: Vec<String>,
}

impl VaultRecord {
    /// The 7-day total APY, used as the yield metric.
    pub fn seven_day_apy(&self) -> f64 {
        self.apy.total.day7
    }

    /// Short "name (protocol)" label for summaries.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.protocol)
    }
}

/// Envelope returned by vault providers: `{"data": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultResponse {
    pub data: Vec<VaultRecord>,
}

/// Caller identity sent to vault providers with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub conversation_id: String,
    pub user_id: String,
}

impl Session {
    pub fn new(conversation_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a record with the given identity and vault score.
    pub fn vault(name: &str, network: &str, vault_score: f64) -> VaultRecord {
        VaultRecord {
            address: format!("0x{}", name.to_lowercase()),
            chain_id: None,
            name: name.to_string(),
            description: format!("{} vault", name),
            protocol: "Morpho".to_string(),
            number_of_holders: "120".into(),
            tvl_usd: "1500000.25".into(),
            tvl_native: None,
            token: Token {
                name: "USD Coin".to_string(),
                symbol: "USDC".to_string(),
                address: "0xa0b8".to_string(),
                decimals: 6,
            },
            apy: Apy {
                base: ApyMetrics {
                    day1: 4.0,
                    day7: 4.5,
                    day30: 5.0,
                },
                total: ApyMetrics {
                    day1: 6.0,
                    day7: 6.5,
                    day30: 7.0,
                },
            },
            scores: Scores {
                provider: "vaults.fyi".to_string(),
                asset_score: 90.0,
                vault_score,
                holder_score: 70.0,
                network_score: 95.0,
                vault_tvl_score: 60.0,
                protocol_tvl_score: 85.0,
            },
            has_withdraw_delay: false,
            network: network.to_string(),
            tags: vec!["stablecoin".to_string()],
        }
    }
}
