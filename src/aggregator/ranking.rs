//! Vault ranking and scoring utilities.

use crate::models::VaultRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Weights for the combined yield/risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreWeights {
    pub weight_yield: f64,
    pub weight_risk: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            weight_yield: 1.0,
            weight_risk: 1.0,
        }
    }
}

/// Sort vaults by `vaultScore`, highest first.
///
/// The sort is stable: vaults with equal scores keep their arrival order.
pub fn rank_by_vault_score(vaults: &mut [VaultRecord]) {
    vaults.sort_by(|a, b| b.scores.vault_score.total_cmp(&a.scores.vault_score));
}

/// Combine yield and risk into a single score.
///
/// Yield is the 7-day total APY; risk is `100 - vaultScore`. The result is
/// `weight_yield * yield - weight_risk * risk`. This is not used for ranking.
pub fn calculate_score(vault: &VaultRecord, weight_yield: f64, weight_risk: f64) -> f64 {
    let yield_value = vault.seven_day_apy();
    let risk_value = 100.0 - vault.scores.vault_score;
    weight_yield * yield_value - weight_risk * risk_value
}

/// The first `n` vaults of an already ranked list.
pub fn top_vaults(vaults: &[VaultRecord], n: usize) -> &[VaultRecord] {
    &vaults[..n.min(vaults.len())]
}

/// Number of vaults per network.
pub fn network_distribution(vaults: &[VaultRecord]) -> BTreeMap<String, usize> {
    let mut dist = BTreeMap::new();

    for vault in vaults {
        *dist.entry(vault.network.clone()).or_default() += 1;
    }

    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::vault;

    #[test]
    fn test_rank_descending() {
        let mut vaults = vec![
            vault("Low", "EVM", 10.0),
            vault("High", "Sui", 99.0),
            vault("Mid", "EVM", 55.5),
        ];

        rank_by_vault_score(&mut vaults);

        let names: Vec<_> = vaults.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
        assert!(vaults
            .windows(2)
            .all(|w| w[0].scores.vault_score >= w[1].scores.vault_score));
    }

    #[test]
    fn test_rank_ties_keep_arrival_order() {
        let mut vaults = vec![
            vault("First", "EVM", 70.0),
            vault("Top", "EVM", 90.0),
            vault("Second", "Sui", 70.0),
            vault("Third", "Solana", 70.0),
        ];

        rank_by_vault_score(&mut vaults);

        let names: Vec<_> = vaults.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Top", "First", "Second", "Third"]);
    }

    #[test]
    fn test_rank_negative_and_zero_scores() {
        let mut vaults = vec![
            vault("Zero", "EVM", 0.0),
            vault("Negative", "EVM", -5.0),
            vault("Positive", "EVM", 1.0),
        ];

        rank_by_vault_score(&mut vaults);
        assert_eq!(vaults[0].name, "Positive");
        assert_eq!(vaults[2].name, "Negative");
    }

    #[test]
    fn test_calculate_score() {
        // 7-day total APY in the fixture is 6.5
        let v = vault("A", "EVM", 80.0);

        assert_eq!(calculate_score(&v, 1.0, 1.0), 6.5 - 20.0);
        assert_eq!(calculate_score(&v, 2.0, 0.5), 13.0 - 10.0);
        assert_eq!(calculate_score(&v, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_calculate_score_perfect_vault_has_no_risk() {
        let v = vault("Safe", "EVM", 100.0);
        assert_eq!(calculate_score(&v, 1.0, 10.0), 6.5);
    }

    #[test]
    fn test_top_vaults_bounds() {
        let vaults = vec![vault("A", "EVM", 3.0), vault("B", "EVM", 2.0)];

        assert_eq!(top_vaults(&vaults, 1).len(), 1);
        assert_eq!(top_vaults(&vaults, 5).len(), 2);
        assert!(top_vaults(&vaults, 0).is_empty());
    }

    #[test]
    fn test_network_distribution() {
        let vaults = vec![
            vault("A", "EVM", 1.0),
            vault("B", "Sui", 1.0),
            vault("C", "EVM", 1.0),
        ];

        let dist = network_distribution(&vaults);
        assert_eq!(dist.get("EVM"), Some(&2));
        assert_eq!(dist.get("Sui"), Some(&1));
        assert_eq!(dist.get("Solana"), None);
    }
}
