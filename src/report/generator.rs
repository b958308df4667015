//! Report rendering.
//!
//! Markdown for humans, JSON for tooling, and the bare provider envelope for
//! anything that already consumes `{"data": [...]}`.

use super::{Report, ReportMetadata};
use crate::aggregator::{
    calculate_score, network_distribution, FetchStatus, NetworkOutcome, ScoreWeights,
};
use crate::models::{VaultRecord, VaultResponse};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# VaultScout Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_networks_section(
        &report.outcomes,
        &report.unknown_networks,
    ));
    output.push_str(&generate_ranking_section(&report.data, report.metadata.weights));

    if let Some(best) = report.data.first() {
        output.push_str(&generate_top_vault_section(best));
    }

    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Networks Requested:** {}\n",
        metadata.networks_requested
    ));
    section.push_str(&format!("- **Total Vaults:** {}\n", metadata.total_vaults));
    section.push_str(&format!(
        "- **Score Weights:** yield {} / risk {}\n",
        metadata.weights.weight_yield, metadata.weights.weight_risk
    ));
    section.push_str(&format!(
        "- **Fetch Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_networks_section(outcomes: &[NetworkOutcome], unknown: &[String]) -> String {
    let mut section = String::new();

    section.push_str("## Networks\n\n");

    if outcomes.is_empty() {
        section.push_str("No registered network was selected.\n\n");
    } else {
        section.push_str("| Network | Status | Vaults | Detail |\n");
        section.push_str("|:---|:---:|:---:|:---|\n");

        for outcome in outcomes {
            let row = match &outcome.status {
                FetchStatus::Fetched { count } => {
                    format!("| {} | ✅ ok | {} | |\n", outcome.network, count)
                }
                FetchStatus::Failed { reason } => {
                    format!(
                        "| {} | ❌ failed | 0 | {} |\n",
                        outcome.network,
                        escape_cell(reason)
                    )
                }
            };
            section.push_str(&row);
        }
        section.push('\n');
    }

    if !unknown.is_empty() {
        section.push_str(&format!(
            "*Ignored unregistered networks: {}*\n\n",
            unknown.join(", ")
        ));
    }

    section
}

fn generate_ranking_section(vaults: &[VaultRecord], weights: ScoreWeights) -> String {
    let mut section = String::new();

    section.push_str("## Ranked Vaults\n\n");

    if vaults.is_empty() {
        section.push_str("No vaults were returned by the selected networks.\n\n");
        return section;
    }

    let dist = network_distribution(vaults);
    section.push_str(
        &dist
            .iter()
            .map(|(network, count)| format!("**{}**: {}", network, count))
            .collect::<Vec<_>>()
            .join(" | "),
    );
    section.push_str("\n\n");

    section.push_str(
        "| # | Vault | Network | Protocol | Token | TVL (USD) | 7d APY | Vault Score | Combined |\n",
    );
    section.push_str("|---:|:---|:---|:---|:---|---:|---:|---:|---:|\n");

    for (i, vault) in vaults.iter().enumerate() {
        let combined = calculate_score(vault, weights.weight_yield, weights.weight_risk);
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {:.2}% | {:.1} | {:.2} |\n",
            i + 1,
            escape_cell(&vault.name),
            vault.network,
            escape_cell(&vault.protocol),
            vault.token.symbol,
            format_usd(vault),
            vault.seven_day_apy(),
            vault.scores.vault_score,
            combined
        ));
    }
    section.push('\n');

    section
}

fn generate_top_vault_section(vault: &VaultRecord) -> String {
    let mut section = String::new();

    section.push_str("## Top Vault\n\n");
    section.push_str(&format!("### {}\n\n", vault.label()));

    if !vault.description.is_empty() {
        section.push_str(&format!("{}\n\n", vault.description));
    }

    section.push_str(&format!("- **Address:** `{}`\n", vault.address));
    if let Some(chain_id) = vault.chain_id {
        section.push_str(&format!("- **Chain ID:** {}\n", chain_id));
    }
    section.push_str(&format!(
        "- **Token:** {} ({}, {} decimals)\n",
        vault.token.name, vault.token.symbol, vault.token.decimals
    ));
    section.push_str(&format!("- **TVL:** ${}\n", vault.tvl_usd));
    section.push_str(&format!("- **Holders:** {}\n", vault.number_of_holders));
    section.push_str(&format!(
        "- **APY (total):** 1d {:.2}% / 7d {:.2}% / 30d {:.2}%\n",
        vault.apy.total.day1, vault.apy.total.day7, vault.apy.total.day30
    ));
    section.push_str(&format!(
        "- **Withdraw Delay:** {}\n",
        if vault.has_withdraw_delay { "yes" } else { "no" }
    ));
    if !vault.tags.is_empty() {
        section.push_str(&format!("- **Tags:** {}\n", vault.tags.join(", ")));
    }
    section.push('\n');

    let s = &vault.scores;
    section.push_str(&format!("Scores by *{}*:\n\n", s.provider));
    section.push_str("| Vault | Asset | Holder | Network | Vault TVL | Protocol TVL |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} |\n\n",
        s.vault_score,
        s.asset_score,
        s.holder_score,
        s.network_score,
        s.vault_tvl_score,
        s.protocol_tvl_score
    ));

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by VaultScout*\n".to_string()
}

/// TVL with thousands separators when numeric, raw otherwise.
fn format_usd(vault: &VaultRecord) -> String {
    match vault.tvl_usd.as_f64() {
        Some(value) => group_thousands(value),
        None => vault.tvl_usd.to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    let whole = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);

    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Keep provider text from breaking the table layout.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate the bare provider envelope for the report's vaults.
pub fn generate_data_output(report: &Report) -> Result<String> {
    let response = VaultResponse {
        data: report.data.clone(),
    };
    serde_json::to_string_pretty(&response).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Aggregation;
    use crate::models::fixtures::vault;

    fn create_test_report() -> Report {
        let mut best = vault("Steakhouse", "EVM", 95.0);
        best.chain_id = Some(8453);

        let aggregation = Aggregation {
            vaults: vec![best, vault("Gauntlet", "EVM", 80.0)],
            outcomes: vec![
                NetworkOutcome {
                    network: "EVM".to_string(),
                    status: FetchStatus::Fetched { count: 2 },
                },
                NetworkOutcome {
                    network: "Sui".to_string(),
                    status: FetchStatus::Failed {
                        reason: "vault provider returned 502: bad | gateway".to_string(),
                    },
                },
            ],
            unknown: vec!["Aptos".to_string()],
        };

        Report::new(aggregation, "ALL".to_string(), 1.25, ScoreWeights::default(), None)
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# VaultScout Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Networks"));
        assert!(markdown.contains("## Ranked Vaults"));
        assert!(markdown.contains("## Top Vault"));
        assert!(markdown.contains("Steakhouse (Morpho)"));
        assert!(markdown.contains("Chain ID:** 8453"));
        assert!(markdown.contains("Ignored unregistered networks: Aptos"));
        assert!(markdown.contains("bad \\| gateway"));

        let first = markdown.find("| 1 | Steakhouse").unwrap();
        let second = markdown.find("| 2 | Gauntlet").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_ranking_row_values() {
        let section = generate_ranking_section(&[vault("A", "EVM", 80.0)], ScoreWeights::default());

        assert!(section.contains("**EVM**: 1"));
        assert!(section.contains("1,500,000"));
        assert!(section.contains("6.50%"));
        // 6.5 - (100 - 80)
        assert!(section.contains("-13.50"));
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new(
            Aggregation::default(),
            "UnknownNet".to_string(),
            0.0,
            ScoreWeights::default(),
            None,
        );
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("No registered network was selected."));
        assert!(markdown.contains("No vaults were returned"));
        assert!(!markdown.contains("## Top Vault"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.4), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(25000000.4), "25,000,000");
        assert_eq!(group_thousands(-1234567.0), "-1,234,567");
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["total_vaults"], 2);
        assert_eq!(value["outcomes"][1]["status"], "failed");
        assert_eq!(value["unknown_networks"][0], "Aptos");
        assert_eq!(value["data"][0]["scores"]["vaultScore"], 95.0);
    }

    #[test]
    fn test_generate_data_output_is_provider_envelope() {
        let json = generate_data_output(&create_test_report()).unwrap();
        let response: VaultResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].name, "Steakhouse");
        assert!(json.contains("\"7day\""));
    }
}
