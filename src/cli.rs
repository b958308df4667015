//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// VaultScout - multi-network yield vault aggregator
///
/// Fetch vaults from every registered network, merge them and rank them by
/// vault score. Markdown/JSON reports.
///
/// Examples:
///   vaultscout --conversation-id 2a7847a4-098c-4c97-b006-103e161b0b33
///   vaultscout --networks EVM,Sui --top 10 --format json
///   vaultscout --networks EVM --format data --output vaults.json
///   vaultscout --list-networks
///   vaultscout --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Networks to fetch from
    ///
    /// "ALL" for every registered network, a single name, or a
    /// comma-separated list (e.g. EVM,Sui). Unknown names are ignored.
    #[arg(short, long, default_value = "ALL", value_name = "LIST")]
    pub networks: String,

    /// Conversation id sent to the vault provider
    #[arg(long, value_name = "ID", env = "VAULTSCOUT_CONVERSATION_ID")]
    pub conversation_id: Option<String>,

    /// User id sent to the vault provider
    #[arg(long, value_name = "ID", env = "VAULTSCOUT_USER_ID")]
    pub user_id: Option<String>,

    /// EVM vault provider endpoint
    #[arg(long, value_name = "URL", env = "VAULTSCOUT_EVM_URL")]
    pub evm_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Fetch all networks concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Weight of the 7-day APY in the combined score
    #[arg(long, value_name = "WEIGHT")]
    pub weight_yield: Option<f64>,

    /// Weight of the risk term (100 - vault score) in the combined score
    #[arg(long, value_name = "WEIGHT")]
    pub weight_risk: Option<f64>,

    /// Only report the best N vaults
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Output format (markdown, json, data)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report
    ///
    /// The report is printed to stdout when not set.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .vaultscout.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the registered networks and exit
    #[arg(long)]
    pub list_networks: bool,

    /// Generate a default .vaultscout.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON report with metadata and network outcomes
    Json,
    /// Raw provider envelope: {"data": [...]}
    Data,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config || self.list_networks {
            return Ok(());
        }

        if let Some(ref url) = self.evm_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("EVM URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.top == Some(0) {
            return Err("Top must be at least 1".to_string());
        }

        for (flag, weight) in [
            ("--weight-yield", self.weight_yield),
            ("--weight-risk", self.weight_risk),
        ] {
            if let Some(w) = weight {
                if !w.is_finite() {
                    return Err(format!("{} must be a finite number", flag));
                }
            }
        }

        Ok(())
    }

}

/// Build the log filter: `RUST_LOG`-style directives when given, else `level`.
pub fn log_filter(level: tracing::Level, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives.unwrap_or_default())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            networks: "ALL".to_string(),
            conversation_id: None,
            user_id: None,
            evm_url: None,
            timeout: None,
            parallel: false,
            weight_yield: None,
            weight_risk: None,
            top: None,
            format: OutputFormat::Markdown,
            output: None,
            config: None,
            verbose: false,
            quiet: false,
            list_networks: false,
            init_config: false,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.evm_url = Some("ftp://vaults".to_string());
        assert!(args.validate().is_err());

        args.evm_url = Some("https://vaults.example/api".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.top = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_non_finite_weight() {
        let mut args = make_args();
        args.weight_risk = Some(f64::NAN);
        let err = args.validate().unwrap_err();
        assert!(err.contains("--weight-risk"));
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_filter_defaults_to_level() {
        let filter = log_filter(tracing::Level::DEBUG, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = log_filter(tracing::Level::ERROR, Some(""));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn test_log_filter_honours_directives() {
        let filter = log_filter(tracing::Level::INFO, Some("trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "vaultscout",
            "--networks",
            "EVM,Sui",
            "--conversation-id",
            "conv-1",
            "--format",
            "data",
            "--top",
            "3",
            "--parallel",
        ])
        .unwrap();

        assert_eq!(args.networks, "EVM,Sui");
        assert_eq!(args.conversation_id.as_deref(), Some("conv-1"));
        assert_eq!(args.format, OutputFormat::Data);
        assert_eq!(args.top, Some(3));
        assert!(args.parallel);
    }
}
