//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.vaultscout.toml` files.

use crate::aggregator::ScoreWeights;
use crate::sources::DEFAULT_EVM_URL;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".vaultscout.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Vault provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Combined score weights.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Fetch all networks concurrently instead of one after another.
    #[serde(default)]
    pub parallel: bool,

    /// Only report the best N vaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
}

/// Vault provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// EVM vault endpoint.
    #[serde(default = "default_evm_url")]
    pub evm_url: String,

    /// Conversation id sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,

    /// User id sent with every request.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            evm_url: default_evm_url(),
            conversation_id: None,
            user_id: default_user_id(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_evm_url() -> String {
    DEFAULT_EVM_URL.to_string()
}

fn default_user_id() -> String {
    "default_user".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Weights for the combined yield/risk score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_weight")]
    pub weight_yield: f64,

    #[serde(default = "default_weight")]
    pub weight_risk: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weight_yield: default_weight(),
            weight_risk: default_weight(),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOrigin {
    /// Loaded from the path given with `--config`.
    Explicit(PathBuf),
    /// Loaded from `.vaultscout.toml` in the working directory.
    Discovered(PathBuf),
    /// No config file found.
    Defaults,
    /// The discovered file could not be read or parsed.
    Fallback(String),
}

impl From<&ScoringConfig> for ScoreWeights {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            weight_yield: config.weight_yield,
            weight_risk: config.weight_risk,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from `.vaultscout.toml` in `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);

        if path.exists() {
            Ok(Some(Self::load(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Resolve the active configuration.
    ///
    /// An explicit path must load. A discovered file that fails to load falls
    /// back to defaults, with the reason kept in the origin.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<(Self, ConfigOrigin)> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            return Ok((config, ConfigOrigin::Explicit(path.to_path_buf())));
        }

        match Self::load_from_dir(dir) {
            Ok(Some(config)) => Ok((config, ConfigOrigin::Discovered(dir.join(CONFIG_FILE_NAME)))),
            Ok(None) => Ok((Self::default(), ConfigOrigin::Defaults)),
            Err(e) => Ok((Self::default(), ConfigOrigin::Fallback(format!("{:#}", e)))),
        }
    }

    /// Write the default config file into `dir`, refusing to overwrite.
    pub fn write_default(dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);

        if path.exists() {
            bail!(
                "{} already exists. Remove it first or edit it manually.",
                CONFIG_FILE_NAME
            );
        }

        std::fs::write(&path, Self::default_toml())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }

    /// Log level after merging; `quiet` wins over a configured `verbose`.
    pub fn log_level(&self, quiet: bool) -> Level {
        if quiet {
            Level::ERROR
        } else if self.general.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.evm_url {
            self.provider.evm_url = url.clone();
        }
        if let Some(ref id) = args.conversation_id {
            self.provider.conversation_id = Some(id.clone());
        }
        if let Some(ref id) = args.user_id {
            self.provider.user_id = id.clone();
        }
        if let Some(timeout) = args.timeout {
            self.provider.timeout_seconds = timeout;
        }

        if let Some(weight) = args.weight_yield {
            self.scoring.weight_yield = weight;
        }
        if let Some(weight) = args.weight_risk {
            self.scoring.weight_risk = weight;
        }

        if args.top.is_some() {
            self.general.top = args.top;
        }

        // Flags always override
        if args.parallel {
            self.general.parallel = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Conversation id, required before any provider call.
    pub fn conversation_id(&self) -> Result<&str> {
        self.provider
            .conversation_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .context("No conversation id: pass --conversation-id or set provider.conversation_id")
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
