//! VaultScout - multi-network yield vault aggregator
//!
//! Fetches vaults from every selected network, ranks them by vault score
//! and writes a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success (including networks that returned no vaults)
//!   1 - Runtime error (invalid arguments, config, output file, etc.)
//!   2 - Every selected network failed to fetch

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use vaultscout::aggregator::{FetchStatus, ScoreWeights};
use vaultscout::cli::{self, Args, OutputFormat};
use vaultscout::config::{Config, ConfigOrigin};
use vaultscout::report::{self, Report};
use vaultscout::sources::default_registry;
use vaultscout::{FetchMode, NetworkSelection, Session, VaultAggregator};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        handle_init_config();
    }

    let (mut config, origin) = match Config::resolve(args.config.as_deref(), Path::new(".")) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level(args.quiet));

    info!("VaultScout v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    log_config_origin(&origin);

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Aggregation failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .vaultscout.toml and exit.
fn handle_init_config() -> ! {
    match Config::write_default(Path::new(".")) {
        Ok(path) => {
            println!("✅ Created {} with default settings.", path.display());
            println!("   Set provider.conversation_id before fetching.");
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("⚠️  {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize logging; `RUST_LOG` overrides the computed level.
fn init_logging(level: tracing::Level) {
    let directives = std::env::var("RUST_LOG").ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(cli::log_filter(level, directives.as_deref()))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn log_config_origin(origin: &ConfigOrigin) {
    match origin {
        ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
        ConfigOrigin::Discovered(path) => info!("Loaded default config from {}", path.display()),
        ConfigOrigin::Defaults => debug!("No config file found, using defaults"),
        ConfigOrigin::Fallback(reason) => warn!("Failed to load config: {}", reason),
    }
}

/// Run the aggregation workflow. Returns the exit code (0 or 2).
async fn run(args: Args, config: Config) -> Result<i32> {
    let timeout = Duration::from_secs(config.provider.timeout_seconds);
    let registry = default_registry(&config.provider.evm_url, timeout);

    if args.list_networks {
        println!("Registered networks:");
        for network in registry.networks() {
            println!("  - {}", network);
        }
        return Ok(0);
    }

    let session = Session::new(config.conversation_id()?, config.provider.user_id.clone());
    let weights = ScoreWeights::from(&config.scoring);
    let mode = if config.general.parallel {
        FetchMode::Parallel
    } else {
        FetchMode::Sequential
    };

    let aggregator = VaultAggregator::new(registry, session)
        .with_weights(weights)
        .with_mode(mode);

    let selection = NetworkSelection::parse(&args.networks);
    let show_progress = !args.quiet;

    if show_progress {
        eprintln!("📡 Fetching vaults from: {}", selection);
    }

    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Querying vault providers...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let start_time = Instant::now();
    let aggregation = aggregator.aggregate(&selection).await;
    let duration = start_time.elapsed().as_secs_f64();

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if show_progress {
        print_summary(&aggregation, duration);
    }

    let exit_code = aggregation.exit_code();

    let report = Report::new(
        aggregation,
        selection.to_string(),
        duration,
        weights,
        config.general.top,
    );

    let output = match args.format {
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Data => report::generate_data_output(&report)?,
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if show_progress {
                eprintln!("\n✅ Report saved to: {}", path.display());
            }
        }
        None => println!("{}", output),
    }

    if exit_code != 0 {
        eprintln!(
            "\n⛔ Every selected network failed to fetch (exit code {}).",
            exit_code
        );
    }

    Ok(exit_code)
}

/// Print per-network results and the best vault to stderr.
fn print_summary(aggregation: &vaultscout::Aggregation, duration: f64) {
    eprintln!("\n📊 Fetch Summary:");

    for outcome in &aggregation.outcomes {
        match &outcome.status {
            FetchStatus::Fetched { count } => {
                eprintln!("   ✅ {}: {} vaults", outcome.network, count)
            }
            FetchStatus::Failed { reason } => {
                eprintln!("   ❌ {}: {}", outcome.network, reason)
            }
        }
    }

    if !aggregation.unknown.is_empty() {
        eprintln!("   ⚠️  Ignored: {}", aggregation.unknown.join(", "));
    }

    eprintln!("   Total vaults: {}", aggregation.vaults.len());

    if let Some(top) = aggregation.vaults.first() {
        eprintln!("   Top vault: {}", top.label());
        eprintln!("   TVL: ${}", top.tvl_usd);
        eprintln!("   7-day APY: {}%", top.seven_day_apy());
    }

    eprintln!("   Duration: {:.1}s", duration);
}
