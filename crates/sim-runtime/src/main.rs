//! # Provenance-Chain Simulation Runtime
//!
//! Runs one supply-chain simulation, prints a summary and optionally writes
//! the snapshot consumed by the dashboard.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG` wins over `--log-level`)
//! 2. Load configuration (defaults → JSON file → environment → flags)
//! 3. Run the simulation
//! 4. Verify and export the snapshot

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sim_runtime::{BatchPolicy, SimulationConfig, SimulationDriver, SimulationSnapshot};

/// Provenance-Chain: supply-chain simulation over a proof-of-work ledger
#[derive(Parser, Debug)]
#[command(name = "sim-runtime")]
#[command(about = "Simulate products through the supply chain and commit every event to a ledger")]
struct Args {
    /// Number of products (1-100)
    #[arg(short, long)]
    products: Option<usize>,

    /// Required leading zero bits per block hash
    #[arg(short, long)]
    difficulty: Option<u32>,

    /// Nonce attempts per block before giving up
    #[arg(long)]
    max_attempts: Option<u64>,

    /// Mining threads (0 = one per CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// Batching policy: "wave" or a transaction count per block
    #[arg(short, long)]
    batch: Option<BatchPolicy>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Probability of an illegal request before each transition
    #[arg(long)]
    invalid_rate: Option<f64>,

    /// JSON config file (also read from PC_CONFIG)
    #[arg(short, long, env = "PC_CONFIG")]
    config: Option<PathBuf>,

    /// Write the snapshot JSON here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Build the config from defaults, file, environment and flags.
fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    config
        .apply_env(|key| std::env::var(key).ok())
        .context("applying PC_* environment overrides")?;

    if let Some(products) = args.products {
        config.num_products = products;
    }
    if let Some(difficulty) = args.difficulty {
        config.ledger.difficulty = difficulty;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.ledger.mining.max_attempts = max_attempts;
    }
    if let Some(threads) = args.threads {
        config.ledger.mining.threads = threads;
    }
    if let Some(batch) = args.batch {
        config.batch_policy = batch;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rate) = args.invalid_rate {
        config.invalid_event_rate = rate;
    }

    Ok(config)
}

fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("invalid log level")?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let config = load_config(&args)?;
    info!(
        "Configuration loaded: products={}, difficulty={}, batch={}, seed={}",
        config.num_products, config.ledger.difficulty, config.batch_policy, config.seed
    );

    let outcome = SimulationDriver::new(config)
        .context("invalid simulation configuration")?
        .run()
        .context("simulation aborted")?;

    let snapshot = SimulationSnapshot::from_outcome(&outcome);
    snapshot.verify().context("snapshot failed verification")?;

    let metrics = outcome.ledger.metrics().snapshot();
    println!("Run {}", outcome.report.run_id);
    println!(
        "  products:      {}",
        outcome.products.len()
    );
    println!(
        "  blocks:        {} (+ genesis)",
        outcome.report.blocks_committed
    );
    println!(
        "  transactions:  {}",
        outcome.report.transactions_committed
    );
    println!(
        "  rejected:      {}",
        outcome.report.rejected_events.len()
    );
    println!(
        "  hash attempts: {} ({:.1} per block)",
        metrics.hash_attempts,
        outcome.ledger.metrics().get_avg_attempts_per_block()
    );
    println!("  head:          {}", outcome.ledger.head().hash);
    println!("  elapsed:       {} ms", outcome.report.elapsed_ms);

    if let Some(path) = &args.output {
        snapshot
            .write_to(path)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}
