//! Storefront CLI - Command line interface for the sync core.
//!
//! Runs data syncs against an in-memory backend so retry and single-flight
//! behavior can be observed without the hosted services.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use storefront_common::TableName;
use storefront_sync::{DataSync, MemoryBackend, SyncConfig, SyncOutcome};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront - Data sync tooling")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync one table into another using the in-memory backend.
    Sync {
        /// Table to copy records from.
        #[arg(short, long)]
        source: String,

        /// Table to copy records into.
        #[arg(short, long)]
        target: String,

        /// Number of records to seed into the source table.
        #[arg(short, long, default_value_t = 10)]
        records: usize,

        /// Number of backend calls that fail before one succeeds.
        #[arg(long, default_value_t = 0)]
        fail_times: u32,

        /// Backend latency per call, in milliseconds.
        #[arg(long, default_value_t = 0)]
        latency_ms: u64,

        /// Issue a second sync before the first completes.
        #[arg(long)]
        overlap: bool,

        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Print the effective sync configuration.
    Config {
        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(clap::Args)]
struct RetryArgs {
    /// JSON config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of attempts.
    #[arg(long)]
    attempts: Option<u32>,

    /// Override the delay between attempts, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Sync {
            source,
            target,
            records,
            fail_times,
            latency_ms,
            overlap,
            retry,
        } => {
            let config = resolve_config(&retry).await?;
            let backend = MemoryBackend::new()
                .with_failures(fail_times)
                .with_latency(Duration::from_millis(latency_ms));
            cmd_sync(backend, config, &source, &target, records, overlap).await
        }

        Commands::Config { retry } => cmd_config(&retry).await,

        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "storefront", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the config file, if any, and apply command-line overrides.
async fn resolve_config(args: &RetryArgs) -> Result<SyncConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path).await?,
        None => SyncConfig::default(),
    };

    if let Some(attempts) = args.attempts {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.retry.delay = Duration::from_millis(delay_ms);
    }

    config.validate().context("Invalid sync configuration")?;
    Ok(config)
}

async fn load_config(path: &Path) -> Result<SyncConfig> {
    SyncConfig::load(path)
        .await
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Seed the source table and run the sync.
async fn cmd_sync(
    backend: MemoryBackend,
    config: SyncConfig,
    source: &str,
    target: &str,
    records: usize,
    overlap: bool,
) -> Result<()> {
    let source_table = TableName::new(source).context("Invalid source table")?;
    backend
        .insert(
            &source_table,
            (0..records).map(|id| serde_json::json!({ "id": id })),
        )
        .await;

    let sync = DataSync::new(Arc::new(backend), config).context("Failed to create data sync")?;

    info!("Syncing {} into {}", source, target);
    let outcome = if overlap {
        let first = sync.sync_data(source, target);
        let second = sync.sync_data(source, target);
        print_outcome("overlapping", &second.await)?;
        first.await
    } else {
        sync.sync_data(source, target).await
    };
    print_outcome("sync", &outcome)?;

    let stats = sync.stats().await;
    println!("Stats: {}", serde_json::to_string(&stats)?);

    if !outcome.success {
        anyhow::bail!("Sync failed: {}", outcome.message);
    }
    Ok(())
}

/// Print the effective configuration as JSON.
async fn cmd_config(args: &RetryArgs) -> Result<()> {
    let config = resolve_config(args).await?;
    println!("{}", config.to_json()?);
    Ok(())
}

fn print_outcome(label: &str, outcome: &SyncOutcome) -> Result<()> {
    println!("{}: {}", label, serde_json::to_string_pretty(outcome)?);
    Ok(())
}
