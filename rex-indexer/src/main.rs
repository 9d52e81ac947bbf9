use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rex_core::PowerLedger;
use rex_indexer::{run, IndexerConfig, SledLedgerStore};

/// REX governance power indexer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines file of decoded REX and stkREX contract logs
    #[arg(short, long)]
    events: PathBuf,

    /// Directory of the ledger database (overrides the config file)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Path to the log file (optional). If not provided, logs will only go to stdout.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Path to the config file. Defaults to the platform config directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address of the REX token contract
    #[arg(long)]
    rex_contract: Option<String>,

    /// Address of the stkREX staking contract
    #[arg(long)]
    stk_rex_contract: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = IndexerConfig::load(args.config.as_deref());
    let mut cfg = loaded.as_ref().cloned().unwrap_or_default();

    // Override config with CLI arguments if provided
    if let Some(data_dir) = args.data_dir {
        cfg.data_dir = data_dir;
    }
    if let Some(log_level) = args.log_level {
        cfg.log_level = log_level;
    }
    if args.rex_contract.is_some() {
        cfg.rex_contract = args.rex_contract;
    }
    if args.stk_rex_contract.is_some() {
        cfg.stk_rex_contract = args.stk_rex_contract;
    }

    let (writer, _guard) = match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file);
            (BoxMakeWriter::new(non_blocking_writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
        .try_init()
        .context("setting default subscriber failed")?;

    if let Err(e) = &loaded {
        error!("Failed to load configuration: {:?}. Using default.", e);
    }
    info!("Indexer configuration: {:?}", cfg);

    let contracts = cfg.contracts()?;
    if contracts.is_empty() {
        bail!("no contract addresses configured; set rex_contract or stk_rex_contract");
    }

    let store = SledLedgerStore::open(&cfg.data_dir)
        .with_context(|| format!("failed to open ledger at {}", cfg.data_dir.display()))?;
    let input = File::open(&args.events)
        .with_context(|| format!("failed to open events file {}", args.events.display()))?;

    let mut ledger = PowerLedger::new(store);
    let result = run(&mut ledger, &contracts, BufReader::new(input));
    let flushed = ledger.store().flush()?;
    info!("Flushed {} bytes to {}", flushed, cfg.data_dir.display());

    let summary = result?;
    info!(
        "Indexed {} events ({} skipped, {} ignored, {} anomalies), cursor {:?}",
        summary.stats.events_applied,
        summary.stats.events_skipped,
        summary.logs_ignored,
        summary.stats.anomalies,
        summary.cursor
    );
    Ok(())
}
