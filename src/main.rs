//! HAProxy stats collector (daemon).
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐  show stat / show info   ┌───────────────────────────┐
//!   │   HAProxy    │◀─────────────────────────│ stats::transport          │
//!   │ stats socket │─────────────────────────▶│  (unix socket, 1s reads)  │
//!   └──────────────┘      CSV / key: value    └─────────────┬─────────────┘
//!                                                           │ lines
//!                                                           ▼
//!                                             ┌───────────────────────────┐
//!                                             │ stats::parser / uptime    │
//!                                             └─────────────┬─────────────┘
//!                                                           │ Entries
//!                                                           ▼
//!   ┌──────────────┐                          ┌───────────────────────────┐
//!   │ Prometheus   │◀── MetricSink ───────────│ collector                 │
//!   │ scrape + log │                          │  restart guard → tracker  │
//!   └──────────────┘                          │  → filters → emit         │
//!                                             └───────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use haproxy_collector::collector::{Collector, CycleOutcome};
use haproxy_collector::config::{load_config, CollectorConfig};
use haproxy_collector::lifecycle::{signals, Shutdown};
use haproxy_collector::observability::{logging, metrics, PrometheusSink};

#[derive(Parser)]
#[command(name = "haproxy-collector")]
#[command(about = "Poll HAProxy's stats socket and export its metrics", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single cycle and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CollectorConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!("haproxy-collector v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        socket = %config.socket_path,
        interval_secs = config.interval,
        restart_gap_secs = config.restart_gap,
        metric_categories = ?config.metric_categories(),
        notification_categories = ?config.notification_categories(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let mut collector = Collector::new(&config, PrometheusSink::new());

    if cli.once {
        return match collector.run_cycle().await {
            CycleOutcome::Completed(summary) => {
                tracing::info!(
                    entries = summary.entries,
                    submissions = summary.submissions,
                    "Single cycle complete"
                );
                Ok(())
            }
            CycleOutcome::RestartDetected { uptime } => {
                tracing::info!(uptime, "Single cycle skipped, load balancer restarted recently");
                Ok(())
            }
            CycleOutcome::Failed(e) => Err(e.into()),
        };
    }

    let shutdown = Shutdown::new();
    signals::spawn_handler(shutdown.clone());

    collector.run(shutdown.subscribe()).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
