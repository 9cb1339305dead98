use std::path::PathBuf;

use clap::{Parser, Subcommand};

use haproxy_collector::collector::{Collector, CycleOutcome};
use haproxy_collector::config::{load_config, CollectorConfig};
use haproxy_collector::observability::{logging, MemorySink};
use haproxy_collector::stats::parser::fetch_entries;
use haproxy_collector::stats::transport::{DEFAULT_SOCKET_PATH, SHOW_INFO};
use haproxy_collector::stats::uptime::fetch_uptime;
use haproxy_collector::stats::{StatsParser, StatsSocket};

#[derive(Parser)]
#[command(name = "hapstat")]
#[command(about = "Inspect an HAProxy stats socket", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    /// Interval used to scale session counters.
    #[arg(short, long, default_value_t = 10)]
    interval: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print parsed stats entries as JSON
    Stat,
    /// Print the raw "show info" response
    Info,
    /// Print the load balancer uptime in seconds
    Uptime,
    /// Run one collection cycle and print what would be submitted
    DryRun {
        /// Configuration file; socket and interval flags are ignored when set.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init("warn");

    let socket = StatsSocket::new(&cli.socket);

    match cli.command {
        Commands::Stat => {
            let entries = fetch_entries(&socket, &StatsParser::new(cli.interval)).await?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Commands::Info => {
            for line in socket.query(SHOW_INFO).await? {
                println!("{}", line);
            }
        }
        Commands::Uptime => {
            println!("{}", fetch_uptime(&socket).await?);
        }
        Commands::DryRun { config } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => CollectorConfig {
                    socket_path: cli.socket.display().to_string(),
                    interval: cli.interval,
                    restart_gap: cli.interval.max(CollectorConfig::default().restart_gap),
                    ..CollectorConfig::default()
                },
            };

            let mut collector = Collector::new(&config, MemorySink::new());
            match collector.run_cycle().await {
                CycleOutcome::Completed(summary) => {
                    let sink = collector.into_sink();
                    for submission in &sink.submissions {
                        println!("{}", submission);
                    }
                    eprintln!(
                        "{} entries, {} filtered, {} submissions",
                        summary.entries, summary.filtered, summary.submissions
                    );
                }
                CycleOutcome::RestartDetected { uptime } => {
                    eprintln!("Load balancer uptime {}s is inside the restart gap, nothing submitted", uptime);
                }
                CycleOutcome::Failed(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
