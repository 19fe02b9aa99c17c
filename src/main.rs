//! Service Monitor
//!
//! Probes a catalog of HTTP services and databases on a fixed period and
//! records one health record per service per cycle.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │                        SERVICE MONITOR                        │
//!   │                                                               │
//!   │  ┌───────────┐   tick   ┌────────────┐   units  ┌──────────┐  │
//!   │  │ scheduler │────────▶ │ dispatcher │────────▶ │  worker  │  │
//!   │  └───────────┘          └─────┬──────┘          │   pool   │  │
//!   │        ▲                      │ list_all        └────┬─────┘  │
//!   │        │ POST /check          ▼                      │        │
//!   │  ┌───────────┐          ┌────────────┐               ▼        │
//!   │  │    api    │◀──────── │   store    │         ┌──────────┐   │──▶ HTTP targets
//!   │  └───────────┘ results  │ catalog +  │◀─ save ─│ adapters │   │──▶ databases
//!   │                         │ result log │         │ http/db  │   │
//!   │                         └────────────┘         └──────────┘   │
//!   │                                                               │
//!   │  config (TOML, hot catalog reload) · logging · metrics        │
//!   └───────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use service_monitor::config::{load_config, MonitorConfig};
use service_monitor::lifecycle::signals::spawn_signal_listener;
use service_monitor::lifecycle::{Monitor, Shutdown};
use service_monitor::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "service-monitor")]
#[command(about = "Periodic health checks for HTTP services and databases", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single cycle, print its report and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        services = config.services.len(),
        databases = config.databases.len(),
        interval_secs = config.scheduler.interval_secs,
        "service-monitor starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let monitor = Monitor::build(config).await?;

    if args.once {
        let report = monitor.dispatcher.trigger().await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let _watcher = match &args.config {
        Some(path) => Some(monitor.watch_config(path, &shutdown)?),
        None => None,
    };

    monitor.run(shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
