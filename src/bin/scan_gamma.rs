//! Scan open Polymarket markets using the outcome prices embedded in the Gamma catalog.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use arbscan::api::GammaClient;
use arbscan::config::{AppConfig, CONFIG_PATH};
use arbscan::reporter;
use arbscan::scanner::{self, NoDelay, ScanOptions};
use arbscan::source::VectorSource;

#[derive(Parser)]
#[command(name = "scan_gamma", about = "Scan Polymarket markets for sum(outcome prices) < 1.0")]
struct Args {
    /// Path to the TOML config file (defaults apply if it does not exist)
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Number of markets to fetch, overriding the config file
    #[arg(long)]
    limit: Option<u32>,

    /// Log each raw market record before pricing it
    #[arg(long)]
    show_raw: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::load_or_default(&args.config)?;
    let limit = args.limit.unwrap_or(config.settings.market_limit);
    if limit == 0 {
        anyhow::bail!("--limit must be positive");
    }

    info!("Starting Polymarket scan: limit={limit} show_raw={}", args.show_raw);

    let client = GammaClient::new(
        &config.gamma,
        Duration::from_secs(config.settings.request_timeout_secs),
    )?;
    let source = VectorSource::new(client);

    // Prices are embedded in the listing, so lookups cost no requests.
    let summary = scanner::run_scan(
        &source,
        &NoDelay,
        ScanOptions {
            limit,
            show_raw: args.show_raw,
        },
    )
    .await?;
    reporter::report_summary(&summary);

    Ok(())
}
