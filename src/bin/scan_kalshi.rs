//! Scan open Kalshi markets, pricing each binary market from its latest trade.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use arbscan::api::KalshiClient;
use arbscan::config::{AppConfig, CONFIG_PATH, Environment};
use arbscan::reporter;
use arbscan::scanner::{self, FixedDelay, ScanOptions};
use arbscan::source::TradeTickSource;

#[derive(Parser)]
#[command(name = "scan_kalshi", about = "Scan Kalshi markets for yes + no < 1.0")]
struct Args {
    /// Path to the TOML config file (defaults apply if it does not exist)
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Kalshi environment, overriding the config file
    #[arg(long, value_enum)]
    env: Option<Environment>,

    /// Number of markets to fetch, overriding the config file
    #[arg(long)]
    limit: Option<u32>,
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
    let mut config = AppConfig::load_or_default(&args.config)?;
    if let Some(env) = args.env {
        config.kalshi.environment = env;
    }
    let limit = args.limit.unwrap_or(config.settings.market_limit);
    if limit == 0 {
        anyhow::bail!("--limit must be positive");
    }

    info!(
        "Starting Kalshi scan: env={:?} limit={limit} pace={}ms",
        config.kalshi.environment, config.settings.pace_ms
    );

    let client = KalshiClient::new(
        &config.kalshi,
        Duration::from_secs(config.settings.request_timeout_secs),
    )?;
    let source = TradeTickSource::new(client);
    let pacer = FixedDelay(Duration::from_millis(config.settings.pace_ms));

    let summary = scanner::run_scan(
        &source,
        &pacer,
        ScanOptions {
            limit,
            show_raw: false,
        },
    )
    .await?;
    reporter::report_summary(&summary);

    Ok(())
}
