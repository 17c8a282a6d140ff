use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::engine;
use crate::normalize::SkipReason;
use crate::reporter;
use crate::source::MarketSource;
use crate::types::{Market, OpportunityEvent, OutcomePriceSet, ScanSummary, Verdict};

/// Spacing between per-market lookups.
#[allow(async_fn_in_trait)]
pub trait Pacer {
    async fn pause(&self);
}

/// Sleeps a fixed interval on every pause.
pub struct FixedDelay(pub Duration);

impl Pacer for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.0).await;
    }
}

/// Never waits.
pub struct NoDelay;

impl Pacer for NoDelay {
    async fn pause(&self) {}
}

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub limit: u32,
    /// Log each raw market record before pricing it.
    pub show_raw: bool,
}

/// Fetch one page of markets and scan it.
///
/// A listing failure is fatal; per-market failures are counted as skips.
pub async fn run_scan<S, P>(source: &S, pacer: &P, options: ScanOptions) -> Result<ScanSummary>
where
    S: MarketSource,
    P: Pacer,
{
    let markets = source
        .list_markets(options.limit)
        .await
        .with_context(|| format!("[{}] market listing failed", source.venue()))?;
    Ok(scan_markets(source, pacer, &markets, options.show_raw).await)
}

/// Price and evaluate each market in listing order.
pub async fn scan_markets<S, P>(
    source: &S,
    pacer: &P,
    markets: &[Market],
    show_raw: bool,
) -> ScanSummary
where
    S: MarketSource,
    P: Pacer,
{
    let venue = source.venue();
    let mut summary = ScanSummary::new(venue);
    info!("[{venue}] Scanning {} markets for total cost < 1.0", markets.len());

    for (i, market) in markets.iter().enumerate() {
        if i > 0 && source.paces_lookups() {
            pacer.pause().await;
        }

        info!("[{venue}] Market #{}: {}", i + 1, market.label());
        if let Some(title) = &market.title {
            info!("[{venue}]   {title}");
        }
        if show_raw {
            match serde_json::to_string_pretty(&market.raw) {
                Ok(raw) => info!("[{venue}] Raw record:\n{raw}"),
                Err(e) => warn!("[{venue}] Could not render raw record: {e}"),
            }
        }

        match assess(source, market).await {
            Ok((prices, verdict)) => {
                log_verdict(venue, &prices, &verdict);
                if verdict.is_arbitrage {
                    reporter::report_opportunity(&OpportunityEvent {
                        timestamp: prices.observed_at.to_rfc3339(),
                        venue: venue.to_string(),
                        market_id: verdict.market_id.clone(),
                        title: verdict.title.clone(),
                        outcomes: prices.outcomes.clone(),
                        total_cost: verdict.total_cost,
                        edge: verdict.edge(),
                    });
                }
                summary.record_processed(&verdict);
            }
            Err(reason) => {
                if reason.is_no_data() {
                    info!("[{venue}]   Skipping {}: {reason}", market.label());
                } else {
                    warn!("[{venue}]   Skipping {}: {reason}", market.label());
                }
                summary.record_skipped(reason.kind());
            }
        }
    }

    summary.finish();
    info!(
        "[{venue}] Scan complete: scanned={} processed={} skipped={} opportunities={}",
        summary.scanned, summary.processed, summary.skipped, summary.opportunities
    );
    summary
}

/// Resolve prices and apply the decision rule; an empty set becomes `NoData`.
async fn assess<S: MarketSource>(
    source: &S,
    market: &Market,
) -> Result<(OutcomePriceSet, Verdict), SkipReason> {
    let prices = source.get_prices(market).await?;
    let verdict = engine::evaluate(market, &prices).ok_or(SkipReason::NoData)?;
    Ok((prices, verdict))
}

fn log_verdict(venue: &str, prices: &OutcomePriceSet, verdict: &Verdict) {
    for outcome in &prices.outcomes {
        debug!("[{venue}]   - {}: {:.3}", outcome.label, outcome.price);
    }
    if verdict.is_arbitrage {
        info!(
            "[{venue}]   Total cost {:.4} -> arbitrage opportunity (edge {:.4})",
            verdict.total_cost,
            verdict.edge()
        );
    } else {
        info!(
            "[{venue}]   Total cost {:.4} -> no arbitrage",
            verdict.total_cost
        );
    }
}
