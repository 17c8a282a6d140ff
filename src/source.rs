//! Venue adapters: list open markets and resolve per-market outcome prices.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::{GammaApi, KalshiApi};
use crate::normalize::{self, SkipReason};
use crate::types::{Market, OutcomePriceSet};

/// A venue the scanner can pull markets and prices from.
#[allow(async_fn_in_trait)]
pub trait MarketSource {
    fn venue(&self) -> &'static str;

    /// Whether each `get_prices` call costs a network round-trip and should be paced.
    fn paces_lookups(&self) -> bool;

    /// One page of active, not-closed markets in venue order.
    async fn list_markets(&self, limit: u32) -> Result<Vec<Market>>;

    /// Current outcome prices for one market. An empty set means "no data".
    async fn get_prices(&self, market: &Market) -> Result<OutcomePriceSet, SkipReason>;
}

fn retain_open(venue: &str, markets: Vec<Market>) -> Vec<Market> {
    let received = markets.len();
    let open: Vec<Market> = markets.into_iter().filter(Market::is_open).collect();
    if open.len() < received {
        debug!("[{venue}] Dropped {} inactive or closed market(s)", received - open.len());
    }
    open
}

/// Binary yes/no markets priced from their most recent trade.
pub struct TradeTickSource<C> {
    client: C,
}

impl<C: KalshiApi> TradeTickSource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: KalshiApi> MarketSource for TradeTickSource<C> {
    fn venue(&self) -> &'static str {
        "kalshi"
    }

    fn paces_lookups(&self) -> bool {
        true
    }

    async fn list_markets(&self, limit: u32) -> Result<Vec<Market>> {
        info!("Fetching open markets: GET {} (limit={limit})", self.client.markets_url());
        let body = self
            .client
            .markets(limit)
            .await
            .context("failed to fetch Kalshi markets")?;
        let records = body
            .get("markets")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        info!("Received {} markets", records.len());

        let markets = records
            .into_iter()
            .map(|raw| Market::from_record(raw, &["ticker"], &["title"]))
            .collect();
        Ok(retain_open(self.venue(), markets))
    }

    async fn get_prices(&self, market: &Market) -> Result<OutcomePriceSet, SkipReason> {
        if market.id.is_empty() {
            return Err(SkipReason::MissingField("ticker"));
        }
        let history = self
            .client
            .trades(&market.id, 1)
            .await
            .map_err(|e| SkipReason::Fetch(format!("{e:#}")))?;
        normalize::normalize_trade(normalize::latest_trade(&history))
    }
}

/// Markets priced from the outcome/price vectors embedded in each record.
pub struct VectorSource<C> {
    client: C,
}

impl<C: GammaApi> VectorSource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: GammaApi> MarketSource for VectorSource<C> {
    fn venue(&self) -> &'static str {
        "polymarket"
    }

    fn paces_lookups(&self) -> bool {
        false
    }

    async fn list_markets(&self, limit: u32) -> Result<Vec<Market>> {
        info!("Fetching markets from {} (limit={limit})", self.client.markets_url());
        let records = self
            .client
            .markets(limit)
            .await
            .context("failed to fetch Gamma markets")?;
        info!("Received {} markets", records.len());

        let markets = records
            .into_iter()
            .map(|raw| Market::from_record(raw, &["id", "conditionId"], &["question"]))
            .collect();
        Ok(retain_open(self.venue(), markets))
    }

    async fn get_prices(&self, market: &Market) -> Result<OutcomePriceSet, SkipReason> {
        normalize::normalize_vector(market.raw.get("outcomes"), market.raw.get("outcomePrices"))
    }
}
