use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{GammaConfig, KalshiConfig};

/// Read-only access to the trade-tick venue.
#[allow(async_fn_in_trait)]
pub trait KalshiApi {
    /// Human-readable listing endpoint, for log lines.
    fn markets_url(&self) -> String;

    /// One page of open markets; the body is `{"markets": [...]}`.
    async fn markets(&self, limit: u32) -> Result<Value>;

    /// Trade history for one ticker, most recent first.
    async fn trades(&self, ticker: &str, limit: u32) -> Result<Value>;
}

/// Read-only access to the vector venue's market catalog.
#[allow(async_fn_in_trait)]
pub trait GammaApi {
    fn markets_url(&self) -> String;

    /// One page of open markets as raw records.
    async fn markets(&self, limit: u32) -> Result<Vec<Value>>;
}

fn build_http(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")
}

/// GET a JSON body, treating any non-2xx status as a failure.
async fn get_json(http: &reqwest::Client, url: Url, query: &[(&str, String)]) -> Result<Value> {
    let resp = http
        .get(url.clone())
        .query(query)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;
    let status = resp.status();
    debug!("GET {url} -> {status}");
    if !status.is_success() {
        anyhow::bail!("GET {url} returned {status}");
    }
    resp.json()
        .await
        .with_context(|| format!("invalid JSON from {url}"))
}

fn open_market_query(limit: u32) -> Vec<(&'static str, String)> {
    vec![
        ("active", "true".to_string()),
        ("closed", "false".to_string()),
        ("limit", limit.to_string()),
    ]
}

/// Anonymous client for Kalshi's public market data endpoints.
pub struct KalshiClient {
    http: reqwest::Client,
    markets_url: Url,
    trades_url: Url,
}

impl KalshiClient {
    pub fn new(config: &KalshiConfig, timeout: Duration) -> Result<Self> {
        let host = config.base_url()?;
        Ok(Self {
            http: build_http(timeout)?,
            markets_url: host
                .join(&config.markets_path)
                .context("invalid Kalshi markets path")?,
            trades_url: host
                .join(&config.trades_path)
                .context("invalid Kalshi trades path")?,
        })
    }
}

impl KalshiApi for KalshiClient {
    fn markets_url(&self) -> String {
        self.markets_url.to_string()
    }

    async fn markets(&self, limit: u32) -> Result<Value> {
        get_json(&self.http, self.markets_url.clone(), &open_market_query(limit)).await
    }

    async fn trades(&self, ticker: &str, limit: u32) -> Result<Value> {
        let query = [("ticker", ticker.to_string()), ("limit", limit.to_string())];
        get_json(&self.http, self.trades_url.clone(), &query).await
    }
}

/// Anonymous client for the Polymarket Gamma catalog.
pub struct GammaClient {
    http: reqwest::Client,
    markets_url: Url,
}

impl GammaClient {
    pub fn new(config: &GammaConfig, timeout: Duration) -> Result<Self> {
        let base = config.base_url()?;
        Ok(Self {
            http: build_http(timeout)?,
            markets_url: markets_endpoint(&base)?,
        })
    }
}

/// `{base}/markets`, keeping any path prefix the base already has.
fn markets_endpoint(base: &Url) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("base URL {base} cannot have a path"))?
        .pop_if_empty()
        .push("markets");
    Ok(url)
}

impl GammaApi for GammaClient {
    fn markets_url(&self) -> String {
        self.markets_url.to_string()
    }

    async fn markets(&self, limit: u32) -> Result<Vec<Value>> {
        let body = get_json(&self.http, self.markets_url.clone(), &open_market_query(limit)).await?;
        match body {
            Value::Array(markets) => Ok(markets),
            other => anyhow::bail!("expected a JSON array of markets, got {}", type_name(&other)),
        }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
