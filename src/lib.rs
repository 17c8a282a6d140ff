pub mod api;
pub mod config;
pub mod engine;
pub mod normalize;
pub mod reporter;
pub mod scanner;
pub mod source;
pub mod types;

/// Polymarket Gamma API base URL (public market catalog, no auth required)
pub const GAMMA_API_BASE: &str = "https://gamma-api.polymarket.com";

/// Kalshi production API host
pub const KALSHI_PROD_API_BASE: &str = "https://api.elections.kalshi.com";

/// Kalshi demo API host
pub const KALSHI_DEMO_API_BASE: &str = "https://demo-api.kalshi.co";

/// Kalshi market listing path (relative to the environment host)
pub const KALSHI_MARKETS_PATH: &str = "/trade-api/v2/markets";

/// Kalshi trade history path; takes `ticker` and `limit` query params
pub const KALSHI_TRADES_PATH: &str = "/trade-api/v2/markets/trades";
