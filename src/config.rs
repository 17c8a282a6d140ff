use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    GAMMA_API_BASE, KALSHI_DEMO_API_BASE, KALSHI_MARKETS_PATH, KALSHI_PROD_API_BASE,
    KALSHI_TRADES_PATH,
};

/// Default config file path.
pub const CONFIG_PATH: &str = "config.toml";

/// Top-level application config deserialized from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub kalshi: KalshiConfig,
    #[serde(default)]
    pub gamma: GammaConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Kalshi API environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Demo,
    Prod,
}

impl Environment {
    pub fn host(self) -> &'static str {
        match self {
            Environment::Demo => KALSHI_DEMO_API_BASE,
            Environment::Prod => KALSHI_PROD_API_BASE,
        }
    }
}

/// Trade-tick venue endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalshiConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Overrides the environment host when set.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_kalshi_markets_path")]
    pub markets_path: String,
    #[serde(default = "default_kalshi_trades_path")]
    pub trades_path: String,
}

fn default_kalshi_markets_path() -> String {
    KALSHI_MARKETS_PATH.to_string()
}

fn default_kalshi_trades_path() -> String {
    KALSHI_TRADES_PATH.to_string()
}

impl Default for KalshiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            host: None,
            markets_path: default_kalshi_markets_path(),
            trades_path: default_kalshi_trades_path(),
        }
    }
}

impl KalshiConfig {
    /// Host to send requests to: explicit override, else the environment's host.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.host.as_deref().unwrap_or(self.environment.host());
        Url::parse(raw).with_context(|| format!("invalid Kalshi host {raw}"))
    }
}

/// Vector venue endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GammaConfig {
    #[serde(default = "default_gamma_base_url")]
    pub base_url: String,
}

fn default_gamma_base_url() -> String {
    GAMMA_API_BASE.to_string()
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            base_url: default_gamma_base_url(),
        }
    }
}

impl GammaConfig {
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("invalid Gamma base URL {}", self.base_url))
    }
}

/// Runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Page size for the market listing.
    #[serde(default = "default_market_limit")]
    pub market_limit: u32,
    /// Pause between per-market lookups, in milliseconds.
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_market_limit() -> u32 {
    30
}

fn default_pace_ms() -> u64 {
    100
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            market_limit: default_market_limit(),
            pace_ms: default_pace_ms(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = AppConfig::parse("").unwrap();
        assert_eq!(cfg.kalshi.environment, Environment::Demo);
        assert_eq!(cfg.kalshi.markets_path, KALSHI_MARKETS_PATH);
        assert_eq!(cfg.gamma.base_url, GAMMA_API_BASE);
        assert_eq!(cfg.settings.market_limit, 30);
        assert_eq!(cfg.settings.pace_ms, 100);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = AppConfig::parse(
            r#"
            [kalshi]
            environment = "prod"

            [settings]
            pace_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(cfg.kalshi.environment, Environment::Prod);
        assert_eq!(cfg.kalshi.trades_path, KALSHI_TRADES_PATH);
        assert_eq!(cfg.settings.pace_ms, 250);
        assert_eq!(cfg.settings.market_limit, 30);
        assert_eq!(cfg.settings.request_timeout_secs, 10);
    }

    #[test]
    fn host_override_wins() {
        let mut kalshi = KalshiConfig::default();
        assert_eq!(kalshi.base_url().unwrap().as_str(), "https://demo-api.kalshi.co/");
        kalshi.host = Some("http://localhost:8080".into());
        assert_eq!(kalshi.base_url().unwrap().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn bad_environment_is_rejected() {
        assert!(AppConfig::parse("[kalshi]\nenvironment = \"staging\"").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_or_default(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(cfg.settings.request_timeout_secs, 10);
    }
}
