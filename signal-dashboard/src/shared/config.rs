//! Dashboard configuration
//!
//! Defaults are suitable for a backend on `http://127.0.0.1:3000`; the binary
//! overrides them from environment variables.

use std::time::Duration;

use url::Url;

use super::api::MarketQuery;
use super::connection::DEFAULT_RECONNECT_DELAY;
use super::error::DashboardError;
use super::log::DEFAULT_LOG_CAPACITY;
use super::message::TickerAsset;
use super::state::{Dashboard, DEFAULT_CHART_SIZE};
use super::websocket::WebSocketConfig;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:3000";
pub const DEFAULT_MARKET_ID: &str = "bitcoin";
pub const DEFAULT_LOG_FILE: &str = "signal-dashboard.log";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend origin serving the REST endpoints and the stream
    pub origin: Url,
    /// Market loaded at startup
    pub market_id: String,
    /// Token contract checked on refresh, if any
    pub token_ca: Option<String>,
    pub market_query: MarketQuery,
    pub reconnect_delay: Duration,
    pub log_capacity: usize,
    /// Logical chart surface `(width, height)`
    pub chart_size: (f64, f64),
    pub ticker_assets: Vec<TickerAsset>,
    /// Redraw interval of the terminal UI
    pub tick_rate: Duration,
    /// File receiving `tracing` output
    pub log_file: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            market_id: DEFAULT_MARKET_ID.to_string(),
            token_ca: None,
            market_query: MarketQuery::default(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            log_capacity: DEFAULT_LOG_CAPACITY,
            chart_size: DEFAULT_CHART_SIZE,
            ticker_assets: TickerAsset::defaults(),
            tick_rate: Duration::from_millis(250),
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Create a configuration for a custom backend origin
    pub fn new(origin: &str) -> Result<Self, DashboardError> {
        Ok(Self {
            origin: Url::parse(origin)?,
            ..Default::default()
        })
    }

    /// Build from environment variables, falling back to defaults:
    ///
    /// - `DASHBOARD_URL`: backend origin
    /// - `MARKET_ID`: market loaded at startup
    /// - `TOKEN_CA`: token contract checked on refresh
    /// - `RECONNECT_DELAY_MS`: stream reconnect delay
    /// - `DASHBOARD_LOG_FILE`: tracing output file
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DashboardError> {
        let mut config = Self::new(
            &lookup("DASHBOARD_URL").unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
        )?;

        if let Some(id) = lookup("MARKET_ID").filter(|v| !v.trim().is_empty()) {
            config.market_id = id.trim().to_string();
        }
        config.token_ca = lookup("TOKEN_CA").filter(|v| !v.trim().is_empty());
        if let Some(ms) = lookup("RECONNECT_DELAY_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            config.reconnect_delay = Duration::from_millis(ms);
        }
        if let Some(path) = lookup("DASHBOARD_LOG_FILE").filter(|v| !v.trim().is_empty()) {
            config.log_file = path;
        }

        Ok(config)
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Empty dashboard for the configured market and token inputs
    pub fn dashboard(&self) -> Dashboard {
        let dashboard = Dashboard::new(&self.market_id, self.chart_size, self.log_capacity);
        match &self.token_ca {
            Some(ca) => dashboard.with_token_ca(ca),
            None => dashboard,
        }
    }

    /// Stream client configuration for this origin
    pub fn websocket_config(&self) -> Result<WebSocketConfig, DashboardError> {
        Ok(WebSocketConfig::from_origin(&self.origin)?
            .with_reconnect_delay(self.reconnect_delay)
            .with_ticker_assets(self.ticker_assets.clone()))
    }
}
