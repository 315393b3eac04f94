//! Dashboard presentation state
//!
//! Two producers write here: REST responses (market panel, token panel) and
//! the stream client (log lines, connection indicator). The slices are
//! disjoint, so each producer only ever overwrites its own fields and the last
//! event applied wins. Events are applied one at a time by the UI loop.

use super::chart::{ChartCanvas, PriceSeries, SeriesRenderer};
use super::classify::{market_badge, token_badge, Category};
use super::connection::ConnectionState;
use super::error::DashboardError;
use super::format::{confidence_pct, fmt_num, fmt_timestamp, fmt_usd, PLACEHOLDER};
use super::log::{LogBuffer, LogLevel, LogLine};
use super::types::{MarketResponse, TokenResponse};

/// Default logical chart surface, in surface units
pub const DEFAULT_CHART_SIZE: (f64, f64) = (900.0, 260.0);

const LOADING: &str = "Loading…";

/// Badge text plus the category driving its colour
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Badge {
    pub text: String,
    pub category: Category,
}

impl Badge {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    fn loading() -> Self {
        Self::new(LOADING, Category::Neutral)
    }

    /// `CAUTION: <status> <error>` for an in-band rejection
    fn rejection(status: Option<u16>, error: Option<&str>) -> Self {
        let error = error.unwrap_or("error");
        let text = match status {
            Some(status) => format!("CAUTION: {} {}", status, error),
            None => format!("CAUTION: {}", error),
        };
        Self::new(text.trim(), Category::Warn)
    }
}

/// Market signal panel
#[derive(Debug, Clone)]
pub struct MarketPanel {
    pub last: String,
    pub signal: String,
    pub confidence: String,
    pub updated: String,
    pub reason: String,
    pub badge: Badge,
    /// Kept from the previous successful render when the new series is too short
    pub min_max: Option<String>,
    pub chart: ChartCanvas,
    renderer: SeriesRenderer,
}

impl MarketPanel {
    pub fn new(chart_size: (f64, f64)) -> Self {
        Self {
            last: PLACEHOLDER.to_string(),
            signal: PLACEHOLDER.to_string(),
            confidence: PLACEHOLDER.to_string(),
            updated: PLACEHOLDER.to_string(),
            reason: String::new(),
            badge: Badge::default(),
            min_max: None,
            chart: ChartCanvas::new(chart_size.0, chart_size.1),
            renderer: SeriesRenderer::default(),
        }
    }

    /// Request issued: badge shows loading, stale reason cleared
    pub fn begin_load(&mut self) {
        self.badge = Badge::loading();
        self.reason.clear();
    }

    /// Apply a market response, returning the log line describing it
    pub fn apply(&mut self, id: &str, response: MarketResponse) -> LogLine {
        if !response.ok {
            self.badge = Badge::rejection(response.status, response.error.as_deref());
            return LogLine::warn(format!(
                "Market error ({}): {}",
                id,
                response.error.as_deref().unwrap_or("unknown")
            ));
        }

        let series = PriceSeries::new(response.prices.unwrap_or_default());
        let signal = response.signal.unwrap_or_default();

        self.last = series.last().map(fmt_usd).unwrap_or_else(|| PLACEHOLDER.to_string());
        self.signal = match &signal.action {
            Some(action) => format!("{} ({})", action, signal.bias.as_deref().unwrap_or("NEUTRAL")),
            None => PLACEHOLDER.to_string(),
        };
        self.confidence = signal
            .confidence
            .map(|c| format!("{}%", confidence_pct(c)))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        self.updated = response
            .updated_at
            .as_deref()
            .map(fmt_timestamp)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        self.reason = signal.reason.unwrap_or_default();

        let (text, category) = market_badge(signal.action.as_ref());
        self.badge = Badge::new(text, category);

        if let Some(summary) = self.renderer.render(&series, &mut self.chart) {
            self.min_max = Some(summary.to_string());
        }

        LogLine::ok(format!(
            "Market loaded ({}). Signal={} Conf={}",
            id,
            display_or_dash(signal.action.as_ref()),
            display_or_dash(signal.confidence.as_ref()),
        ))
    }

    /// Request failed before a body was decoded
    pub fn fail(&mut self, id: &str, error: &DashboardError) -> LogLine {
        self.badge = Badge::rejection(None, Some(&error.to_string()));
        LogLine::new(failure_level(error), format!("Market error ({}): {}", id, error))
    }
}

/// Token contract risk panel
#[derive(Debug, Clone)]
pub struct TokenPanel {
    pub name: String,
    pub price: String,
    pub liquidity: String,
    pub change_24h: String,
    pub reason: String,
    pub badge: Badge,
    pub link: Option<String>,
    pub meta: String,
}

impl Default for TokenPanel {
    fn default() -> Self {
        Self {
            name: PLACEHOLDER.to_string(),
            price: PLACEHOLDER.to_string(),
            liquidity: PLACEHOLDER.to_string(),
            change_24h: PLACEHOLDER.to_string(),
            reason: String::new(),
            badge: Badge::default(),
            link: None,
            meta: String::new(),
        }
    }
}

impl TokenPanel {
    pub fn begin_check(&mut self) {
        self.badge = Badge::loading();
        self.reason.clear();
        self.meta.clear();
        self.link = None;
    }

    pub fn apply(&mut self, response: TokenResponse) -> LogLine {
        if !response.ok {
            self.badge = Badge::rejection(response.status, response.error.as_deref());
            return LogLine::warn(format!(
                "Dex error: {}",
                response.error.as_deref().unwrap_or("unknown")
            ));
        }

        let (token, pair) = match (response.token, response.pair) {
            (Some(token), Some(pair)) => (token, pair),
            _ => {
                self.badge = Badge::rejection(None, Some("incomplete token data"));
                return LogLine::warn("Dex error: incomplete token data");
            }
        };
        let agent = response.agent.unwrap_or_default();

        self.name = format!("{} — {}", token.symbol, token.name);
        self.price = fmt_usd(pair.price_usd.unwrap_or(f64::NAN));
        self.liquidity = format!("${}", fmt_num(pair.liquidity_usd.unwrap_or(f64::NAN)));
        self.change_24h = match pair.change_24h {
            Some(change) if change.is_finite() => format!("{:.2}%", change),
            _ => PLACEHOLDER.to_string(),
        };

        let (text, category) = token_badge(agent.action.as_ref(), agent.confidence);
        self.badge = Badge::new(text, category);
        self.reason = agent.reason.unwrap_or_default();
        if pair.url.is_some() {
            self.link = pair.url.clone();
        }
        self.meta = format!(
            "{} / {} • Updated {}",
            token.chain_id,
            token.dex_id,
            response
                .updated_at
                .as_deref()
                .map(fmt_timestamp)
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        );

        let level = match category {
            Category::Bad => LogLevel::Bad,
            Category::Warn => LogLevel::Warn,
            Category::Safe | Category::Neutral => LogLevel::Ok,
        };
        LogLine::new(
            level,
            format!(
                "CA checked {}: price={} liq=${} change24h={}% action={}",
                token.symbol,
                display_or_dash(pair.price_usd.as_ref()),
                display_or_dash(pair.liquidity_usd.as_ref()),
                display_or_dash(pair.change_24h.as_ref()),
                display_or_dash(agent.action.as_ref()),
            ),
        )
    }

    pub fn fail(&mut self, error: &DashboardError) -> LogLine {
        self.badge = Badge::rejection(None, Some(&error.to_string()));
        LogLine::new(failure_level(error), format!("Dex error: {}", error))
    }
}

/// Everything that can change the dashboard, applied in arrival order
#[derive(Debug)]
pub enum DashboardEvent {
    Market {
        id: String,
        result: Result<MarketResponse, DashboardError>,
    },
    Token {
        ca: String,
        result: Result<TokenResponse, DashboardError>,
    },
    Log(LogLine),
    Connection(ConnectionState),
}

/// Whole dashboard state, owned by the UI loop
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub market_id: String,
    pub token_ca: String,
    pub market: MarketPanel,
    pub token: TokenPanel,
    pub logs: LogBuffer,
    pub connection: ConnectionState,
}

impl Dashboard {
    pub fn new(market_id: impl Into<String>, chart_size: (f64, f64), log_capacity: usize) -> Self {
        Self {
            market_id: market_id.into(),
            token_ca: String::new(),
            market: MarketPanel::new(chart_size),
            token: TokenPanel::default(),
            logs: LogBuffer::with_capacity(log_capacity),
            connection: ConnectionState::Connecting,
        }
    }

    pub fn with_token_ca(mut self, ca: impl Into<String>) -> Self {
        self.token_ca = ca.into();
        self
    }

    /// Mark the market panel loading and return the id to request
    pub fn request_market(&mut self) -> String {
        self.market.begin_load();
        self.market_id.clone()
    }

    /// Mark the token panel loading and return the contract to check.
    /// `None` when no contract address is entered.
    pub fn request_token(&mut self) -> Option<String> {
        let ca = self.token_ca.trim();
        if ca.is_empty() {
            return None;
        }
        let ca = ca.to_string();
        self.token.begin_check();
        Some(ca)
    }

    pub fn handle(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Market { id, result } => {
                let line = match result {
                    Ok(response) => self.market.apply(&id, response),
                    Err(error) => self.market.fail(&id, &error),
                };
                self.logs.push(line);
            }
            DashboardEvent::Token { ca, result } => {
                let line = match result {
                    Ok(response) => self.token.apply(response),
                    Err(error) => self.token.fail(&error),
                };
                tracing::debug!("Token check for {} applied", ca);
                self.logs.push(line);
            }
            DashboardEvent::Log(line) => self.logs.push(line),
            DashboardEvent::Connection(state) => self.connection = state,
        }
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    /// Category of the current market signal, for styling outside the badge
    pub fn market_category(&self) -> Category {
        self.market.badge.category
    }
}

fn display_or_dash<T: std::fmt::Display>(value: Option<&T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Transport failures recover on the next request; anything else means the
/// backend answered with something unreadable
fn failure_level(error: &DashboardError) -> LogLevel {
    if error.is_transport() {
        LogLevel::Warn
    } else {
        LogLevel::Bad
    }
}
