/// Signal Dashboard - Shared Library
///
/// Terminal dashboard for market price signals and token-contract risk.
/// Two independent producers feed it:
/// - REST lookups (`/api/market`, `/api/token`) issued on demand
/// - A push stream with unbounded fixed-delay reconnection
///
/// The library includes:
/// - Stream client, connection state machine, and message dispatch
/// - Price series renderer and signal classifier
/// - Dashboard state and ratatui panels
pub mod shared;

// Re-export commonly used types for convenience
pub use shared::types::{Action, AgentVerdict, MarketResponse, PairInfo, Signal, TokenInfo, TokenResponse};

pub use shared::api::{ApiClient, MarketQuery};
pub use shared::config::DashboardConfig;
pub use shared::error::DashboardError;

pub use shared::connection::{ConnectionMachine, ConnectionState, Reconnect};
pub use shared::message::{MessageDispatcher, StreamMessage, TickerAsset};
pub use shared::websocket::{
    stream_endpoint, Connector, FrameStream, StreamFeed, TungsteniteConnector, WebSocketClient,
    WebSocketConfig,
};

pub use shared::chart::{ChartCanvas, ChartView, PriceSeries, SeriesRenderer, SeriesSummary, Surface};
pub use shared::classify::{classify, Category};
pub use shared::format::{fmt_num, fmt_usd};
pub use shared::log::{LogBuffer, LogLevel, LogLine};

// Dashboard state and panels
pub use shared::state::{Badge, Dashboard, DashboardEvent, MarketPanel, TokenPanel};
pub use shared::widget::{render_dashboard, Focus};
