/// WebSocket client for the dashboard backend stream
///
/// Provides endpoint derivation from the dashboard origin, unbounded
/// fixed-delay reconnection, and dispatch of push messages into log lines.

use std::time::Duration;

use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use url::Url;

use super::connection::{ConnectionMachine, ConnectionState, DEFAULT_RECONNECT_DELAY};
use super::error::DashboardError;
use super::log::LogLine;
use super::message::{MessageDispatcher, TickerAsset};

/// Text frames of one open connection. The stream ending means the
/// connection closed; an `Err` item is a transport error.
pub type FrameStream = BoxStream<'static, Result<String, DashboardError>>;

/// Derive the stream endpoint from the dashboard origin.
///
/// `https` origins use `wss`, everything else `ws`. Host and port are kept,
/// path and query are dropped.
pub fn stream_endpoint(origin: &Url) -> Result<Url, DashboardError> {
    let scheme = if origin.scheme() == "https" { "wss" } else { "ws" };
    let host = origin
        .host_str()
        .ok_or_else(|| DashboardError::MissingHost(origin.to_string()))?;
    let authority = match origin.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Ok(Url::parse(&format!("{}://{}", scheme, authority))?)
}

/// WebSocket client configuration
#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    /// Stream endpoint
    pub url: Url,
    /// Fixed delay before every reconnect attempt
    pub reconnect_delay: Duration,
    /// Maximum channel buffer size for log lines
    pub channel_buffer_size: usize,
    /// Assets summarised from `ticker` messages
    pub ticker_assets: Vec<TickerAsset>,
}

impl WebSocketConfig {
    /// Create a new configuration for an explicit endpoint
    pub fn new(url: Url) -> Self {
        Self {
            url,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            channel_buffer_size: 1000,
            ticker_assets: TickerAsset::defaults(),
        }
    }

    /// Create a configuration for the stream served by a dashboard origin
    pub fn from_origin(origin: &Url) -> Result<Self, DashboardError> {
        Ok(Self::new(stream_endpoint(origin)?))
    }

    /// Set reconnect delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set channel buffer size
    pub fn with_channel_buffer_size(mut self, size: usize) -> Self {
        self.channel_buffer_size = size;
        self
    }

    /// Set the assets summarised from ticker messages
    pub fn with_ticker_assets(mut self, assets: Vec<TickerAsset>) -> Self {
        self.ticker_assets = assets;
        self
    }
}

/// Opens stream connections. The seam between the reconnect loop and the network.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &Url) -> Result<FrameStream, DashboardError>;
}

/// Production [`Connector`] over `tokio-tungstenite`
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(&self, url: &Url) -> Result<FrameStream, DashboardError> {
        let (ws_stream, _) = connect_async(url.as_str()).await?;

        let frames = ws_stream.filter_map(|msg| async move {
            match msg {
                Ok(Message::Text(text)) => Some(Ok(text.as_str().to_owned())),
                Ok(Message::Close(frame)) => {
                    debug!("Server sent close frame: {:?}", frame);
                    None
                }
                // Heartbeats are answered by tungstenite; binary frames are not part of the protocol
                Ok(_) => None,
                Err(e) => Some(Err(DashboardError::from(e))),
            }
        });

        Ok(frames.boxed())
    }
}

/// Receivers for a running stream client
pub struct StreamFeed {
    /// Log lines produced by connection events and push messages
    pub logs: mpsc::Receiver<LogLine>,
    /// Every connection state transition, in order
    pub states: mpsc::Receiver<ConnectionState>,
    /// Connection task; ends once both receivers are dropped
    pub task: JoinHandle<()>,
}

/// WebSocket client for dashboard push messages
pub struct WebSocketClient<C = TungsteniteConnector> {
    config: WebSocketConfig,
    connector: C,
}

impl WebSocketClient {
    /// Create a new WebSocket client over the network
    pub fn with_config(config: WebSocketConfig) -> Self {
        Self::with_connector(config, TungsteniteConnector)
    }
}

impl<C: Connector> WebSocketClient<C> {
    pub fn with_connector(config: WebSocketConfig, connector: C) -> Self {
        Self { config, connector }
    }

    /// Start the WebSocket client connection
    ///
    /// Must be called within a tokio runtime.
    pub fn start(self) -> StreamFeed {
        let (log_tx, logs) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let (state_tx, states) = mpsc::channel(16);

        let task = tokio::spawn(run_websocket_loop(
            self.config,
            self.connector,
            Outputs {
                log_tx,
                state_tx,
                last_state: None,
            },
        ));

        StreamFeed { logs, states, task }
    }
}

struct Outputs {
    log_tx: mpsc::Sender<LogLine>,
    state_tx: mpsc::Sender<ConnectionState>,
    last_state: Option<ConnectionState>,
}

impl Outputs {
    /// Forward a state, skipping repeats (error then close both report disconnected)
    async fn publish(&mut self, state: ConnectionState) {
        if self.last_state == Some(state) {
            return;
        }
        self.last_state = Some(state);
        let _ = self.state_tx.send(state).await;
    }

    async fn emit(&self, line: LogLine) {
        let _ = self.log_tx.send(line).await;
    }

    fn is_closed(&self) -> bool {
        self.log_tx.is_closed() && self.state_tx.is_closed()
    }
}

/// Main WebSocket connection loop with auto-reconnect
async fn run_websocket_loop<C: Connector>(
    config: WebSocketConfig,
    connector: C,
    mut outputs: Outputs,
) {
    info!("Starting stream client for {}", config.url);

    let dispatcher = MessageDispatcher::new(config.ticker_assets.clone());
    let mut machine = ConnectionMachine::new(config.reconnect_delay);

    loop {
        outputs.publish(machine.connect()).await;
        debug!("Connection attempt {} to {}", machine.attempts(), config.url);

        match connector.connect(&config.url).await {
            Ok(mut frames) => {
                info!("Connected to dashboard stream at {}", config.url);
                outputs.publish(machine.on_open()).await;
                outputs.emit(LogLine::ok("Stream connected.")).await;

                while let Some(frame) = frames.next().await {
                    match frame {
                        Ok(text) => {
                            if let Some(line) = dispatcher.dispatch_text(&text) {
                                outputs.emit(line).await;
                            }
                        }
                        Err(e) => {
                            error!("Stream error: {}", e);
                            outputs.publish(machine.on_error()).await;
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to connect to {}: {}", config.url, e);
                outputs.publish(machine.on_error()).await;
            }
        }

        let reconnect = machine.on_close();
        outputs.publish(machine.state()).await;
        warn!("Stream connection closed, will reconnect...");
        outputs
            .emit(LogLine::warn("Stream disconnected. Reconnecting…"))
            .await;

        if outputs.is_closed() {
            info!("Stream consumers dropped, stopping client");
            return;
        }

        if let Some(reconnect) = reconnect {
            debug!("Waiting {:?} before reconnecting...", reconnect.after);
            tokio::time::sleep(reconnect.after).await;
        }
    }
}
