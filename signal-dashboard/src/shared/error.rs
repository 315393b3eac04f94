use thiserror::Error;

/// All errors generated in `signal-dashboard`.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid dashboard origin: {0}")]
    InvalidOrigin(#[from] url::ParseError),

    #[error("dashboard origin has no host: {0}")]
    MissingHost(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("SocketError: {0}")]
    Socket(String),
}

impl DashboardError {
    /// Determine if the error came from the transport rather than from local
    /// configuration, ie/ it is recovered by retrying rather than by fixing setup.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_transport(&self) -> bool {
        match self {
            DashboardError::Http(_) | DashboardError::Socket(_) => true,
            _ => false,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for DashboardError {
    fn from(value: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Socket(value.to_string())
    }
}
