//! REST client for the market and token endpoints.
//!
//! Both endpoints report failure in-band with `ok: false`, often alongside a
//! non-2xx status, so bodies are decoded regardless of the HTTP status. No
//! timeout is applied and in-flight requests are never cancelled.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::error::DashboardError;
use super::types::{MarketResponse, TokenResponse};

/// Fixed query parameters of the market endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuery {
    /// Quote currency
    pub vs: String,
    /// History window in days
    pub days: u32,
}

impl Default for MarketQuery {
    fn default() -> Self {
        Self {
            vs: "usd".to_string(),
            days: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    origin: Url,
    market_query: MarketQuery,
}

impl ApiClient {
    pub fn new(origin: Url) -> Self {
        Self::with_http(reqwest::Client::new(), origin)
    }

    pub fn with_http(http: reqwest::Client, origin: Url) -> Self {
        Self {
            http,
            origin,
            market_query: MarketQuery::default(),
        }
    }

    pub fn with_market_query(mut self, query: MarketQuery) -> Self {
        self.market_query = query;
        self
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `GET /api/market?id=<id>&vs=<vs>&days=<days>`
    pub async fn market(&self, id: &str) -> Result<MarketResponse, DashboardError> {
        let days = self.market_query.days.to_string();
        self.get_json(
            "/api/market",
            &[("id", id), ("vs", self.market_query.vs.as_str()), ("days", days.as_str())],
        )
        .await
    }

    /// `GET /api/token?ca=<ca>`
    pub async fn token(&self, ca: &str) -> Result<TokenResponse, DashboardError> {
        self.get_json("/api/token", &[("ca", ca)]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DashboardError> {
        let url = self.origin.join(path)?;
        debug!("GET {} {:?}", url, query);

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            debug!("Undecodable {} body from {}: {}", status, path, e);
            DashboardError::from(e)
        })
    }
}
