/// Core data types for the market and token REST payloads
///
/// These types match the JSON bodies returned by `/api/market` and `/api/token`.
/// Every field except `ok` is optional: the backend omits fields freely and
/// reports failures in-band via `ok: false`.

use serde::{Deserialize, Deserializer, Serialize};

/// Action label attached to a market signal or a token verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Long,
    Short,
    Block,
    Hold,
    Other(String),
}

impl Action {
    /// Parse a label case-insensitively; unknown labels are kept verbatim.
    pub fn parse(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "BUY" => Action::Buy,
            "SELL" => Action::Sell,
            "LONG" => Action::Long,
            "SHORT" => Action::Short,
            "BLOCK" => Action::Block,
            "HOLD" => Action::Hold,
            _ => Action::Other(label.to_string()),
        }
    }

    /// Convert to display string
    pub fn as_str(&self) -> &str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Long => "LONG",
            Action::Short => "SHORT",
            Action::Block => "BLOCK",
            Action::Hold => "HOLD",
            Action::Other(label) => label,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Action::parse(&label))
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Market signal produced by the backend per request
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Signal {
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub bias: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `GET /api/market`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketResponse {
    pub ok: bool,
    #[serde(default)]
    pub prices: Option<Vec<f64>>,
    #[serde(default)]
    pub signal: Option<Signal>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Token identity as reported by the DEX aggregator
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub dex_id: String,
}

/// Most liquid trading pair for a token
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub price_usd: Option<f64>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub liquidity_usd: Option<f64>,
    #[serde(default, rename = "change24h", deserialize_with = "de_lenient_f64")]
    pub change_24h: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Risk verdict for a token contract
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AgentVerdict {
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `GET /api/token`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub ok: bool,
    #[serde(default)]
    pub token: Option<TokenInfo>,
    #[serde(default)]
    pub pair: Option<PairInfo>,
    #[serde(default)]
    pub agent: Option<AgentVerdict>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Accept a number, a numeric string, or null.
///
/// DEX aggregators ship prices as strings (`"0.00001234"`) to keep precision.
fn de_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(value)) => Some(value),
        Some(Lenient::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_is_case_insensitive() {
        assert_eq!(Action::parse("buy"), Action::Buy);
        assert_eq!(Action::parse("Short"), Action::Short);
        assert_eq!(Action::parse("BLOCK"), Action::Block);
        assert_eq!(Action::parse("wait"), Action::Other("wait".to_string()));
        assert_eq!(Action::parse("wait").to_string(), "wait");
    }

    #[test]
    fn test_market_response_decode() {
        let json = r#"{
            "ok": true,
            "prices": [100, 105, 95, 110],
            "signal": {"action": "BUY", "bias": "BULLISH", "confidence": 0.82, "reason": "momentum"},
            "updatedAt": "2024-05-01T12:30:00.000Z"
        }"#;

        let response: MarketResponse = serde_json::from_str(json).unwrap();
        assert!(response.ok);
        assert_eq!(response.prices, Some(vec![100.0, 105.0, 95.0, 110.0]));

        let signal = response.signal.unwrap();
        assert_eq!(signal.action, Some(Action::Buy));
        assert_eq!(signal.bias.as_deref(), Some("BULLISH"));
        assert_eq!(signal.confidence, Some(0.82));
        assert_eq!(response.updated_at.as_deref(), Some("2024-05-01T12:30:00.000Z"));
    }

    #[test]
    fn test_market_rejection_decode() {
        let json = r#"{"ok": false, "status": 429, "error": "rate limited"}"#;
        let response: MarketResponse = serde_json::from_str(json).unwrap();
        assert!(!response.ok);
        assert_eq!(response.status, Some(429));
        assert_eq!(response.error.as_deref(), Some("rate limited"));
        assert!(response.prices.is_none());
    }

    #[test]
    fn test_token_response_accepts_string_numbers() {
        let json = r#"{
            "ok": true,
            "token": {"symbol": "PEPE", "name": "Pepe", "chainId": "ethereum", "dexId": "uniswap"},
            "pair": {"priceUsd": "0.00001234", "liquidityUsd": 2500000, "change24h": "-3.5", "url": "https://dex.example/pepe"},
            "agent": {"action": "sell", "confidence": 0.6, "reason": "thin liquidity"},
            "updatedAt": "2024-05-01T12:30:00Z"
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        let pair = response.pair.unwrap();
        assert_eq!(pair.price_usd, Some(0.00001234));
        assert_eq!(pair.liquidity_usd, Some(2_500_000.0));
        assert_eq!(pair.change_24h, Some(-3.5));
        assert_eq!(response.token.unwrap().chain_id, "ethereum");
        assert_eq!(response.agent.unwrap().action, Some(Action::Sell));
    }

    #[test]
    fn test_lenient_number_rejects_garbage_as_missing() {
        let json = r#"{"priceUsd": "n/a", "liquidityUsd": null}"#;
        let pair: PairInfo = serde_json::from_str(json).unwrap();
        assert_eq!(pair.price_usd, None);
        assert_eq!(pair.liquidity_usd, None);
        assert_eq!(pair.change_24h, None);
    }
}
