/// Push messages from the dashboard backend stream
///
/// Frames are JSON objects tagged by `type`. Frames that fail to parse are
/// dropped without a trace; frames with an unknown or missing tag decode to
/// [`StreamMessage::Unknown`] and produce nothing.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::log::{LogLevel, LogLine};

/// Server -> client stream message
///
/// Payload fields stay untyped so a known tag with an odd payload still
/// surfaces instead of falling through to [`StreamMessage::Unknown`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Hello {
        #[serde(default)]
        message: Option<Value>,
    },
    Ticker {
        #[serde(default)]
        prices: Option<Value>,
    },
    AgentLog {
        #[serde(default)]
        level: Option<Value>,
        #[serde(default)]
        message: Option<Value>,
    },
    Error {
        #[serde(default)]
        message: Option<Value>,
    },
    #[serde(other)]
    Unknown,
}

impl StreamMessage {
    /// Parse a text frame. `None` when the frame is not JSON at all.
    ///
    /// Only JSON objects carry a `type` tag; any other JSON value is `Unknown`.
    pub fn parse(text: &str) -> Option<Self> {
        let value = serde_json::from_str::<Value>(text).ok()?;
        if !value.is_object() {
            return Some(StreamMessage::Unknown);
        }
        Some(Self::deserialize(value).unwrap_or(StreamMessage::Unknown))
    }
}

/// Asset shown in the live ticker summary, eg/ `bitcoin` shown as `BTC`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerAsset {
    /// Key in the ticker price map
    pub id: String,
    /// Short label in the summary line
    pub label: String,
}

impl TickerAsset {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Default live ticker assets: BTC, ETH, SOL
    pub fn defaults() -> Vec<TickerAsset> {
        vec![
            TickerAsset::new("bitcoin", "BTC"),
            TickerAsset::new("ethereum", "ETH"),
            TickerAsset::new("solana", "SOL"),
        ]
    }

    /// `prices.<id>.usd` from a ticker price map, as a number or numeric string
    fn price_in(&self, prices: &Value) -> Option<f64> {
        lenient_f64(prices.get(&self.id)?.get("usd")?)
    }
}

/// Turns stream frames into dashboard log lines
#[derive(Debug, Clone)]
pub struct MessageDispatcher {
    assets: Vec<TickerAsset>,
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new(TickerAsset::defaults())
    }
}

impl MessageDispatcher {
    pub fn new(assets: Vec<TickerAsset>) -> Self {
        Self { assets }
    }

    /// Parse and dispatch a raw text frame
    pub fn dispatch_text(&self, text: &str) -> Option<LogLine> {
        match StreamMessage::parse(text) {
            Some(message) => self.dispatch(message),
            None => {
                debug!("Dropping non-JSON stream frame ({} bytes)", text.len());
                None
            }
        }
    }

    pub fn dispatch(&self, message: StreamMessage) -> Option<LogLine> {
        match message {
            StreamMessage::Hello { message } => {
                Some(LogLine::info(non_empty(message).unwrap_or_else(|| "hello".to_string())))
            }
            StreamMessage::Ticker { prices } => self.ticker_summary(prices.as_ref()?),
            StreamMessage::AgentLog { level, message } => Some(LogLine::new(
                level
                    .as_ref()
                    .and_then(Value::as_str)
                    .map(LogLevel::parse)
                    .unwrap_or_default(),
                non_empty(message).unwrap_or_else(|| "agent".to_string()),
            )),
            StreamMessage::Error { message } => Some(LogLine::warn(
                non_empty(message).unwrap_or_else(|| "stream error".to_string()),
            )),
            StreamMessage::Unknown => None,
        }
    }

    /// `Live: BTC=.. ETH=- SOL=..`, or `None` when no configured asset is present
    fn ticker_summary(&self, prices: &Value) -> Option<LogLine> {
        let quotes: Vec<(&str, Option<f64>)> = self
            .assets
            .iter()
            .map(|asset| (asset.label.as_str(), asset.price_in(prices)))
            .collect();

        if quotes.iter().all(|(_, price)| price.is_none()) {
            return None;
        }

        let summary = quotes
            .iter()
            .map(|(label, price)| match price {
                Some(price) => format!("{}={}", label, price),
                None => format!("{}=-", label),
            })
            .collect::<Vec<_>>()
            .join(" ");

        Some(LogLine::info(format!("Live: {}", summary)))
    }
}

/// Display text of a payload field; strings verbatim, other values as JSON.
/// `None` for a missing, null or empty field.
fn non_empty(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text).filter(|t| !t.is_empty()),
        other => Some(other.to_string()),
    }
}

fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch(text: &str) -> Option<(LogLevel, String)> {
        MessageDispatcher::default()
            .dispatch_text(text)
            .map(|line| (line.level, line.message))
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            StreamMessage::parse(r#"{"type":"hello","message":"hi"}"#),
            Some(StreamMessage::Hello { message: Some(Value::from("hi")) })
        );
        assert_eq!(
            StreamMessage::parse(r#"{"type":"agent_log"}"#),
            Some(StreamMessage::AgentLog { level: None, message: None })
        );
        assert_eq!(
            StreamMessage::parse(r#"{"type":"trade","price":1}"#),
            Some(StreamMessage::Unknown)
        );
        assert_eq!(StreamMessage::parse(r#"{"message":"no tag"}"#), Some(StreamMessage::Unknown));
        assert_eq!(StreamMessage::parse("[1,2,3]"), Some(StreamMessage::Unknown));
        assert_eq!(
            StreamMessage::parse(r#"["hello","from an array"]"#),
            Some(StreamMessage::Unknown)
        );
        assert_eq!(StreamMessage::parse(r#""hello""#), Some(StreamMessage::Unknown));
        assert_eq!(
            StreamMessage::parse(r#"{"type":"error","message":{"code":502}}"#),
            Some(StreamMessage::Error { message: Some(serde_json::json!({"code": 502})) })
        );
        assert_eq!(StreamMessage::parse("not json {"), None);
    }

    #[test]
    fn test_dispatch_messages() {
        struct TestCase {
            input: &'static str,
            expected: Option<(LogLevel, &'static str)>,
        }

        let tests = vec![
            TestCase {
                // TC0: hello with greeting
                input: r#"{"type":"hello","message":"welcome aboard"}"#,
                expected: Some((LogLevel::Info, "welcome aboard")),
            },
            TestCase {
                // TC1: hello fallback
                input: r#"{"type":"hello"}"#,
                expected: Some((LogLevel::Info, "hello")),
            },
            TestCase {
                // TC2: agent_log with level
                input: r#"{"type":"agent_log","level":"warn","message":"liquidity thin"}"#,
                expected: Some((LogLevel::Warn, "liquidity thin")),
            },
            TestCase {
                // TC3: agent_log fallbacks
                input: r#"{"type":"agent_log"}"#,
                expected: Some((LogLevel::Info, "agent")),
            },
            TestCase {
                // TC4: error surfaces as warning
                input: r#"{"type":"error","message":"upstream 502"}"#,
                expected: Some((LogLevel::Warn, "upstream 502")),
            },
            TestCase {
                // TC5: error fallback
                input: r#"{"type":"error"}"#,
                expected: Some((LogLevel::Warn, "stream error")),
            },
            TestCase {
                // TC6: full ticker
                input: r#"{"type":"ticker","prices":{"bitcoin":{"usd":65000},"ethereum":{"usd":3200.5},"solana":{"usd":150}}}"#,
                expected: Some((LogLevel::Info, "Live: BTC=65000 ETH=3200.5 SOL=150")),
            },
            TestCase {
                // TC7: partial ticker shows placeholders
                input: r#"{"type":"ticker","prices":{"ethereum":{"usd":3200}}}"#,
                expected: Some((LogLevel::Info, "Live: BTC=- ETH=3200 SOL=-")),
            },
            TestCase {
                // TC8: ticker with no configured asset
                input: r#"{"type":"ticker","prices":{"dogecoin":{"usd":0.1}}}"#,
                expected: None,
            },
            TestCase {
                // TC9: ticker without prices
                input: r#"{"type":"ticker"}"#,
                expected: None,
            },
            TestCase {
                // TC10: unknown tag
                input: r#"{"type":"snapshot","data":{}}"#,
                expected: None,
            },
            TestCase {
                // TC11: malformed frame
                input: "{\"type\":\"hello\"",
                expected: None,
            },
            TestCase {
                // TC12: array frame has no tag
                input: r#"["hello","from an array"]"#,
                expected: None,
            },
            TestCase {
                // TC13: non-string error message is shown as JSON
                input: r#"{"type":"error","message":{"code":502}}"#,
                expected: Some((LogLevel::Warn, r#"{"code":502}"#)),
            },
            TestCase {
                // TC14: numeric greeting
                input: r#"{"type":"hello","message":42}"#,
                expected: Some((LogLevel::Info, "42")),
            },
            TestCase {
                // TC15: null message uses the fallback
                input: r#"{"type":"error","message":null}"#,
                expected: Some((LogLevel::Warn, "stream error")),
            },
            TestCase {
                // TC16: ticker prices sent as strings
                input: r#"{"type":"ticker","prices":{"bitcoin":{"usd":"65000"},"solana":{"usd":"abc"}}}"#,
                expected: Some((LogLevel::Info, "Live: BTC=65000 ETH=- SOL=-")),
            },
            TestCase {
                // TC17: non-string level falls back to info
                input: r#"{"type":"agent_log","level":3,"message":"scan done"}"#,
                expected: Some((LogLevel::Info, "scan done")),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = dispatch(test.input);
            let expected = test.expected.map(|(level, msg)| (level, msg.to_string()));
            assert_eq!(actual, expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_custom_ticker_assets() {
        let dispatcher = MessageDispatcher::new(vec![TickerAsset::new("dogecoin", "DOGE")]);
        let line = dispatcher
            .dispatch_text(r#"{"type":"ticker","prices":{"dogecoin":{"usd":0.125}}}"#)
            .unwrap();
        assert_eq!(line.message, "Live: DOGE=0.125");
    }
}
