//! Core market data types: bars and symbols.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daily trading session's OHLC(V) at a timestamp.
///
/// Identity within a (exchange, trading_symbol) series is the `time` field
/// alone. Upstream price invariants (`low <= open,close <= high`) are assumed,
/// not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// A tradeable instrument as listed in a watchlist.
///
/// `token` is the provider-specific instrument identifier. It is opaque; the
/// only validation applied anywhere is non-emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub exchange: String,
    pub trading_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Symbol {
    pub fn new(exchange: impl Into<String>, trading_symbol: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            trading_symbol: trading_symbol.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The pre-known instrument token, if present and non-empty.
    pub fn known_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}
