//! Scan output types: per-symbol results and the aggregated report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::bar::Symbol;
use crate::patterns::TradeLevels;

/// Why a symbol was rejected by the scan.
///
/// Serializes as a snake_case code so the report is stable for API consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    TokenNotFound,
    NotEnoughCandles,
    NoUptrend,
    NoShootingStar,
    FetchFailed,
    StoreFailed,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TokenNotFound => "token_not_found",
            RejectReason::NotEnoughCandles => "not_enough_candles",
            RejectReason::NoUptrend => "no_uptrend",
            RejectReason::NoShootingStar => "no_shooting_star",
            RejectReason::FetchFailed => "fetch_failed",
            RejectReason::StoreFailed => "store_failed",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PATTERN_SHOOTING_STAR: &str = "shooting_star";

/// Outcome of scanning one symbol. Exactly one is produced per input symbol
/// per scan invocation; a failed resolve or fetch yields a rejected result,
/// never an error that aborts the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub symbol: String,
    pub exchange: String,
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candle_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_sell: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

impl ScanResult {
    pub fn eligible(symbol: &Symbol, candle_time: DateTime<Utc>, levels: TradeLevels) -> Self {
        Self {
            symbol: symbol.trading_symbol.clone(),
            exchange: symbol.exchange.clone(),
            eligible: true,
            pattern: Some(PATTERN_SHOOTING_STAR.to_string()),
            reason: None,
            candle_time: Some(candle_time),
            entry_sell: Some(levels.entry_sell),
            stop_loss: Some(levels.stop_loss),
            target: Some(levels.target),
        }
    }

    pub fn rejected(symbol: &Symbol, reason: RejectReason) -> Self {
        Self {
            symbol: symbol.trading_symbol.clone(),
            exchange: symbol.exchange.clone(),
            eligible: false,
            pattern: None,
            reason: Some(reason),
            candle_time: None,
            entry_sell: None,
            stop_loss: None,
            target: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCounts {
    pub eligible: usize,
    pub rejected: usize,
    pub total: usize,
}

/// Aggregated scan output. Every input symbol appears in exactly one of
/// `eligible` / `rejected`; ordering within each group follows worker
/// completion order and is unspecified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub eligible: Vec<ScanResult>,
    pub rejected: Vec<ScanResult>,
    pub counts: ScanCounts,
}

impl ScanReport {
    pub fn from_results(results: Vec<ScanResult>) -> Self {
        let (eligible, rejected): (Vec<_>, Vec<_>) =
            results.into_iter().partition(|r| r.eligible);
        let counts = ScanCounts {
            eligible: eligible.len(),
            rejected: rejected.len(),
            total: eligible.len() + rejected.len(),
        };
        Self {
            eligible,
            rejected,
            counts,
        }
    }
}
