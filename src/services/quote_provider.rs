//! Quote provider interface and the shared rate-limit gate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::error::ProviderError;
use crate::models::bar::Bar;

/// One row from the provider's instrument search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentMatch {
    pub trading_symbol: String,
    pub token: String,
}

/// Authenticated external source of daily bars.
///
/// `ensure_session` must be idempotent and cheap once a session exists, so the
/// orchestrator can call it once per scan without bookkeeping.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn ensure_session(&self) -> Result<(), ProviderError>;

    /// Raw search results for a trading symbol. Exact matching against the
    /// query is the resolver's job, not the provider's.
    async fn search_token(
        &self,
        exchange: &str,
        trading_symbol: &str,
    ) -> Result<Vec<InstrumentMatch>, ProviderError>;

    /// Daily bars for the inclusive date range, ascending by time.
    async fn fetch_daily_bars(
        &self,
        exchange: &str,
        token: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ProviderError>;
}

/// Shared pre-call gate that spaces provider requests.
///
/// The lock is held across the sleep, so concurrent workers are admitted one
/// at a time and each admission is at least `min_delay` after the previous
/// one. The provider's tolerance is undocumented; this plus the worker cap is
/// the whole rate-limit discipline.
pub struct FetchThrottle {
    min_delay: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl FetchThrottle {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_call: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_delay {
                sleep(self.min_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
