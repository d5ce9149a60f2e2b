//! Candle persistence: the cache trait and its in-memory implementation.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::bar::Bar;

/// Append-only, idempotent bar cache keyed by (exchange, trading_symbol, time).
///
/// Once a bar is written it is the source of truth: re-ingesting the same
/// identity key is a no-op even if the upstream value changed. Reads and
/// concurrent duplicate writes must both be safe.
#[async_trait]
pub trait CandleStore: Send + Sync {
    /// Bars with `time >= from`, ascending by time. Empty means "no cached
    /// data", never an error.
    async fn get_range(
        &self,
        exchange: &str,
        trading_symbol: &str,
        from: DateTime<Utc>,
    ) -> Result<Vec<Bar>, StoreError>;

    /// Upsert-or-ignore each bar; returns how many were newly inserted.
    async fn ingest(
        &self,
        exchange: &str,
        trading_symbol: &str,
        token: &str,
        bars: &[Bar],
    ) -> Result<usize, StoreError>;
}

type SeriesKey = (String, String);

/// In-memory candle store. A `BTreeMap` per series keeps bars sorted by time
/// and makes the identity-key check a plain map lookup.
#[derive(Default)]
pub struct MemoryCandleStore {
    series: RwLock<HashMap<SeriesKey, BTreeMap<DateTime<Utc>, Bar>>>,
}

impl MemoryCandleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CandleStore for MemoryCandleStore {
    async fn get_range(
        &self,
        exchange: &str,
        trading_symbol: &str,
        from: DateTime<Utc>,
    ) -> Result<Vec<Bar>, StoreError> {
        let series = self.series.read().await;
        let key = (exchange.to_string(), trading_symbol.to_string());
        Ok(series
            .get(&key)
            .map(|bars| bars.range(from..).map(|(_, bar)| bar.clone()).collect())
            .unwrap_or_default())
    }

    async fn ingest(
        &self,
        exchange: &str,
        trading_symbol: &str,
        _token: &str,
        bars: &[Bar],
    ) -> Result<usize, StoreError> {
        let mut series = self.series.write().await;
        let key = (exchange.to_string(), trading_symbol.to_string());
        let entry = series.entry(key).or_default();
        let mut inserted = 0;
        for bar in bars {
            if !entry.contains_key(&bar.time) {
                entry.insert(bar.time, bar.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}
