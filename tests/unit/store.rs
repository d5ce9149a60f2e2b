//! Unit tests for the in-memory candle store

use bullscan::db::{CandleStore, MemoryCandleStore};
use bullscan::models::Bar;
use chrono::{Duration, Utc};
use std::sync::Arc;

fn bar(days_ago: i64, close: f64) -> Bar {
    let time = Utc::now() - Duration::days(days_ago);
    Bar::new(time, close, close + 1.0, close - 1.0, close).with_volume(1000.0)
}

#[tokio::test]
async fn ingest_is_idempotent() {
    let store = MemoryCandleStore::new();
    let bars = vec![bar(2, 100.0), bar(1, 101.0)];

    let first = store.ingest("NSE", "RELIANCE", "2885", &bars).await.unwrap();
    let second = store.ingest("NSE", "RELIANCE", "2885", &bars).await.unwrap();
    assert_eq!(first, 2);
    assert_eq!(second, 0);

    let cached = store
        .get_range("NSE", "RELIANCE", Utc::now() - Duration::days(10))
        .await
        .unwrap();
    assert_eq!(cached.len(), 2);
}

#[tokio::test]
async fn duplicate_key_never_overwrites() {
    let store = MemoryCandleStore::new();
    let original = bar(1, 100.0);
    let mut conflicting = original.clone();
    conflicting.close = 999.0;

    store
        .ingest("NSE", "TCS", "11536", std::slice::from_ref(&original))
        .await
        .unwrap();
    store
        .ingest("NSE", "TCS", "11536", std::slice::from_ref(&conflicting))
        .await
        .unwrap();

    let cached = store
        .get_range("NSE", "TCS", Utc::now() - Duration::days(10))
        .await
        .unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].close, 100.0);
}

#[tokio::test]
async fn get_range_filters_and_sorts_ascending() {
    let store = MemoryCandleStore::new();
    // Deliberately out of chronological order.
    let bars = vec![bar(1, 103.0), bar(20, 100.0), bar(5, 101.0)];
    store.ingest("NSE", "INFY", "1594", &bars).await.unwrap();

    let cached = store
        .get_range("NSE", "INFY", Utc::now() - Duration::days(10))
        .await
        .unwrap();
    let closes: Vec<f64> = cached.iter().map(|b| b.close).collect();
    assert_eq!(closes, vec![101.0, 103.0]);
}

#[tokio::test]
async fn series_are_isolated_per_exchange_and_symbol() {
    let store = MemoryCandleStore::new();
    store
        .ingest("NSE", "SBIN", "3045", &[bar(1, 100.0)])
        .await
        .unwrap();

    let other = store
        .get_range("BSE", "SBIN", Utc::now() - Duration::days(10))
        .await
        .unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn concurrent_duplicate_ingest_stays_consistent() {
    let store = Arc::new(MemoryCandleStore::new());
    let bars = vec![bar(3, 100.0), bar(2, 101.0), bar(1, 102.0)];

    let a = {
        let store = store.clone();
        let bars = bars.clone();
        tokio::spawn(async move { store.ingest("NSE", "HDFCBANK", "1333", &bars).await })
    };
    let b = {
        let store = store.clone();
        let bars = bars.clone();
        tokio::spawn(async move { store.ingest("NSE", "HDFCBANK", "1333", &bars).await })
    };

    let inserted_a = a.await.unwrap().unwrap();
    let inserted_b = b.await.unwrap().unwrap();
    assert_eq!(inserted_a + inserted_b, 3);

    let cached = store
        .get_range("NSE", "HDFCBANK", Utc::now() - Duration::days(10))
        .await
        .unwrap();
    assert_eq!(cached.len(), 3);
}
