//! Postgres-backed candle store and watchlist source.
//!
//! The candles table carries a primary key on (exchange, trading_symbol,
//! candle_time) and ingestion uses `ON CONFLICT DO NOTHING`, which is what
//! makes the upsert-or-ignore contract hold under concurrent workers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_postgres::{Client, NoTls};
use tracing::error;

use crate::db::CandleStore;
use crate::error::StoreError;
use crate::models::bar::{Bar, Symbol};
use crate::services::watchlist::WatchlistSource;

/// Connect and spawn the background connection task.
pub async fn connect(database_url: &str) -> Result<Arc<Client>, StoreError> {
    let (client, connection) = tokio_postgres::connect(database_url, NoTls)
        .await
        .map_err(|e| StoreError::Connect(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!(error = %e, "postgres connection error");
        }
    });

    Ok(Arc::new(client))
}

pub struct PgCandleStore {
    client: Arc<Client>,
}

impl PgCandleStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS candles (
                    exchange TEXT NOT NULL,
                    trading_symbol TEXT NOT NULL,
                    symbol_token TEXT,
                    candle_time TIMESTAMPTZ NOT NULL,
                    open_price DOUBLE PRECISION NOT NULL,
                    high_price DOUBLE PRECISION NOT NULL,
                    low_price DOUBLE PRECISION NOT NULL,
                    close_price DOUBLE PRECISION NOT NULL,
                    volume DOUBLE PRECISION,
                    PRIMARY KEY (exchange, trading_symbol, candle_time)
                );
                CREATE TABLE IF NOT EXISTS stocks (
                    list_name TEXT NOT NULL,
                    exchange TEXT NOT NULL,
                    trading_symbol TEXT NOT NULL,
                    symbol_token TEXT
                );",
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CandleStore for PgCandleStore {
    async fn get_range(
        &self,
        exchange: &str,
        trading_symbol: &str,
        from: DateTime<Utc>,
    ) -> Result<Vec<Bar>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT candle_time, open_price, high_price, low_price, close_price, volume
                 FROM candles
                 WHERE exchange = $1 AND trading_symbol = $2 AND candle_time >= $3
                 ORDER BY candle_time ASC",
                &[&exchange, &trading_symbol, &from],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| Bar {
                time: row.get(0),
                open: row.get(1),
                high: row.get(2),
                low: row.get(3),
                close: row.get(4),
                volume: row.get(5),
            })
            .collect())
    }

    async fn ingest(
        &self,
        exchange: &str,
        trading_symbol: &str,
        token: &str,
        bars: &[Bar],
    ) -> Result<usize, StoreError> {
        let statement = self
            .client
            .prepare(
                "INSERT INTO candles
                    (exchange, trading_symbol, symbol_token, candle_time,
                     open_price, high_price, low_price, close_price, volume)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 ON CONFLICT (exchange, trading_symbol, candle_time) DO NOTHING",
            )
            .await?;

        let mut inserted = 0;
        for bar in bars {
            inserted += self
                .client
                .execute(
                    &statement,
                    &[
                        &exchange,
                        &trading_symbol,
                        &token,
                        &bar.time,
                        &bar.open,
                        &bar.high,
                        &bar.low,
                        &bar.close,
                        &bar.volume,
                    ],
                )
                .await? as usize;
        }
        Ok(inserted)
    }
}

/// Watchlists read from the `stocks` table, one row per listed symbol.
pub struct PgWatchlistSource {
    client: Arc<Client>,
}

impl PgWatchlistSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WatchlistSource for PgWatchlistSource {
    async fn list_symbols(&self, name: &str) -> Result<Vec<Symbol>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT exchange, trading_symbol, symbol_token
                 FROM stocks WHERE list_name = $1",
                &[&name],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| Symbol {
                exchange: row.get(0),
                trading_symbol: row.get(1),
                token: row.get::<_, Option<String>>(2).filter(|t| !t.is_empty()),
            })
            .collect())
    }
}
