//! Error taxonomy for the scanning pipeline.
//!
//! Only `ScanError::Auth` is fatal for a whole scan. Everything else is
//! caught at the worker boundary and turned into a reject reason on the
//! per-symbol result.

use thiserror::Error;

/// Failures talking to the external quote provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Session could not be established or is missing. Fatal for the scan.
    #[error("provider authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure (connect, timeout, non-success status body read).
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered, but the payload did not have the expected shape.
    #[error("unexpected provider payload: {0}")]
    Shape(String),
}

/// Failures reading from or writing to the candle store or watchlist source.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connect(String),

    #[error("store query failed: {0}")]
    Query(String),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

/// Whole-scan failures returned by `ScanOrchestrator::run_scan`.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Session validation failed before any worker started.
    #[error("scan aborted: {0}")]
    Auth(#[source] ProviderError),

    /// The watchlist itself could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}
