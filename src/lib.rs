//! Bullscan: watchlist scanner for the shooting-star-after-uptrend setup.
//!
//! The pipeline resolves each watchlist symbol to a provider token, loads its
//! recent daily bars cache-first (falling back to a rate-limited provider
//! fetch plus idempotent ingestion), classifies the series with pure pattern
//! functions, and aggregates one result per symbol with partial-failure
//! isolation.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod patterns;
pub mod scan;
pub mod services;

pub use config::ScanConfig;
pub use error::{ProviderError, ScanError, StoreError};
pub use models::{Bar, RejectReason, ScanReport, ScanResult, Symbol};
pub use patterns::TradeLevels;
pub use scan::ScanOrchestrator;
