//! Bullscan Scanner
//!
//! Runs one scan over a watchlist (first CLI argument, or the configured
//! default) against the Postgres-backed stack and prints the report as JSON.

use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;

use bullscan::config::{self, ScanConfig};
use bullscan::db::postgres::{self, PgCandleStore, PgWatchlistSource};
use bullscan::logging;
use bullscan::metrics::Metrics;
use bullscan::services::{FetchThrottle, RestQuoteProvider};
use bullscan::ScanOrchestrator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let watchlist = std::env::args()
        .nth(1)
        .unwrap_or_else(config::get_default_watchlist);
    let scan_config = ScanConfig::from_env();

    info!(environment = %config::get_environment(), watchlist, "starting bullscan");

    let client = postgres::connect(&config::get_database_url()).await?;
    let store = Arc::new(PgCandleStore::new(client.clone()));
    store.init_schema().await?;
    let watchlists = Arc::new(PgWatchlistSource::new(client));

    let throttle = Arc::new(FetchThrottle::new(scan_config.fetch_delay()));
    let provider = Arc::new(RestQuoteProvider::from_env(throttle));

    let metrics = Arc::new(Metrics::new()?);
    let orchestrator = ScanOrchestrator::new(provider, store, watchlists, scan_config)
        .with_metrics(metrics.clone());

    let report = orchestrator.run_scan(&watchlist).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
