//! Scan orchestration: fan a watchlist out over a bounded worker pool,
//! resolve and classify each symbol exactly once, and aggregate the results.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::ScanConfig;
use crate::db::CandleStore;
use crate::error::{ProviderError, ScanError, StoreError};
use crate::metrics::Metrics;
use crate::models::bar::{Bar, Symbol};
use crate::models::scan::{RejectReason, ScanReport, ScanResult};
use crate::patterns::{classify_series, Classification};
use crate::services::quote_provider::QuoteProvider;
use crate::services::resolver::SymbolResolver;
use crate::services::watchlist::WatchlistSource;

/// Extra days requested beyond the lookback window so weekends and holidays
/// at the window edge still leave enough sessions.
const FETCH_PAD_DAYS: i64 = 5;

pub struct ScanOrchestrator {
    provider: Arc<dyn QuoteProvider>,
    store: Arc<dyn CandleStore>,
    watchlists: Arc<dyn WatchlistSource>,
    resolver: Arc<SymbolResolver>,
    config: ScanConfig,
    metrics: Option<Arc<Metrics>>,
}

impl ScanOrchestrator {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        store: Arc<dyn CandleStore>,
        watchlists: Arc<dyn WatchlistSource>,
        config: ScanConfig,
    ) -> Self {
        let resolver = Arc::new(SymbolResolver::new(provider.clone()));
        Self {
            provider,
            store,
            watchlists,
            resolver,
            config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run one scan over the named watchlist.
    ///
    /// The provider session is validated once up front; its failure is the
    /// only whole-scan abort path. Each symbol is attempted exactly once and
    /// always lands in exactly one of the report's two groups.
    pub async fn run_scan(&self, watchlist: &str) -> Result<ScanReport, ScanError> {
        let started = Instant::now();
        let symbols = self.watchlists.list_symbols(watchlist).await?;
        info!(watchlist, symbols = symbols.len(), "starting scan");

        if let Some(ref metrics) = self.metrics {
            metrics.scans_total.inc();
        }

        if symbols.is_empty() {
            return Ok(ScanReport::from_results(Vec::new()));
        }

        self.provider
            .ensure_session()
            .await
            .map_err(ScanError::Auth)?;

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let mut workers = JoinSet::new();

        for symbol in symbols {
            let semaphore = semaphore.clone();
            let provider = self.provider.clone();
            let store = self.store.clone();
            let resolver = self.resolver.clone();
            let config = self.config.clone();
            workers.spawn(async move {
                // The semaphore is never closed; acquire only fails then.
                let _permit = semaphore.acquire_owned().await.ok();
                scan_symbol(provider, store, resolver, config, symbol).await
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => error!(error = %e, "scan worker panicked"),
            }
        }

        let report = ScanReport::from_results(results);
        if let Some(ref metrics) = self.metrics {
            metrics
                .symbols_scanned_total
                .inc_by(report.counts.total as u64);
            metrics
                .symbols_eligible_total
                .inc_by(report.counts.eligible as u64);
            metrics
                .provider_fetch_errors_total
                .inc_by(count_reason(&report, RejectReason::FetchFailed));
            metrics
                .scan_duration_seconds
                .observe(started.elapsed().as_secs_f64());
        }

        info!(
            watchlist,
            eligible = report.counts.eligible,
            rejected = report.counts.rejected,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan finished"
        );
        Ok(report)
    }
}

fn count_reason(report: &ScanReport, reason: RejectReason) -> u64 {
    report
        .rejected
        .iter()
        .filter(|r| r.reason == Some(reason))
        .count() as u64
}

/// Per-symbol pipeline failures, mapped to reject reasons at the worker
/// boundary and never propagated further.
enum SymbolError {
    Provider(ProviderError),
    Store(StoreError),
}

async fn scan_symbol(
    provider: Arc<dyn QuoteProvider>,
    store: Arc<dyn CandleStore>,
    resolver: Arc<SymbolResolver>,
    config: ScanConfig,
    symbol: Symbol,
) -> ScanResult {
    let Some(token) = resolver.resolve(&symbol).await else {
        debug!(symbol = %symbol.trading_symbol, "no token resolved, rejecting");
        return ScanResult::rejected(&symbol, RejectReason::TokenNotFound);
    };

    let series = match load_series(&*provider, &*store, &config, &symbol, &token).await {
        Ok(series) => series,
        Err(SymbolError::Provider(e)) => {
            error!(symbol = %symbol.trading_symbol, error = %e, "candle fetch failed");
            return ScanResult::rejected(&symbol, RejectReason::FetchFailed);
        }
        Err(SymbolError::Store(e)) => {
            error!(symbol = %symbol.trading_symbol, error = %e, "candle store failed");
            return ScanResult::rejected(&symbol, RejectReason::StoreFailed);
        }
    };

    match classify_series(&series, &config) {
        Classification::Eligible {
            candle_time,
            levels,
        } => {
            info!(
                symbol = %symbol.trading_symbol,
                candle_time = %candle_time,
                entry_sell = levels.entry_sell,
                stop_loss = levels.stop_loss,
                target = levels.target,
                "shooting star flagged"
            );
            ScanResult::eligible(&symbol, candle_time, levels)
        }
        Classification::Rejected(reason) => {
            debug!(symbol = %symbol.trading_symbol, reason = %reason, "rejected");
            ScanResult::rejected(&symbol, reason)
        }
    }
}

/// Cache-first series load.
///
/// A cached window holding at least `min_candles` bars short-circuits the
/// network entirely. On a miss the fetched bars are ingested and the range is
/// re-read, so classification always sees what the store holds.
async fn load_series(
    provider: &dyn QuoteProvider,
    store: &dyn CandleStore,
    config: &ScanConfig,
    symbol: &Symbol,
    token: &str,
) -> Result<Vec<Bar>, SymbolError> {
    let now = Utc::now();
    let from = now - ChronoDuration::days(config.lookback_days);

    let cached = store
        .get_range(&symbol.exchange, &symbol.trading_symbol, from)
        .await
        .map_err(SymbolError::Store)?;
    if cached.len() >= config.min_candles {
        debug!(
            symbol = %symbol.trading_symbol,
            bars = cached.len(),
            "cache hit, skipping provider fetch"
        );
        return Ok(cached);
    }

    let fetch_from = from - ChronoDuration::days(FETCH_PAD_DAYS);
    let fetched = provider
        .fetch_daily_bars(&symbol.exchange, token, fetch_from, now)
        .await
        .map_err(SymbolError::Provider)?;

    let inserted = store
        .ingest(&symbol.exchange, &symbol.trading_symbol, token, &fetched)
        .await
        .map_err(SymbolError::Store)?;
    debug!(
        symbol = %symbol.trading_symbol,
        fetched = fetched.len(),
        inserted,
        "ingested provider bars"
    );

    store
        .get_range(&symbol.exchange, &symbol.trading_symbol, from)
        .await
        .map_err(SymbolError::Store)
}
