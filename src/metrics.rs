//! Prometheus metrics for scan activity.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub scans_total: IntCounter,
    pub symbols_scanned_total: IntCounter,
    pub symbols_eligible_total: IntCounter,
    pub provider_fetch_errors_total: IntCounter,
    pub scan_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scans_total = IntCounter::with_opts(Opts::new(
            "scans_total",
            "Number of watchlist scans started",
        ))?;
        let symbols_scanned_total = IntCounter::with_opts(Opts::new(
            "symbols_scanned_total",
            "Number of symbols processed across all scans",
        ))?;
        let symbols_eligible_total = IntCounter::with_opts(Opts::new(
            "symbols_eligible_total",
            "Number of symbols flagged eligible across all scans",
        ))?;
        let provider_fetch_errors_total = IntCounter::with_opts(Opts::new(
            "provider_fetch_errors_total",
            "Number of per-symbol provider fetch failures",
        ))?;
        let scan_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "scan_duration_seconds",
            "Wall-clock duration of one watchlist scan",
        ))?;

        registry.register(Box::new(scans_total.clone()))?;
        registry.register(Box::new(symbols_scanned_total.clone()))?;
        registry.register(Box::new(symbols_eligible_total.clone()))?;
        registry.register(Box::new(provider_fetch_errors_total.clone()))?;
        registry.register(Box::new(scan_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            scans_total,
            symbols_scanned_total,
            symbols_eligible_total,
            provider_fetch_errors_total,
            scan_duration_seconds,
        })
    }

    /// Export all registered metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics not valid utf-8: {}", e)))
    }
}
