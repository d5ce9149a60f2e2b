//! Unit tests for symbol-to-token resolution

use async_trait::async_trait;
use bullscan::error::ProviderError;
use bullscan::models::{Bar, Symbol};
use bullscan::services::{InstrumentMatch, QuoteProvider, SymbolResolver};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct StubProvider {
    matches: Vec<InstrumentMatch>,
    fail_search: bool,
    search_calls: AtomicUsize,
}

impl StubProvider {
    fn with_matches(matches: Vec<InstrumentMatch>) -> Self {
        Self {
            matches,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail_search: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl QuoteProvider for StubProvider {
    async fn ensure_session(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn search_token(
        &self,
        _exchange: &str,
        _trading_symbol: &str,
    ) -> Result<Vec<InstrumentMatch>, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(ProviderError::Shape("search exploded".to_string()));
        }
        Ok(self.matches.clone())
    }

    async fn fetch_daily_bars(
        &self,
        _exchange: &str,
        _token: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ProviderError> {
        Ok(Vec::new())
    }
}

fn entry(symbol: &str, token: &str) -> InstrumentMatch {
    InstrumentMatch {
        trading_symbol: symbol.to_string(),
        token: token.to_string(),
    }
}

#[tokio::test]
async fn known_token_short_circuits_the_search() {
    let provider = Arc::new(StubProvider::default());
    let resolver = SymbolResolver::new(provider.clone());
    let symbol = Symbol::new("NSE", "RELIANCE").with_token("2885");

    assert_eq!(resolver.resolve(&symbol).await.as_deref(), Some("2885"));
    assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_known_token_falls_back_to_search() {
    let provider = Arc::new(StubProvider::with_matches(vec![entry("RELIANCE", "2885")]));
    let resolver = SymbolResolver::new(provider.clone());
    let symbol = Symbol::new("NSE", "RELIANCE").with_token("");

    assert_eq!(resolver.resolve(&symbol).await.as_deref(), Some("2885"));
    assert_eq!(provider.search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn search_requires_exact_match() {
    let provider = Arc::new(StubProvider::with_matches(vec![
        entry("RELIANCEPP", "2886"),
        entry("RELIANCE", "2885"),
    ]));
    let resolver = SymbolResolver::new(provider);

    let resolved = resolver.resolve(&Symbol::new("NSE", "RELIANCE")).await;
    assert_eq!(resolved.as_deref(), Some("2885"));
}

#[tokio::test]
async fn match_is_case_sensitive() {
    let provider = Arc::new(StubProvider::with_matches(vec![entry("RELIANCE", "2885")]));
    let resolver = SymbolResolver::new(provider);

    assert_eq!(resolver.resolve(&Symbol::new("NSE", "reliance")).await, None);
}

#[tokio::test]
async fn search_error_collapses_to_none() {
    let provider = Arc::new(StubProvider::failing());
    let resolver = SymbolResolver::new(provider);

    assert_eq!(resolver.resolve(&Symbol::new("NSE", "RELIANCE")).await, None);
}

#[tokio::test]
async fn empty_token_in_search_result_is_not_found() {
    let provider = Arc::new(StubProvider::with_matches(vec![entry("RELIANCE", "")]));
    let resolver = SymbolResolver::new(provider);

    assert_eq!(resolver.resolve(&Symbol::new("NSE", "RELIANCE")).await, None);
}
