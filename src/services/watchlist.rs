//! Read-only watchlist access.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::StoreError;
use crate::models::bar::Symbol;

/// Narrow read interface over wherever watchlists actually live. A name that
/// was never populated yields an empty list, not an error.
#[async_trait]
pub trait WatchlistSource: Send + Sync {
    async fn list_symbols(&self, name: &str) -> Result<Vec<Symbol>, StoreError>;
}

/// In-memory watchlists, used in tests and cache-only runs.
#[derive(Default)]
pub struct StaticWatchlist {
    lists: HashMap<String, Vec<Symbol>>,
}

impl StaticWatchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, name: impl Into<String>, symbols: Vec<Symbol>) -> Self {
        self.lists.insert(name.into(), symbols);
        self
    }
}

#[async_trait]
impl WatchlistSource for StaticWatchlist {
    async fn list_symbols(&self, name: &str) -> Result<Vec<Symbol>, StoreError> {
        Ok(self.lists.get(name).cloned().unwrap_or_default())
    }
}
