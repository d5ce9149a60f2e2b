//! Symbol-to-token resolution, preferring pre-known tokens over the network.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::bar::Symbol;
use crate::services::quote_provider::QuoteProvider;

pub struct SymbolResolver {
    provider: Arc<dyn QuoteProvider>,
}

impl SymbolResolver {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Resolve the provider token for a symbol.
    ///
    /// A non-empty token already on the symbol is returned as-is. Otherwise
    /// the provider search runs and the entry whose trading symbol equals the
    /// input exactly (case-sensitive) wins. Search failures are logged and
    /// collapsed into `None` so one lookup cannot abort the batch.
    pub async fn resolve(&self, symbol: &Symbol) -> Option<String> {
        if let Some(token) = symbol.known_token() {
            return Some(token.to_string());
        }

        match self
            .provider
            .search_token(&symbol.exchange, &symbol.trading_symbol)
            .await
        {
            Ok(matches) => {
                let token = matches
                    .into_iter()
                    .find(|m| m.trading_symbol == symbol.trading_symbol)
                    .map(|m| m.token)
                    .filter(|t| !t.is_empty());
                if token.is_none() {
                    debug!(
                        exchange = %symbol.exchange,
                        symbol = %symbol.trading_symbol,
                        "no exact match in provider search"
                    );
                }
                token
            }
            Err(e) => {
                warn!(
                    exchange = %symbol.exchange,
                    symbol = %symbol.trading_symbol,
                    error = %e,
                    "token lookup failed"
                );
                None
            }
        }
    }
}
