//! External collaborators: quote provider, symbol resolution, watchlists.

pub mod quote_provider;
pub mod resolver;
pub mod rest;
pub mod watchlist;

pub use quote_provider::{FetchThrottle, InstrumentMatch, QuoteProvider};
pub use resolver::SymbolResolver;
pub use rest::RestQuoteProvider;
pub use watchlist::{StaticWatchlist, WatchlistSource};
