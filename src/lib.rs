//! Crypto Price Tracker Library
//!
//! A terminal dashboard for live cryptocurrency prices from the CoinGecko
//! API: a fixed watch-list merged with free-text search results, sortable
//! by rank, name, price or 24h change, refreshed on a fixed interval.

// Public modules - these are the API surface
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod tracker;
pub mod traits;
pub mod utils;

// Re-export commonly used items for easier access
pub use commands::{Command, CommandQueue};
pub use config::TrackerConfig;
pub use error::FetchError;
pub use handlers::ConsoleEventHandler;
pub use models::{
    coin::{Coin, SearchMatch},
    view::{MarketView, SortDirection, SortKey, ViewState, ViewStatus},
};
pub use providers::{CachedMarketProvider, CoinGeckoProvider, RetryPolicy};
pub use tracker::MarketTracker;
pub use traits::{MarketDataProvider, MarketEventHandler};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for library functions
pub type Result<T> = std::result::Result<T, anyhow::Error>;
