//! Market data providers

pub mod coingecko_provider;
pub mod cached_provider;

// Re-export for convenience
pub use coingecko_provider::CoinGeckoProvider;
pub use cached_provider::{CachedMarketProvider, RetryPolicy};
