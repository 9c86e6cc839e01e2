use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::coin::{Coin, SearchMatch};

/// Source of market records and search hits
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch full market records for the given coin ids
    async fn fetch_markets(&self, ids: &[String]) -> Result<Vec<Coin>, FetchError>;

    /// Free-text search returning unpriced matches, best first
    async fn search(&self, term: &str) -> Result<Vec<SearchMatch>, FetchError>;

    /// Drop any cached responses so the next call goes to the network
    async fn invalidate(&self) {
        // Default implementation does nothing
    }
}
