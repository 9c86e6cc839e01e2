//! Data models for the price tracker

pub mod coin;
pub mod market;
pub mod view;

// Re-export for convenience
pub use coin::{Coin, SearchMatch, SearchResponse};
pub use market::{merge_and_sort, merge_coins, sort_coins};
pub use view::{MarketView, SortDirection, SortKey, ViewState, ViewStatus};
