//! Dashboard controller

pub mod market_tracker;

pub use market_tracker::MarketTracker;
