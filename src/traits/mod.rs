//! Core traits for the price tracker

pub mod market_provider;
pub mod event_handler;

// Re-export for convenience
pub use market_provider::MarketDataProvider;
pub use event_handler::MarketEventHandler;
