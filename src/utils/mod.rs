//! Formatting helpers

pub mod helper;

pub use helper::{format_change, format_price, format_rank, truncate_string, NOT_AVAILABLE};
