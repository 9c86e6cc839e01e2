//! Presenters for dashboard frames

pub mod console;
pub mod table;

// Re-export for convenience
pub use console::ConsoleEventHandler;
pub use table::render_lines;
