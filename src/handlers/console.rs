use async_trait::async_trait;
use tracing::info;

use crate::handlers::table::render_lines;
use crate::models::view::MarketView;
use crate::traits::event_handler::MarketEventHandler;

/// Console presenter: writes each frame through the log
pub struct ConsoleEventHandler;

impl ConsoleEventHandler {
    /// Create a new console event handler
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketEventHandler for ConsoleEventHandler {
    async fn handle_view(&self, view: &MarketView) {
        info!("{}", "=".repeat(80));
        for line in render_lines(view) {
            info!("{}", line);
        }
        info!("{}", "=".repeat(80));
    }
}
