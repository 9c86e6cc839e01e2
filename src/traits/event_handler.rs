use async_trait::async_trait;

use crate::models::view::MarketView;

/// Presenter for dashboard frames
#[async_trait]
pub trait MarketEventHandler: Send + Sync {
    /// Render the current view
    async fn handle_view(&self, view: &MarketView);
}
