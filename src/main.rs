use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crypto_price_tracker::{
    CachedMarketProvider, CoinGeckoProvider, CommandQueue, ConsoleEventHandler, MarketTracker,
    TrackerConfig, VERSION,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    let result: anyhow::Result<()> = runtime.block_on(async {
        let config = TrackerConfig::from_env();

        info!("Initializing crypto price tracker v{}...", VERSION);
        info!("API URL: {}", config.api_url);

        let api = Arc::new(CoinGeckoProvider::new(config.api_url.clone())?);
        let provider = Arc::new(CachedMarketProvider::from_config(api, &config));
        let tracker = MarketTracker::new(config, provider, Arc::new(ConsoleEventHandler::new()));

        let (queue, commands) = CommandQueue::new();
        queue.spawn_stdin_reader();

        info!("Type to search, :sort <rank|name|price|change> to sort, :retry to reload, :quit to exit");

        tokio::select! {
            result = tracker.run(commands) => {
                if let Err(e) = &result {
                    error!("Tracker error: {}", e);
                }
                result?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Received Ctrl+C");
            }
        }

        info!("Shutting down...");

        Ok::<(), anyhow::Error>(())
    });

    // The stdin reader sits on a blocking thread; don't wait for it.
    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}
