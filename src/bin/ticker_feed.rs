use anyhow::Result;
use binance_feed_bot::bin_common::{load_config_from_env, ConfigType};
use feedsock::{ClientEvent, FeedClient};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tickerfeed::{
    init_tracing_with_level, BookTickerHandler, ConnectionWatchdog, FeedConfig, FreshnessMonitor,
    QuoteStore, ShutdownManager,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load config first (before logging is initialized)
    let config_path = load_config_from_env(ConfigType::Feed);
    let config = FeedConfig::load(&config_path)?;

    init_tracing_with_level(&config.log_level);
    config.log();

    let store = Arc::new(QuoteStore::new(config.symbols.iter().cloned()));
    let handler = BookTickerHandler::new(Arc::clone(&store));
    let decode_failures = handler.decode_failures_handle();

    let mut client = FeedClient::start(config.client_config(), handler);

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let freshness = FreshnessMonitor::new(
        Arc::clone(&store),
        config.freshness_check_interval(),
        config.stale_threshold_ms,
    );
    let watchdog = ConnectionWatchdog::new(
        client.state_handle(),
        config.connection_check_interval(),
    );
    let freshness_handle = tokio::spawn(freshness.run(shutdown.clone()));
    let watchdog_handle = tokio::spawn(watchdog.run(shutdown.clone()));

    print_banner("Binance Ticker Feed", config.display_interval_secs);

    // Display loop; doubles as the drain for client lifecycle events
    while shutdown.is_running() {
        drain_client_events(&client);
        display_prices(&store);

        let failures = decode_failures.load(Ordering::Relaxed);
        if failures > 0 {
            info!("Decode failures so far: {}", failures);
        }

        shutdown
            .interruptible_sleep(config.display_interval())
            .await;
    }

    client.stop().await;
    let _ = tokio::join!(freshness_handle, watchdog_handle);

    print_shutdown("Ticker feed");
    Ok(())
}

fn drain_client_events(client: &FeedClient) {
    while let Some(event) = client.try_recv_event() {
        match event {
            ClientEvent::Connected => info!("Feed connected"),
            ClientEvent::Disconnected => warn!("Feed disconnected"),
            ClientEvent::Reconnecting(attempt) => {
                warn!("Feed reconnecting (attempt {})", attempt)
            }
            ClientEvent::Failed { attempts } => error!(
                "FEED FAILED after {} reconnect attempts - data flow has stopped, restart required",
                attempts
            ),
        }
    }
}

fn display_prices(store: &QuoteStore) {
    let prices = store.get_all();
    let mut symbols: Vec<_> = prices.keys().cloned().collect();
    symbols.sort();

    info!("=== Current Price Data ===");
    for symbol in symbols {
        if let Some(quote) = prices.get(&symbol) {
            if quote.has_data() {
                info!(
                    "{}: Bid=${:.4}, Ask=${:.4}, Spread={:.3}%",
                    symbol,
                    quote.bid,
                    quote.ask,
                    quote.spread_pct()
                );
            }
        }
    }
    info!("=========================");
}

fn print_banner(name: &str, display_interval_secs: u64) {
    info!("");
    info!("========================================");
    info!("Starting {}", name);
    info!("Display interval: {}s", display_interval_secs);
    info!("Press Ctrl+C to stop");
    info!("========================================");
    info!("");
}

fn print_shutdown(name: &str) {
    info!("");
    info!("========================================");
    info!("{} stopped gracefully", name);
    info!("========================================");
}
