//! Periodic health monitors
//!
//! Pure observers: each task wakes on its own interval, reads published
//! state and emits a log-level signal when something is wrong. Neither
//! task mutates the store or the connection; every wake re-evaluates from
//! scratch, so a persistent problem keeps re-emitting.

use crate::store::QuoteStore;
use crate::utils::ShutdownManager;
use feedsock::AtomicConnectionState;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Raises a staleness signal when any observed quote ages past the
/// threshold
pub struct FreshnessMonitor {
    store: Arc<QuoteStore>,
    interval: Duration,
    stale_threshold_ms: i64,
}

impl FreshnessMonitor {
    pub fn new(store: Arc<QuoteStore>, interval: Duration, stale_threshold_ms: i64) -> Self {
        Self {
            store,
            interval,
            stale_threshold_ms,
        }
    }

    pub async fn run(self, shutdown: ShutdownManager) {
        info!("Freshness monitor started");
        while shutdown.is_running() {
            shutdown.interruptible_sleep(self.interval).await;
            if !shutdown.is_running() {
                break;
            }
            if !self.store.is_fresh(self.stale_threshold_ms) {
                let stale = self.store.stale_symbols(self.stale_threshold_ms);
                warn!(
                    "Data freshness check failed - stale quotes (>{}ms): {}",
                    self.stale_threshold_ms,
                    stale.join(", ")
                );
            }
        }
        info!("Freshness monitor stopped");
    }
}

/// Raises a signal when the feed connection is down
pub struct ConnectionWatchdog {
    connection: Arc<AtomicConnectionState>,
    interval: Duration,
}

impl ConnectionWatchdog {
    pub fn new(connection: Arc<AtomicConnectionState>, interval: Duration) -> Self {
        Self {
            connection,
            interval,
        }
    }

    pub async fn run(self, shutdown: ShutdownManager) {
        info!("Connection watchdog started");
        while shutdown.is_running() {
            shutdown.interruptible_sleep(self.interval).await;
            if !shutdown.is_running() {
                break;
            }
            if !self.connection.is_connected() {
                warn!(
                    "WebSocket not connected (state: {}). Waiting...",
                    self.connection.get()
                );
            }
        }
        info!("Connection watchdog stopped");
    }
}
