//! Binance book-ticker feed
//!
//! Market-data domain layer on top of [`feedsock`]: the quote store, the
//! book-ticker frame decoder, the freshness and connection monitors, and
//! the configuration/logging/shutdown plumbing shared by the binaries.

pub mod config;
pub mod decoder;
pub mod handler;
pub mod monitor;
pub mod store;
pub mod utils;

// Re-export commonly used items
pub use config::{ConfigError, FeedConfig};
pub use decoder::{decode, DecodeError, DecodedQuote};
pub use handler::BookTickerHandler;
pub use monitor::{ConnectionWatchdog, FreshnessMonitor};
pub use store::{Quote, QuoteStore};
pub use utils::{init_tracing, init_tracing_with_level, ShutdownManager};
