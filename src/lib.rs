//! Binance Feed Bot - Main Library
//!
//! Ingests Binance book-ticker streams over a resilient WebSocket
//! connection and keeps an always-current, never-silently-stale view of
//! top-of-book quotes.
//!
//! ## Architecture
//!
//! - **feedsock**: connection lifecycle library (re-exported from workspace)
//! - **tickerfeed**: quote store, decoder, monitors and configuration
//!   (re-exported from workspace)
//! - **bin_common**: common utilities for binary executables

// Re-export workspace libraries for convenience
pub use feedsock;
pub use tickerfeed;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config_from_env, ConfigType};
}
