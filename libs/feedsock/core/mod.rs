//! Core client machinery: state machine, backoff, keepalive and the
//! receive loop.

pub mod backoff;
pub mod client;
pub mod config;
pub mod connection_state;
pub mod pong_tracker;

// Re-export main types
pub use backoff::Backoff;
pub use client::{ClientEvent, FeedClient, Metrics};
pub use config::ClientConfig;
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
pub use pong_tracker::PongTracker;
