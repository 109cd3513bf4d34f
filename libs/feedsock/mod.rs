//! # FeedSock
//!
//! A resilient WebSocket feed client built around an explicit connection
//! state machine.
//!
//! ## Features
//!
//! - **Explicit state machine**: `Disconnected -> Connecting -> Connected ->
//!   Reconnecting -> Failed`, driven by a single receive loop instead of
//!   scattered callbacks
//! - **Capped exponential backoff**: doubling reconnect delays with a hard
//!   cap; the attempt counter resets only on a successful connect
//! - **Keepalive**: periodic WebSocket pings with pong-timeout detection
//! - **Interruptible everywhere**: a stop signal cancels the receive loop
//!   and any pending backoff wait within sub-second latency
//! - **Frame-handler seam**: inbound text frames are handed, in arrival
//!   order, to a pluggable [`FrameHandler`]

pub mod core;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use self::core::{
    backoff::Backoff,
    client::{ClientEvent, FeedClient, Metrics},
    config::ClientConfig,
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState},
    pong_tracker::PongTracker,
};

/// Type alias for Result with FeedSockError
pub type Result<T> = std::result::Result<T, traits::FeedSockError>;
