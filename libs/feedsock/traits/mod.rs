//! # FeedSock Traits
//!
//! Core traits and types for the FeedSock client library:
//!
//! - **FrameHandler**: consume inbound text frames in arrival order
//! - **FeedSockError**: error taxonomy for transport and handler failures

pub mod error;
pub mod handler;

// Re-export commonly used types
pub use error::{FeedSockError, Result};
pub use handler::{FrameHandler, NoOpHandler};
