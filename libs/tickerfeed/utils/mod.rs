//! Shared process utilities

pub mod logging;
pub mod shutdown;

pub use logging::{init_tracing, init_tracing_with_level};
pub use shutdown::ShutdownManager;
