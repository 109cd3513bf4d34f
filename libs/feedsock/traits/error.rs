use thiserror::Error;

/// Main error type for feedsock
#[derive(Error, Debug)]
pub enum FeedSockError {
    /// WebSocket connection error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Connection closed unexpectedly
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Frame handler error
    #[error("Frame error: {0}")]
    Frame(String),

    /// Keepalive timeout (ping sent, no pong within the deadline)
    #[error("Keepalive timed out: {0}")]
    KeepaliveTimeout(String),
}

/// Result type for feedsock operations
pub type Result<T> = std::result::Result<T, FeedSockError>;
