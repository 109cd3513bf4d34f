//! Client configuration

use std::time::Duration;

/// Configuration for a [`FeedClient`](crate::client::FeedClient)
///
/// The subscribed stream set is static configuration: it is encoded into
/// the connection URL as a `streams=` query parameter and therefore issued
/// as part of the handshake, never renegotiated.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base WebSocket URL (wss:// or ws://), without the stream list
    pub url: String,
    /// Stream identifiers to multiplex, e.g. `btcusdt@bookTicker`
    pub streams: Vec<String>,
    /// Delay before the first reconnect doubling step
    pub initial_reconnect_delay: Duration,
    /// Hard cap on the reconnect delay
    pub max_reconnect_delay: Duration,
    /// Reconnect budget; exhausting it is a terminal failure
    pub max_reconnect_attempts: u32,
    /// Interval between keepalive pings
    pub ping_interval: Duration,
    /// How long to wait for a pong before declaring the connection dead
    pub ping_timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, streams: Vec<String>) -> Self {
        Self {
            url: url.into(),
            streams,
            ..Default::default()
        }
    }

    /// Full connection URL with the multiplexed stream list appended
    pub fn stream_url(&self) -> String {
        if self.streams.is_empty() {
            self.url.clone()
        } else {
            format!("{}?streams={}", self.url, self.streams.join("/"))
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            streams: Vec::new(),
            initial_reconnect_delay: Duration::from_secs(5),
            max_reconnect_delay: Duration::from_secs(60),
            max_reconnect_attempts: 10,
            ping_interval: Duration::from_secs(20),
            ping_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_joins_with_slash() {
        let config = ClientConfig::new(
            "wss://stream.binance.com:9443/stream",
            vec!["btcusdt@bookTicker".into(), "ethusdt@bookTicker".into()],
        );
        assert_eq!(
            config.stream_url(),
            "wss://stream.binance.com:9443/stream?streams=btcusdt@bookTicker/ethusdt@bookTicker"
        );
    }

    #[test]
    fn test_stream_url_without_streams() {
        let config = ClientConfig::new("ws://127.0.0.1:9000", Vec::new());
        assert_eq!(config.stream_url(), "ws://127.0.0.1:9000");
    }
}
