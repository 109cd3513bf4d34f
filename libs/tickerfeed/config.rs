//! Feed configuration
//!
//! One explicit record constructed at startup and passed into the client,
//! the store and the monitors. No ambient global state.

use feedsock::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Combined-stream WebSocket endpoint, without the stream list
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Tracked symbol set (closed; untracked updates are dropped)
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Reconnection settings
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    #[serde(default = "default_initial_reconnect_delay_secs")]
    pub initial_reconnect_delay_secs: u64,
    #[serde(default = "default_max_reconnect_delay_secs")]
    pub max_reconnect_delay_secs: u64,

    /// Connection health settings
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
    #[serde(default = "default_ping_timeout_secs")]
    pub ping_timeout_secs: u64,
    #[serde(default = "default_freshness_check_interval_secs")]
    pub freshness_check_interval_secs: u64,
    #[serde(default = "default_connection_check_interval_secs")]
    pub connection_check_interval_secs: u64,
    #[serde(default = "default_stale_threshold_ms")]
    pub stale_threshold_ms: i64,

    /// Seconds between price display refreshes
    #[serde(default = "default_display_interval_secs")]
    pub display_interval_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_ws_url() -> String {
    "wss://stream.binance.com:9443/stream".to_string()
}

fn default_symbols() -> Vec<String> {
    vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()]
}

fn default_max_reconnect_attempts() -> u32 {
    10
}

fn default_initial_reconnect_delay_secs() -> u64 {
    5
}

fn default_max_reconnect_delay_secs() -> u64 {
    60
}

fn default_ping_interval_secs() -> u64 {
    20
}

fn default_ping_timeout_secs() -> u64 {
    10
}

fn default_freshness_check_interval_secs() -> u64 {
    15
}

fn default_connection_check_interval_secs() -> u64 {
    5
}

fn default_stale_threshold_ms() -> i64 {
    30_000
}

fn default_display_interval_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            symbols: default_symbols(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            initial_reconnect_delay_secs: default_initial_reconnect_delay_secs(),
            max_reconnect_delay_secs: default_max_reconnect_delay_secs(),
            ping_interval_secs: default_ping_interval_secs(),
            ping_timeout_secs: default_ping_timeout_secs(),
            freshness_check_interval_secs: default_freshness_check_interval_secs(),
            connection_check_interval_secs: default_connection_check_interval_secs(),
            stale_threshold_ms: default_stale_threshold_ms(),
            display_interval_secs: default_display_interval_secs(),
            log_level: default_log_level(),
        }
    }
}

impl FeedConfig {
    /// Load configuration from a YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: FeedConfig = serde_yaml::from_str(&yaml_content)?;

        // Environment overrides for deploy-time tweaks
        if let Ok(url) = std::env::var("FEED_WS_URL") {
            info!("Overriding WebSocket URL from environment variable");
            config.ws_url = url;
        }
        if let Ok(symbols) = std::env::var("FEED_SYMBOLS") {
            info!("Overriding symbol set from environment variable");
            config.symbols = symbols
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ws_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "ws_url must not be empty".to_string(),
            ));
        }
        if self.symbols.is_empty() {
            return Err(ConfigError::ValidationError(
                "symbols must not be empty".to_string(),
            ));
        }
        if self.max_reconnect_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "max_reconnect_attempts must be at least 1".to_string(),
            ));
        }
        if self.initial_reconnect_delay_secs > self.max_reconnect_delay_secs {
            return Err(ConfigError::ValidationError(
                "initial_reconnect_delay_secs must not exceed max_reconnect_delay_secs"
                    .to_string(),
            ));
        }
        if self.ping_timeout_secs >= self.ping_interval_secs {
            return Err(ConfigError::ValidationError(
                "ping_timeout_secs must be below ping_interval_secs".to_string(),
            ));
        }
        if self.stale_threshold_ms <= 0 {
            return Err(ConfigError::ValidationError(
                "stale_threshold_ms must be positive".to_string(),
            ));
        }
        if self.freshness_check_interval_secs == 0 || self.connection_check_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "monitor intervals must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Stream identifiers for the tracked symbols
    pub fn streams(&self) -> Vec<String> {
        self.symbols
            .iter()
            .map(|s| format!("{}@bookTicker", s.to_lowercase()))
            .collect()
    }

    /// Build the transport-layer client configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.ws_url.clone(),
            streams: self.streams(),
            initial_reconnect_delay: Duration::from_secs(self.initial_reconnect_delay_secs),
            max_reconnect_delay: Duration::from_secs(self.max_reconnect_delay_secs),
            max_reconnect_attempts: self.max_reconnect_attempts,
            ping_interval: Duration::from_secs(self.ping_interval_secs),
            ping_timeout: Duration::from_secs(self.ping_timeout_secs),
        }
    }

    pub fn display_interval(&self) -> Duration {
        Duration::from_secs(self.display_interval_secs)
    }

    pub fn freshness_check_interval(&self) -> Duration {
        Duration::from_secs(self.freshness_check_interval_secs)
    }

    pub fn connection_check_interval(&self) -> Duration {
        Duration::from_secs(self.connection_check_interval_secs)
    }

    /// Log a configuration summary
    pub fn log(&self) {
        info!("Feed endpoint: {}", self.ws_url);
        info!("Tracked symbols: {}", self.symbols.join(", "));
        info!(
            "Reconnect: {} attempts, {}s initial delay, {}s cap",
            self.max_reconnect_attempts,
            self.initial_reconnect_delay_secs,
            self.max_reconnect_delay_secs
        );
        info!(
            "Health: ping {}s/{}s, freshness check {}s, stale threshold {}ms",
            self.ping_interval_secs,
            self.ping_timeout_secs,
            self.freshness_check_interval_secs,
            self.stale_threshold_ms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FeedConfig::default();
        config.validate().unwrap();
        assert_eq!(config.symbols, vec!["BTCUSDT", "ETHUSDT"]);
        assert_eq!(config.stale_threshold_ms, 30_000);
    }

    #[test]
    fn test_streams_are_lowercased() {
        let config = FeedConfig::default();
        assert_eq!(
            config.streams(),
            vec!["btcusdt@bookTicker", "ethusdt@bookTicker"]
        );
    }

    #[test]
    fn test_client_config_mapping() {
        let config = FeedConfig::default();
        let client = config.client_config();
        assert_eq!(
            client.stream_url(),
            "wss://stream.binance.com:9443/stream?streams=btcusdt@bookTicker/ethusdt@bookTicker"
        );
        assert_eq!(client.max_reconnect_attempts, 10);
        assert_eq!(client.initial_reconnect_delay, Duration::from_secs(5));
        assert_eq!(client.max_reconnect_delay, Duration::from_secs(60));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "symbols:\n  - SOLUSDT\n";
        let config: FeedConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.symbols, vec!["SOLUSDT"]);
        assert_eq!(config.ws_url, default_ws_url());
        assert_eq!(config.max_reconnect_attempts, 10);
    }

    #[test]
    fn test_validation_rejects_empty_symbols() {
        let config = FeedConfig {
            symbols: Vec::new(),
            ..FeedConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_inverted_delays() {
        let config = FeedConfig {
            initial_reconnect_delay_secs: 120,
            max_reconnect_delay_secs: 60,
            ..FeedConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_slow_ping_timeout() {
        let config = FeedConfig {
            ping_interval_secs: 10,
            ping_timeout_secs: 10,
            ..FeedConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_attempts() {
        let config = FeedConfig {
            max_reconnect_attempts: 0,
            ..FeedConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
