//! Frame handler wiring the decoder to the quote store

use crate::decoder::{decode, DecodeError};
use crate::store::QuoteStore;
use async_trait::async_trait;
use feedsock::{FrameHandler, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Decodes book-ticker frames and writes them into the store
///
/// The single mutation path for quote data. Decode misses are contained
/// here: unrecognized frames are dropped at debug level, malformed ones
/// are counted and logged.
pub struct BookTickerHandler {
    store: Arc<QuoteStore>,
    decode_failures: Arc<AtomicU64>,
}

impl BookTickerHandler {
    pub fn new(store: Arc<QuoteStore>) -> Self {
        Self {
            store,
            decode_failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared counter of malformed frames, for display/observability
    pub fn decode_failures_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.decode_failures)
    }
}

#[async_trait]
impl FrameHandler for BookTickerHandler {
    async fn on_frame(&self, text: &str) -> Result<()> {
        match decode(text) {
            Ok(quote) => {
                self.store.update(
                    &quote.symbol,
                    quote.bid,
                    quote.ask,
                    quote.bid_qty,
                    quote.ask_qty,
                );
                debug!(
                    "{}: Bid=${:.4} (Qty: {:.2}), Ask=${:.4} (Qty: {:.2})",
                    quote.symbol, quote.bid, quote.bid_qty, quote.ask, quote.ask_qty
                );
            }
            Err(DecodeError::Unrecognized) => {
                debug!("Ignoring unrecognized frame");
            }
            Err(e @ DecodeError::Malformed(_)) => {
                self.decode_failures.fetch_add(1, Ordering::Relaxed);
                warn!("Dropping malformed frame: {}", e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> (BookTickerHandler, Arc<QuoteStore>) {
        let store = Arc::new(QuoteStore::new(["BTCUSDT", "ETHUSDT"]));
        (BookTickerHandler::new(Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn test_valid_frame_updates_store() {
        let (handler, store) = handler();
        let frame = r#"{"stream":"btcusdt@bookTicker","data":{"s":"BTCUSDT","b":"100.0","B":"1.0","a":"101.0","A":"2.0"}}"#;

        handler.on_frame(frame).await.unwrap();

        let quote = store.get("BTCUSDT");
        assert_eq!(quote.bid, 100.0);
        assert_eq!(quote.ask, 101.0);
        assert_eq!(handler.decode_failures_handle().load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_malformed_frame_counted_and_store_unchanged() {
        let (handler, store) = handler();
        let before = store.get_all();

        let frame = r#"{"stream":"btcusdt@bookTicker","data":{"s":"BTCUSDT","b":"oops","B":"1.0","a":"101.0","A":"2.0"}}"#;
        handler.on_frame(frame).await.unwrap();

        assert_eq!(store.get_all(), before);
        assert_eq!(handler.decode_failures_handle().load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_frame_is_silent() {
        let (handler, store) = handler();
        let before = store.get_all();

        handler.on_frame(r#"{"result":null,"id":312}"#).await.unwrap();

        assert_eq!(store.get_all(), before);
        assert_eq!(handler.decode_failures_handle().load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_untracked_symbol_frame_is_dropped() {
        let (handler, store) = handler();
        let frame = r#"{"stream":"dogeusdt@bookTicker","data":{"s":"DOGEUSDT","b":"0.1","B":"1.0","a":"0.2","A":"2.0"}}"#;

        handler.on_frame(frame).await.unwrap();

        assert_eq!(store.get_all().len(), 2);
        assert!(!store.get_all().contains_key("DOGEUSDT"));
    }
}
