//! Quote store
//!
//! Latest top-of-book quote per tracked symbol behind one coarse mutex.
//! The tracked set is fixed at construction: updates for unknown symbols
//! are silently ignored, and every tracked symbol always has an entry
//! (zero-valued until the first update).

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Latest bid/ask for one instrument
///
/// `updated_at_ms` is stamped by the store when it accepts the update, not
/// the exchange's event time. Zero means the symbol has not been observed
/// yet. Crossed quotes (`ask < bid`) are stored as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub bid: f64,
    pub ask: f64,
    pub bid_qty: f64,
    pub ask_qty: f64,
    pub updated_at_ms: i64,
}

impl Quote {
    /// True once both sides have been populated by a real update
    pub fn has_data(&self) -> bool {
        self.bid > 0.0 && self.ask > 0.0
    }

    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Spread as a percentage of the bid
    pub fn spread_pct(&self) -> f64 {
        if self.bid > 0.0 {
            (self.spread() / self.bid) * 100.0
        } else {
            0.0
        }
    }
}

/// Thread-safe store of the latest quote per tracked symbol
///
/// Single writer (the feed connection task), any number of readers. Reads
/// hand out value copies, never references into the map.
pub struct QuoteStore {
    quotes: Mutex<HashMap<String, Quote>>,
}

impl QuoteStore {
    /// Create a store tracking exactly the given symbols
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let quotes = symbols
            .into_iter()
            .map(|s| {
                let symbol = s.into();
                let quote = Quote {
                    symbol: symbol.clone(),
                    ..Quote::default()
                };
                (symbol, quote)
            })
            .collect();
        Self {
            quotes: Mutex::new(quotes),
        }
    }

    /// Replace the stored quote for a tracked symbol
    ///
    /// Untracked symbols are ignored; the upstream may multiplex streams
    /// beyond the configured set.
    pub fn update(&self, symbol: &str, bid: f64, ask: f64, bid_qty: f64, ask_qty: f64) {
        let mut quotes = self.quotes.lock();
        if let Some(entry) = quotes.get_mut(symbol) {
            *entry = Quote {
                symbol: symbol.to_string(),
                bid,
                ask,
                bid_qty,
                ask_qty,
                updated_at_ms: Utc::now().timestamp_millis(),
            };
        }
    }

    /// Value copy of the current quote, zero-valued if unknown
    pub fn get(&self, symbol: &str) -> Quote {
        self.quotes.lock().get(symbol).cloned().unwrap_or_default()
    }

    /// Independent snapshot of the whole store
    pub fn get_all(&self) -> HashMap<String, Quote> {
        self.quotes.lock().clone()
    }

    /// Check that no observed quote has aged past `threshold_ms`
    ///
    /// Symbols that have never been updated are treated as "not yet
    /// observed", not as stale.
    pub fn is_fresh(&self, threshold_ms: i64) -> bool {
        self.is_fresh_at(Utc::now().timestamp_millis(), threshold_ms)
    }

    fn is_fresh_at(&self, now_ms: i64, threshold_ms: i64) -> bool {
        let quotes = self.quotes.lock();
        for quote in quotes.values() {
            if quote.updated_at_ms > 0 && now_ms - quote.updated_at_ms > threshold_ms {
                return false;
            }
        }
        true
    }

    /// Symbols with an observed quote older than `threshold_ms`
    pub fn stale_symbols(&self, threshold_ms: i64) -> Vec<String> {
        let now_ms = Utc::now().timestamp_millis();
        let quotes = self.quotes.lock();
        let mut stale: Vec<String> = quotes
            .values()
            .filter(|q| q.updated_at_ms > 0 && now_ms - q.updated_at_ms > threshold_ms)
            .map(|q| q.symbol.clone())
            .collect();
        stale.sort();
        stale
    }
}
