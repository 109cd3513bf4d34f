//! Book-ticker frame decoder
//!
//! Pure transform from a raw combined-stream frame to a validated quote.
//! Decode failures are data-quality events: they are reported to the
//! caller for logging and counting but never affect connection state.

use serde::Deserialize;
use thiserror::Error;

/// Stream-type marker for top-of-book updates
pub const BOOK_TICKER_MARKER: &str = "@bookTicker";

/// Why a frame did not decode
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Not a combined-stream book-ticker frame at all (other stream types,
    /// subscription acks, non-JSON). Benign.
    #[error("unrecognized frame")]
    Unrecognized,

    /// Book-ticker frame with a missing or non-numeric field. Benign, but
    /// counted as a data-quality failure.
    #[error("malformed book-ticker frame: {0}")]
    Malformed(String),
}

/// A successfully decoded top-of-book update
///
/// Values are exactly what the wire carried; no rounding or normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedQuote {
    pub symbol: String,
    pub bid: f64,
    pub ask: f64,
    pub bid_qty: f64,
    pub ask_qty: f64,
}

/// Combined-stream envelope: `{"stream": "...", "data": {...}}`
#[derive(Debug, Deserialize)]
struct StreamEnvelope {
    stream: String,
    data: serde_json::Value,
}

/// Payload of a `<symbol>@bookTicker` stream
#[derive(Debug, Deserialize)]
struct BookTickerData {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "b")]
    bid: String,
    #[serde(rename = "B")]
    bid_qty: String,
    #[serde(rename = "a")]
    ask: String,
    #[serde(rename = "A")]
    ask_qty: String,
}

/// Decode one raw text frame
pub fn decode(text: &str) -> Result<DecodedQuote, DecodeError> {
    let envelope: StreamEnvelope =
        serde_json::from_str(text).map_err(|_| DecodeError::Unrecognized)?;

    if !envelope.stream.contains(BOOK_TICKER_MARKER) {
        return Err(DecodeError::Unrecognized);
    }

    let data: BookTickerData = serde_json::from_value(envelope.data)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    Ok(DecodedQuote {
        bid: parse_field("b", &data.bid)?,
        ask: parse_field("a", &data.ask)?,
        bid_qty: parse_field("B", &data.bid_qty)?,
        ask_qty: parse_field("A", &data.ask_qty)?,
        symbol: data.symbol,
    })
}

fn parse_field(name: &str, value: &str) -> Result<f64, DecodeError> {
    value
        .parse()
        .map_err(|_| DecodeError::Malformed(format!("field {} is not numeric: {}", name, value)))
}
