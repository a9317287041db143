//! Top-of-book summary record for downstream aggregation.
//!
//! [`QuoteBar`] is the data shape handed to bar-building consumers (e.g. a
//! periodic OHLC-style aggregator). It is built read-only from a live book or
//! a snapshot and shares no state with either.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::book::{BookSnapshot, OrderBook};

use super::{Price, Size, TimestampMs};

/// Point-in-time best bid/ask record.
///
/// Sentinel prices (`0.0`) pass through unchanged when a side is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBar {
    /// Instrument identifier
    pub instrument: String,
    /// Time the record was taken
    pub timestamp_ms: TimestampMs,
    /// Best bid price
    pub bid_price: Price,
    /// Best bid size
    pub bid_size: Size,
    /// Best ask price
    pub ask_price: Price,
    /// Best ask size
    pub ask_size: Size,
}

impl QuoteBar {
    /// Capture the current top of book from a live book.
    ///
    /// Both sides are read under a single lock acquisition, so the pair is
    /// internally consistent.
    #[must_use]
    pub fn from_book(book: &OrderBook, timestamp_ms: TimestampMs) -> Self {
        let (bid, ask) = book.best_levels();
        Self {
            instrument: book.instrument().to_string(),
            timestamp_ms,
            bid_price: bid.price,
            bid_size: bid.size,
            ask_price: ask.price,
            ask_size: ask.size,
        }
    }

    /// Build the record from an already-taken snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &BookSnapshot) -> Self {
        let (bid, ask) = snapshot.best_levels();
        Self {
            instrument: snapshot.instrument().to_string(),
            timestamp_ms: snapshot.timestamp_ms(),
            bid_price: bid.price,
            bid_size: bid.size,
            ask_price: ask.price,
            ask_size: ask.size,
        }
    }

    /// Best bid and ask prices as a pair
    #[must_use]
    pub fn top_of_book(&self) -> (Price, Price) {
        (self.bid_price, self.ask_price)
    }

    /// Midpoint of bid and ask, or `None` while either side is empty
    #[must_use]
    pub fn mid_price(&self) -> Option<Price> {
        if self.bid_price == 0.0 || self.ask_price == 0.0 {
            return None;
        }
        Some((self.bid_price + self.ask_price) / 2.0)
    }
}

impl fmt::Display for QuoteBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: BidPrice: {} BidSize: {} ;; AskPrice: {} AskSize: {}",
            self.instrument, self.bid_price, self.bid_size, self.ask_price, self.ask_size
        )
    }
}
