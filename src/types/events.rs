//! Events delivered to book subscribers.
//!
//! Both events are defensive copies: they own their data and are safe to
//! retain or move to another thread after the listener callback returns.
//! Delivery itself is synchronous and happens inside the book's exclusion
//! region, so listeners must not block.

use serde::{Deserialize, Serialize};

use super::{Price, Size};

/// Fired when the cached best bid or best ask changes.
///
/// A `0.0` price with zero size means that side has no levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestQuoteEvent {
    /// Instrument identifier of the book
    pub instrument: String,
    /// Best bid price (0.0 sentinel when empty)
    pub bid_price: Price,
    /// Best bid size
    pub bid_size: Size,
    /// Best ask price (0.0 sentinel when empty)
    pub ask_price: Price,
    /// Best ask size
    pub ask_size: Size,
}

/// Fired after every successful ladder mutation with the full book state.
///
/// Subscribers that only care about top-of-book should listen for
/// [`BestQuoteEvent`] instead; this event fires whether or not best moved.
/// Prices and sizes are parallel vectors in ladder position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookStateEvent {
    /// Instrument identifier of the book
    pub instrument: String,
    /// Bid prices in position order (best first under a well-formed feed)
    pub bid_prices: Vec<Price>,
    /// Bid sizes parallel to `bid_prices`
    pub bid_sizes: Vec<Size>,
    /// Ask prices in position order
    pub ask_prices: Vec<Price>,
    /// Ask sizes parallel to `ask_prices`
    pub ask_sizes: Vec<Size>,
}

impl BookStateEvent {
    /// Number of bid rows carried by this event
    #[must_use]
    pub fn bid_depth(&self) -> usize {
        self.bid_prices.len()
    }

    /// Number of ask rows carried by this event
    #[must_use]
    pub fn ask_depth(&self) -> usize {
        self.ask_prices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_accessors() {
        let event = BookStateEvent {
            instrument: "ES".to_string(),
            bid_prices: vec![100.0, 99.5],
            bid_sizes: vec![Size::from(5), Size::from(2)],
            ask_prices: vec![100.5],
            ask_sizes: vec![Size::from(1)],
        };
        assert_eq!(event.bid_depth(), 2);
        assert_eq!(event.ask_depth(), 1);
    }
}
