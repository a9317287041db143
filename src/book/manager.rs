//! Per-instrument book registry.
//!
//! [`BookManager`] owns one [`OrderBook`] per tracked instrument and routes
//! decoded feed messages and tape prints to the right book. Books are
//! created when an instrument subscription starts and dropped when it ends.
//!
//! # Design
//!
//! The registry itself sits behind a `parking_lot::RwLock` so concurrent
//! routing threads share read access; each book carries its own mutex, so
//! the registry lock is never held across a book operation's notification
//! dispatch - routing methods clone the `Arc` and release the map first.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::BookConfig;
use crate::types::{DepthUpdate, Price, TapeRecord, TimestampMs};
use crate::Result;

use super::snapshot::BookSnapshot;
use super::OrderBook;

/// Thread-safe container of order books keyed by instrument.
///
/// Safe to share as `Arc<BookManager>` between a feed-dispatch thread, a
/// trade-dispatch thread and snapshot readers.
///
/// # Example
///
/// ```rust
/// use depthbook::BookManager;
/// use rust_decimal::Decimal;
///
/// let manager = BookManager::new();
/// manager.add_instrument("ESZ6");
///
/// if let Some(book) = manager.book("ESZ6") {
///     book.insert_bid(0, 4500.25, Decimal::from(10)).unwrap();
/// }
/// assert_eq!(manager.top_of_book("ESZ6"), Some((4500.25, 0.0)));
/// ```
#[derive(Debug, Default)]
pub struct BookManager {
    config: BookConfig,
    books: RwLock<HashMap<String, Arc<OrderBook>>>,
}

impl BookManager {
    /// Create an empty manager with default book configuration
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    /// Create an empty manager; every book it creates uses `config`
    pub fn with_config(config: BookConfig) -> Self {
        Self {
            config,
            books: RwLock::new(HashMap::new()),
        }
    }

    /// Start tracking an instrument, creating its empty book.
    ///
    /// Returns the book (existing one if already tracked, so duplicate
    /// subscription requests are harmless).
    pub fn add_instrument(&self, instrument: impl Into<String>) -> Arc<OrderBook> {
        let instrument = instrument.into();
        let mut books = self.books.write();
        books
            .entry(instrument.clone())
            .or_insert_with(|| Arc::new(OrderBook::with_config(instrument, self.config)))
            .clone()
    }

    /// Stop tracking an instrument, dropping its book.
    ///
    /// Returns the removed book so in-flight holders can finish with it.
    pub fn remove_instrument(&self, instrument: &str) -> Option<Arc<OrderBook>> {
        self.books.write().remove(instrument)
    }

    /// Get the live book for an instrument
    pub fn book(&self, instrument: &str) -> Option<Arc<OrderBook>> {
        self.books.read().get(instrument).cloned()
    }

    /// Whether an instrument is currently tracked
    pub fn contains(&self, instrument: &str) -> bool {
        self.books.read().contains_key(instrument)
    }

    /// Route a decoded depth message to its instrument's book.
    ///
    /// Returns `Ok(false)` when the instrument is not tracked (the feed can
    /// deliver a few messages after an unsubscribe).
    ///
    /// # Errors
    ///
    /// Propagates out-of-range insert/update rejections from the book.
    pub fn apply_depth(&self, instrument: &str, update: &DepthUpdate) -> Result<bool> {
        match self.book(instrument) {
            Some(book) => {
                book.apply_depth(update)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Route a tape print to its instrument's book.
    ///
    /// Returns `false` when the instrument is not tracked.
    pub fn attribute_trade(&self, instrument: &str, record: &TapeRecord) -> bool {
        match self.book(instrument) {
            Some(book) => {
                book.attribute_trade(record);
                true
            }
            None => false,
        }
    }

    /// Take a pruned snapshot of an instrument's book
    pub fn snapshot(&self, instrument: &str, timestamp_ms: TimestampMs) -> Option<BookSnapshot> {
        self.book(instrument).map(|book| book.snapshot(timestamp_ms))
    }

    /// Best bid and ask prices for an instrument, sentinels when empty
    pub fn top_of_book(&self, instrument: &str) -> Option<(Price, Price)> {
        self.book(instrument).map(|book| book.top_of_book())
    }

    /// Reset an instrument's book to empty without dropping it.
    ///
    /// Returns `false` when the instrument is not tracked.
    pub fn clear(&self, instrument: &str) -> bool {
        match self.book(instrument) {
            Some(book) => {
                book.clear();
                true
            }
            None => false,
        }
    }

    /// Number of tracked instruments
    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    /// Whether no instruments are tracked
    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }

    /// All tracked instrument identifiers
    pub fn instruments(&self) -> Vec<String> {
        self.books.read().keys().cloned().collect()
    }
}
