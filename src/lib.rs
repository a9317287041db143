//! # depthbook
//!
//! An in-memory depth-of-market order book maintained from a positional
//! insert/update/delete feed, with executed-trade ("tape") attribution,
//! immutable snapshots and synchronous subscriber notifications.
//!
//! ## What it does
//!
//! - **Positional ladders** - one ordered `(price, size)` ladder per side,
//!   indexed by the feed-assigned row position (0 = best)
//! - **Best-quote cache** - best bid/ask kept consistent on every mutation,
//!   with a configurable promotion policy for out-of-order feeds
//! - **Tape attribution** - cumulative traded volume per displayed price,
//!   split by aggressor side and pruned at snapshot time
//! - **Snapshots** - fully-copied, never-aliasing point-in-time views
//! - **Notifications** - best-quote-changed and full-state events delivered
//!   synchronously, in order, inside the book's exclusion region
//!
//! ## Quick start
//!
//! ```rust
//! use depthbook::{BookManager, BookSide, DepthUpdate, TapeRecord, TapeSide, TickType};
//! use rust_decimal::Decimal;
//!
//! let manager = BookManager::new();
//! let book = manager.add_instrument("ESZ6");
//!
//! // Feed thread: positional depth updates
//! book.insert_bid(0, 4500.25, Decimal::from(10))?;
//! book.insert_ask(0, 4500.50, Decimal::from(7))?;
//!
//! // Trade thread: tape prints
//! book.attribute_trade(&TapeRecord::new(
//!     4500.50,
//!     Decimal::from(2),
//!     TapeSide::AggressorAsk,
//!     1_700_000_000_000,
//!     TickType::Last,
//! ));
//!
//! // Reader thread: consistent snapshot
//! let snapshot = book.snapshot(1_700_000_000_500);
//! assert_eq!(snapshot.traded_ask_volume(4500.50), Some(Decimal::from(2)));
//! # Ok::<(), depthbook::Error>(())
//! ```
//!
//! ## Concurrency model
//!
//! The book is a passive shared object. Every operation - mutation, tape
//! attribution, snapshot and queries - runs under one per-book
//! `parking_lot::Mutex`, held through notification dispatch. Nothing blocks
//! or performs I/O under the lock. Listener callbacks run on the mutating
//! thread and must return quickly.
//!
//! ## What it deliberately does not do
//!
//! No wire-protocol parsing, no venue connection or reconnection logic, no
//! historical storage. The feed adapter hands the book decoded
//! [`DepthUpdate`] and [`TapeRecord`] values; bar builders read back via
//! [`QuoteBar`] and snapshots.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod book;
pub mod config;
pub mod error;
pub mod types;

// Re-export main types at crate root for convenience
pub use book::{BookListener, BookManager, BookSnapshot, ListenerId, OrderBook, PriceLevel};
pub use config::{BestQuotePolicy, BookConfig};
pub use error::Error;
pub use types::{
    BestQuoteEvent, BookSide, BookStateEvent, DepthOperation, DepthUpdate, Price, QuoteBar, Size,
    TapeRecord, TapeSide, TickType, TimestampMs, TradedVolumeMap,
};

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
