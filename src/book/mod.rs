//! Depth-of-market book maintenance.
//!
//! This module is the core of the crate:
//!
//! - [`OrderBook`] - one instrument's live book: positional ladders, cached
//!   best bid/ask, traded-volume maps, snapshotting and subscriber
//!   notifications, all serialized on a single internal mutex
//! - [`BookManager`] - registry of books keyed by instrument
//! - [`BookSnapshot`] - immutable, fully-copied point-in-time view
//! - [`PriceLevel`] - one depth row, also the best-quote cache slot
//!
//! # Example
//!
//! ```rust
//! use depthbook::{BookSide, DepthUpdate, OrderBook};
//! use rust_decimal::Decimal;
//!
//! let book = OrderBook::new("ESZ6");
//! book.apply_depth(&DepthUpdate::insert(BookSide::Bid, 0, 4500.25, Decimal::from(10)))?;
//!
//! let (bid, ask) = book.top_of_book();
//! assert_eq!(bid, 4500.25);
//! assert_eq!(ask, 0.0); // ask side still empty
//! # Ok::<(), depthbook::Error>(())
//! ```

#[allow(clippy::module_inception)]
mod book;
mod core;
mod ladder;
mod manager;
mod snapshot;

pub use book::{BookListener, ListenerId, OrderBook};
pub use ladder::PriceLevel;
pub use manager::BookManager;
pub use snapshot::BookSnapshot;
