//! Core types shared across the crate.
//!
//! - [`depth`] - Feed-boundary depth messages (positional insert/update/delete)
//! - [`tape`] - Executed-trade ("tape") records and their classification
//! - [`events`] - Events delivered to book subscribers
//! - [`bar`] - Downstream top-of-book summary record

pub mod bar;
pub mod depth;
pub mod events;
pub mod tape;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

pub use bar::QuoteBar;
pub use depth::{BookSide, DepthOperation, DepthUpdate};
pub use events::{BestQuoteEvent, BookStateEvent};
pub use tape::{TapeRecord, TapeSide, TickType};

/// Price of a depth row, as assigned by the upstream feed.
///
/// Prices arrive as floating point and are never re-derived locally, so they
/// are kept as `f64`. `0.0` doubles as the "no best price" sentinel.
pub type Price = f64;

/// Displayed or executed size at a price level.
///
/// Sizes use `rust_decimal::Decimal` for exact fixed-precision accumulation
/// (tape volumes are summed, so binary floats would drift).
pub type Size = rust_decimal::Decimal;

/// Timestamp in milliseconds since the Unix epoch.
pub type TimestampMs = i64;

/// Map from price to cumulative traded size on one side of the book.
///
/// Keys are wrapped in [`OrderedFloat`] because raw `f64` is not `Eq + Hash`;
/// lookups always use the exact bit pattern the feed delivered, so the
/// wrapper changes nothing observable.
pub type TradedVolumeMap = FxHashMap<OrderedFloat<Price>, Size>;
