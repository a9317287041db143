//! Executed-trade ("tape") records.
//!
//! The tape is a stream independent of the depth ladder: each record carries
//! the executed price and size plus a side classification telling which side
//! of the book the aggressor hit. The book accumulates these into per-side
//! traded-volume maps; records are consumed once and not retained.

use serde::{Deserialize, Serialize};

use super::{Price, Size, TimestampMs};

/// Aggressor classification of a tape print.
///
/// Classification comes from the feed (uptick/downtick colouring or an
/// explicit side). A print the feed could not classify is [`TapeSide::Neutral`]
/// and is dropped from attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapeSide {
    /// Aggressor lifted the offer; volume attributes to the ask side.
    AggressorAsk,
    /// Aggressor hit the bid; volume attributes to the bid side.
    AggressorBid,
    /// Unclassified print (e.g. mid-spread); not attributed.
    Neutral,
}

/// Venue tick type of a tape print (0 = "Last", 1 = "AllLast").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickType {
    /// Regular last-trade ticks
    Last,
    /// All trades, including combos and odd lots
    AllLast,
}

impl TickType {
    /// Decode the venue's tick-type code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(TickType::Last),
            1 => Some(TickType::AllLast),
            _ => None,
        }
    }
}

/// One executed trade from the tape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapeRecord {
    /// Executed price
    pub price: Price,
    /// Executed size
    pub size: Size,
    /// Aggressor classification
    pub side: TapeSide,
    /// Venue timestamp of the print
    pub timestamp_ms: TimestampMs,
    /// Venue tick type
    pub tick_type: TickType,
}

impl TapeRecord {
    /// Create a tape record
    pub fn new(
        price: Price,
        size: Size,
        side: TapeSide,
        timestamp_ms: TimestampMs,
        tick_type: TickType,
    ) -> Self {
        Self {
            price,
            size,
            side,
            timestamp_ms,
            tick_type,
        }
    }
}
