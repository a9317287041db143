//! Feed-boundary depth messages.
//!
//! The feed adapter decodes venue wire messages into [`DepthUpdate`] values:
//! one positional insert/update/delete per depth-of-market row. The book
//! consumes these without further validation beyond position range checks.
//!
//! # Ordering precondition
//!
//! The feed assigns positions consistent with price ranking for each side
//! (bids descending, asks ascending) and position 0 is the best-priced row.
//! The book trusts this and never re-sorts; a feed that violates it produces
//! a misordered ladder, not an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Price, Size};

/// Side of the book a depth row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    /// Buy side; best price is the highest.
    Bid,
    /// Sell side; best price is the lowest.
    Ask,
}

impl BookSide {
    /// Get the opposite side
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            BookSide::Bid => BookSide::Ask,
            BookSide::Ask => BookSide::Bid,
        }
    }

    /// Decode the venue's market-depth side code (0 = ask, 1 = bid).
    #[must_use]
    pub fn from_depth_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(BookSide::Ask),
            1 => Some(BookSide::Bid),
            _ => None,
        }
    }
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSide::Bid => write!(f, "bid"),
            BookSide::Ask => write!(f, "ask"),
        }
    }
}

/// Operation carried by a depth message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthOperation {
    /// Insert a new row at the given position, shifting rows below it down.
    Insert,
    /// Replace price and size of the row at the given position.
    Update,
    /// Delete the row at the given position, shifting rows below it up.
    Delete,
}

impl DepthOperation {
    /// Decode the venue's operation code (0 = insert, 1 = update, 2 = delete).
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(DepthOperation::Insert),
            1 => Some(DepthOperation::Update),
            2 => Some(DepthOperation::Delete),
            _ => None,
        }
    }
}

/// A single decoded depth-of-market message.
///
/// `price` and `size` are ignored for [`DepthOperation::Delete`]; the feed
/// sends zeros there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthUpdate {
    /// Which side's ladder to mutate
    pub side: BookSide,
    /// What to do at `position`
    pub operation: DepthOperation,
    /// Zero-based row index assigned by the feed
    pub position: usize,
    /// Row price (unused for deletes)
    pub price: Price,
    /// Row size (unused for deletes)
    pub size: Size,
}

impl DepthUpdate {
    /// Build an insert message
    pub fn insert(side: BookSide, position: usize, price: Price, size: Size) -> Self {
        Self {
            side,
            operation: DepthOperation::Insert,
            position,
            price,
            size,
        }
    }

    /// Build an update message
    pub fn update(side: BookSide, position: usize, price: Price, size: Size) -> Self {
        Self {
            side,
            operation: DepthOperation::Update,
            position,
            price,
            size,
        }
    }

    /// Build a delete message
    pub fn delete(side: BookSide, position: usize) -> Self {
        Self {
            side,
            operation: DepthOperation::Delete,
            position,
            price: 0.0,
            size: Size::ZERO,
        }
    }
}
