//! Error types for the depthbook crate.
//!
//! The core performs no I/O, so every failure is a local precondition
//! violation. A rejected mutation leaves the book in its last valid state.
//! Out-of-range deletes and neutral tape prints are deliberately *not*
//! errors; they are tolerated no-ops (duplicate/late feed messages).

use thiserror::Error;

use crate::types::BookSide;

/// The main error type for this crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Insert or update targeted a position outside the ladder.
    ///
    /// Inserts allow `position <= depth`, updates require `position < depth`.
    /// The offending mutation was not applied.
    #[error("{side} position {position} out of range (ladder depth {depth})")]
    PositionOutOfRange {
        /// Side whose ladder was targeted
        side: BookSide,
        /// Requested position
        position: usize,
        /// Ladder depth at the time of the call
        depth: usize,
    },
}
