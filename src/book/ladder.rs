//! Positional price-level ladder for one side of the book.
//!
//! The ladder is a plain `Vec` indexed by the feed-assigned position. The
//! feed guarantees positions track price rank (bids descending, asks
//! ascending), so the ladder never sorts; position 0 is the best row under a
//! well-formed feed. Range checking lives in the book state, not here.

use serde::{Deserialize, Serialize};

use crate::types::{BookSide, Price, Size};

/// One depth-of-market row: a price and the displayed size at it.
///
/// Also used as the cached best-quote slot, where a `0.0` price is the
/// sentinel for "no levels on this side".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Row price
    pub price: Price,
    /// Displayed size at this price
    pub size: Size,
}

impl PriceLevel {
    /// Create a price level
    pub fn new(price: Price, size: Size) -> Self {
        Self { price, size }
    }

    /// The "no levels" sentinel: zero price, zero size
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            price: 0.0,
            size: Size::ZERO,
        }
    }

    /// Whether this is the sentinel value
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.price == 0.0
    }
}

/// Ordered sequence of price levels, indexed by feed position.
#[derive(Debug, Clone)]
pub(crate) struct Ladder {
    levels: Vec<PriceLevel>,
}

impl Ladder {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            levels: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.levels.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Position-0 row, if any
    pub(crate) fn first(&self) -> Option<PriceLevel> {
        self.levels.first().copied()
    }

    pub(crate) fn get(&self, position: usize) -> Option<&PriceLevel> {
        self.levels.get(position)
    }

    /// Insert at `position`, shifting later rows down. Caller checks range.
    pub(crate) fn insert(&mut self, position: usize, level: PriceLevel) {
        self.levels.insert(position, level);
    }

    /// Replace the row at `position` in place. Caller checks range.
    pub(crate) fn set(&mut self, position: usize, level: PriceLevel) {
        self.levels[position] = level;
    }

    /// Delete the row at `position`, shifting later rows up. Caller checks range.
    pub(crate) fn remove(&mut self, position: usize) -> PriceLevel {
        self.levels.remove(position)
    }

    pub(crate) fn clear(&mut self) {
        self.levels.clear();
    }

    /// Exact-equality membership test against displayed prices
    pub(crate) fn contains_price(&self, price: Price) -> bool {
        self.levels.iter().any(|level| level.price == price)
    }

    /// True extremum by price: highest for bids, lowest for asks. Ties
    /// resolve to the earliest position.
    ///
    /// Only used by the strict best-quote policy; the permissive path trusts
    /// position 0.
    pub(crate) fn extremum(&self, side: BookSide) -> Option<PriceLevel> {
        let mut best: Option<PriceLevel> = None;
        for level in &self.levels {
            let better = match best {
                None => true,
                Some(current) => match side {
                    BookSide::Bid => level.price > current.price,
                    BookSide::Ask => level.price < current.price,
                },
            };
            if better {
                best = Some(*level);
            }
        }
        best
    }

    pub(crate) fn levels(&self) -> &[PriceLevel] {
        &self.levels
    }

    /// Prices in position order, as an owned vector (for defensive copies)
    pub(crate) fn price_vec(&self) -> Vec<Price> {
        self.levels.iter().map(|level| level.price).collect()
    }

    /// Sizes in position order, parallel to [`Ladder::price_vec`]
    pub(crate) fn size_vec(&self) -> Vec<Size> {
        self.levels.iter().map(|level| level.size).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(price: Price, size: i64) -> PriceLevel {
        PriceLevel::new(price, Size::from(size))
    }

    #[test]
    fn test_sentinel() {
        assert!(PriceLevel::sentinel().is_sentinel());
        assert!(!level(100.0, 1).is_sentinel());
    }

    #[test]
    fn test_insert_shifts_down() {
        let mut ladder = Ladder::with_capacity(4);
        ladder.insert(0, level(100.0, 5));
        ladder.insert(0, level(101.0, 2));
        ladder.insert(2, level(99.0, 1));

        assert_eq!(ladder.len(), 3);
        assert_eq!(ladder.get(0), Some(&level(101.0, 2)));
        assert_eq!(ladder.get(1), Some(&level(100.0, 5)));
        assert_eq!(ladder.get(2), Some(&level(99.0, 1)));
    }

    #[test]
    fn test_remove_shifts_up() {
        let mut ladder = Ladder::with_capacity(4);
        ladder.insert(0, level(101.0, 2));
        ladder.insert(1, level(100.0, 5));
        ladder.insert(2, level(99.0, 1));

        let removed = ladder.remove(1);
        assert_eq!(removed, level(100.0, 5));
        assert_eq!(ladder.len(), 2);
        assert_eq!(ladder.get(1), Some(&level(99.0, 1)));
    }

    #[test]
    fn test_contains_price_is_exact() {
        let mut ladder = Ladder::with_capacity(2);
        ladder.insert(0, level(100.25, 5));
        assert!(ladder.contains_price(100.25));
        assert!(!ladder.contains_price(100.250001));
    }

    #[test]
    fn test_extremum_per_side() {
        let mut ladder = Ladder::with_capacity(4);
        // deliberately misordered, as an out-of-order feed might leave it
        ladder.insert(0, level(100.0, 1));
        ladder.insert(1, level(102.0, 2));
        ladder.insert(2, level(101.0, 3));

        assert_eq!(ladder.extremum(BookSide::Bid), Some(level(102.0, 2)));
        assert_eq!(ladder.extremum(BookSide::Ask), Some(level(100.0, 1)));
        assert_eq!(Ladder::with_capacity(0).extremum(BookSide::Bid), None);
    }

    #[test]
    fn test_extremum_ties_take_earliest_position() {
        let mut ladder = Ladder::with_capacity(2);
        ladder.insert(0, level(100.0, 5));
        ladder.insert(1, level(100.0, 9));

        assert_eq!(ladder.extremum(BookSide::Bid), Some(level(100.0, 5)));
        assert_eq!(ladder.extremum(BookSide::Ask), Some(level(100.0, 5)));
    }

    #[test]
    fn test_parallel_vectors() {
        let mut ladder = Ladder::with_capacity(2);
        ladder.insert(0, PriceLevel::new(100.0, dec!(1.5)));
        ladder.insert(1, PriceLevel::new(99.5, dec!(2.25)));

        assert_eq!(ladder.price_vec(), vec![100.0, 99.5]);
        assert_eq!(ladder.size_vec(), vec![dec!(1.5), dec!(2.25)]);
    }
}
