//! Unsynchronized book state and mutation logic.
//!
//! [`BookState`] owns both ladders, the best-quote cache and the per-side
//! traded-volume maps, and implements the full mutation/attribution/pruning
//! contract. It is not thread-safe on its own; [`OrderBook`](super::OrderBook)
//! wraps it in a mutex and layers notification dispatch on top.

use ordered_float::OrderedFloat;

use crate::config::{BestQuotePolicy, BookConfig};
use crate::error::Error;
use crate::types::{BookSide, Price, Size, TapeRecord, TapeSide, TradedVolumeMap};
use crate::Result;

use super::ladder::{Ladder, PriceLevel};

/// The mutable state of one order book.
///
/// All operations uphold the post-mutation invariant: a non-empty ladder has
/// its position-0 row cached as best; an empty ladder has the sentinel.
/// Rejected mutations change nothing.
#[derive(Debug)]
pub(crate) struct BookState {
    policy: BestQuotePolicy,
    bids: Ladder,
    asks: Ladder,
    best_bid: PriceLevel,
    best_ask: PriceLevel,
    traded_bid: TradedVolumeMap,
    traded_ask: TradedVolumeMap,
}

impl BookState {
    pub(crate) fn new(config: &BookConfig) -> Self {
        let capacity = config.depth_capacity();
        let mut traded_bid = TradedVolumeMap::default();
        let mut traded_ask = TradedVolumeMap::default();
        traded_bid.reserve(capacity);
        traded_ask.reserve(capacity);
        Self {
            policy: config.best_quote_policy(),
            bids: Ladder::with_capacity(capacity),
            asks: Ladder::with_capacity(capacity),
            best_bid: PriceLevel::sentinel(),
            best_ask: PriceLevel::sentinel(),
            traded_bid,
            traded_ask,
        }
    }

    pub(crate) fn ladder(&self, side: BookSide) -> &Ladder {
        match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: BookSide) -> &mut Ladder {
        match side {
            BookSide::Bid => &mut self.bids,
            BookSide::Ask => &mut self.asks,
        }
    }

    pub(crate) fn best(&self, side: BookSide) -> PriceLevel {
        match side {
            BookSide::Bid => self.best_bid,
            BookSide::Ask => self.best_ask,
        }
    }

    fn best_mut(&mut self, side: BookSide) -> &mut PriceLevel {
        match side {
            BookSide::Bid => &mut self.best_bid,
            BookSide::Ask => &mut self.best_ask,
        }
    }

    pub(crate) fn traded(&self, side: BookSide) -> &TradedVolumeMap {
        match side {
            BookSide::Bid => &self.traded_bid,
            BookSide::Ask => &self.traded_ask,
        }
    }

    fn traded_mut(&mut self, side: BookSide) -> &mut TradedVolumeMap {
        match side {
            BookSide::Bid => &mut self.traded_bid,
            BookSide::Ask => &mut self.traded_ask,
        }
    }

    /// Whether `candidate` ties or beats `best` in the side's direction
    fn at_least_as_good(side: BookSide, candidate: Price, best: Price) -> bool {
        match side {
            BookSide::Bid => candidate >= best,
            BookSide::Ask => candidate <= best,
        }
    }

    /// Insert a row at `position`, shifting later rows down.
    ///
    /// Returns whether the cached best quote changed (a best-quote event is
    /// due). The caller owes a book-state event on every `Ok`.
    pub(crate) fn insert(
        &mut self,
        side: BookSide,
        position: usize,
        price: Price,
        size: Size,
    ) -> Result<bool> {
        let depth = self.ladder(side).len();
        if position > depth {
            return Err(Error::PositionOutOfRange {
                side,
                position,
                depth,
            });
        }
        self.ladder_mut(side)
            .insert(position, PriceLevel::new(price, size));
        Ok(self.reevaluate_best(side, position, price, size))
    }

    /// Replace the row at `position` in place.
    ///
    /// Same return/notification contract as [`BookState::insert`].
    pub(crate) fn update(
        &mut self,
        side: BookSide,
        position: usize,
        price: Price,
        size: Size,
    ) -> Result<bool> {
        let depth = self.ladder(side).len();
        if position >= depth {
            return Err(Error::PositionOutOfRange {
                side,
                position,
                depth,
            });
        }
        self.ladder_mut(side).set(position, PriceLevel::new(price, size));
        Ok(self.reevaluate_best(side, position, price, size))
    }

    /// Delete the row at `position`, shifting later rows up.
    ///
    /// Out-of-range positions are a tolerated no-op (`None`): late or
    /// duplicate feed deletes must not fault or notify. On a real removal the
    /// exact removed price is evicted from the side's traded-volume map, and
    /// if it matched the cached best, best is recomputed from the new
    /// position 0 (sentinel when the ladder emptied). `Some(best_changed)`
    /// tells the caller which events to fire.
    pub(crate) fn remove(&mut self, side: BookSide, position: usize) -> Option<bool> {
        if position >= self.ladder(side).len() {
            return None;
        }
        let removed = self.ladder_mut(side).remove(position);
        self.traded_mut(side).remove(&OrderedFloat(removed.price));

        let mut best_changed = false;
        if removed.price == self.best(side).price {
            let new_best = self
                .ladder(side)
                .first()
                .unwrap_or_else(PriceLevel::sentinel);
            *self.best_mut(side) = new_best;
            best_changed = true;
        }
        Some(best_changed)
    }

    /// Re-derive the cached best after an insert/update at `position`.
    ///
    /// Under [`BestQuotePolicy::Permissive`] this reproduces the legacy feed
    /// semantics: promote when there was no best, when the mutation hit
    /// position 0, or when the incoming price ties or beats the cached best
    /// at any position. The promotion itself counts as a change even when the
    /// values happen to be equal, so observable event sequences match the
    /// legacy behavior.
    ///
    /// Under [`BestQuotePolicy::StrictTopOnly`] only position 0 is trusted;
    /// mutations below the top trigger a rescan for the true extremum, and a
    /// best-quote event fires only on an actual value change.
    fn reevaluate_best(
        &mut self,
        side: BookSide,
        position: usize,
        price: Price,
        size: Size,
    ) -> bool {
        match self.policy {
            BestQuotePolicy::Permissive => {
                let best = self.best(side);
                let promote = best.is_sentinel()
                    || position == 0
                    || Self::at_least_as_good(side, price, best.price);
                if promote {
                    *self.best_mut(side) = PriceLevel::new(price, size);
                }
                promote
            }
            BestQuotePolicy::StrictTopOnly => {
                let new_best = if position == 0 {
                    self.ladder(side).first()
                } else {
                    self.ladder(side).extremum(side)
                }
                .unwrap_or_else(PriceLevel::sentinel);
                let changed = new_best != self.best(side);
                if changed {
                    *self.best_mut(side) = new_best;
                }
                changed
            }
        }
    }

    /// Accumulate a tape print into the side implied by its classification.
    ///
    /// Neutral prints are dropped. Touches neither ladder nor best quote.
    pub(crate) fn attribute(&mut self, record: &TapeRecord) {
        let map = match record.side {
            TapeSide::AggressorAsk => &mut self.traded_ask,
            TapeSide::AggressorBid => &mut self.traded_bid,
            TapeSide::Neutral => return,
        };
        *map.entry(OrderedFloat(record.price)).or_insert(Size::ZERO) += record.size;
    }

    /// Drop traded-volume entries whose price is no longer displayed.
    ///
    /// Runs on every snapshot; doubles as garbage collection of attribution
    /// left behind by feed anomalies.
    pub(crate) fn prune_traded(&mut self) {
        let bids = &self.bids;
        self.traded_bid
            .retain(|price, _| bids.contains_price(price.into_inner()));
        let asks = &self.asks;
        self.traded_ask
            .retain(|price, _| asks.contains_price(price.into_inner()));
    }

    /// Reset ladders, best quotes and traded volume to empty/sentinel.
    pub(crate) fn clear(&mut self) {
        self.best_bid = PriceLevel::sentinel();
        self.best_ask = PriceLevel::sentinel();
        self.traded_bid.clear();
        self.traded_ask.clear();
        self.bids.clear();
        self.asks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::types::TickType;

    fn state() -> BookState {
        BookState::new(&BookConfig::new())
    }

    fn strict_state() -> BookState {
        BookState::new(&BookConfig::new().with_best_quote_policy(BestQuotePolicy::StrictTopOnly))
    }

    fn trade(price: Price, size: i64, side: TapeSide) -> TapeRecord {
        TapeRecord::new(price, Size::from(size), side, 0, TickType::Last)
    }

    #[test]
    fn test_first_insert_sets_best() {
        let mut book = state();
        let best_changed = book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        assert!(best_changed);
        assert_eq!(book.best(BookSide::Bid), PriceLevel::new(100.0, dec!(5)));
        assert!(book.best(BookSide::Ask).is_sentinel());
    }

    #[test]
    fn test_insert_out_of_range_rejected() {
        let mut book = state();
        let err = book.insert(BookSide::Ask, 1, 100.0, dec!(1)).unwrap_err();
        assert_eq!(
            err,
            Error::PositionOutOfRange {
                side: BookSide::Ask,
                position: 1,
                depth: 0,
            }
        );
        assert!(book.ladder(BookSide::Ask).is_empty());
        assert!(book.best(BookSide::Ask).is_sentinel());
    }

    #[test]
    fn test_update_out_of_range_leaves_state_untouched() {
        let mut book = state();
        book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        book.insert(BookSide::Bid, 1, 99.0, dec!(2)).unwrap();
        book.insert(BookSide::Bid, 2, 98.0, dec!(1)).unwrap();

        let err = book.update(BookSide::Bid, 5, 99.0, dec!(1)).unwrap_err();
        assert!(matches!(err, Error::PositionOutOfRange { position: 5, .. }));
        assert_eq!(book.ladder(BookSide::Bid).len(), 3);
        assert_eq!(book.best(BookSide::Bid), PriceLevel::new(100.0, dec!(5)));
    }

    #[test]
    fn test_position_zero_always_promotes() {
        let mut book = state();
        book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        // worse price at position 0 still wins: the feed said it is the top
        let best_changed = book.update(BookSide::Bid, 0, 99.0, dec!(4)).unwrap();
        assert!(best_changed);
        assert_eq!(book.best(BookSide::Bid), PriceLevel::new(99.0, dec!(4)));
    }

    #[test]
    fn test_permissive_promotes_tying_price_below_top() {
        let mut book = state();
        book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        // the legacy hazard: a tie at position 1 overwrites the cached size
        let best_changed = book.insert(BookSide::Bid, 1, 100.0, dec!(9)).unwrap();
        assert!(best_changed);
        assert_eq!(book.best(BookSide::Bid), PriceLevel::new(100.0, dec!(9)));
    }

    #[test]
    fn test_strict_ignores_tying_price_below_top() {
        let mut book = strict_state();
        book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        let best_changed = book.insert(BookSide::Bid, 1, 100.0, dec!(9)).unwrap();
        assert!(!best_changed);
        assert_eq!(book.best(BookSide::Bid), PriceLevel::new(100.0, dec!(5)));
    }

    #[test]
    fn test_strict_rescans_on_better_price_below_top() {
        let mut book = strict_state();
        book.insert(BookSide::Ask, 0, 101.0, dec!(5)).unwrap();
        // out-of-order feed put a better ask below the top; strict finds it
        let best_changed = book.insert(BookSide::Ask, 1, 100.5, dec!(2)).unwrap();
        assert!(best_changed);
        assert_eq!(book.best(BookSide::Ask), PriceLevel::new(100.5, dec!(2)));
    }

    #[test]
    fn test_ask_direction_reversed() {
        let mut book = state();
        book.insert(BookSide::Ask, 0, 101.0, dec!(5)).unwrap();
        // higher ask below the top is worse, no promotion
        let best_changed = book.insert(BookSide::Ask, 1, 102.0, dec!(2)).unwrap();
        assert!(!best_changed);
        assert_eq!(book.best(BookSide::Ask), PriceLevel::new(101.0, dec!(5)));
    }

    #[test]
    fn test_remove_best_recomputes_from_new_top() {
        let mut book = state();
        book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        book.insert(BookSide::Bid, 0, 101.0, dec!(2)).unwrap();

        let best_changed = book.remove(BookSide::Bid, 0).unwrap();
        assert!(best_changed);
        assert_eq!(book.best(BookSide::Bid), PriceLevel::new(100.0, dec!(5)));
    }

    #[test]
    fn test_remove_last_level_sets_sentinel() {
        let mut book = state();
        book.insert(BookSide::Ask, 0, 101.0, dec!(5)).unwrap();
        let best_changed = book.remove(BookSide::Ask, 0).unwrap();
        assert!(best_changed);
        assert!(book.best(BookSide::Ask).is_sentinel());
        assert!(book.ladder(BookSide::Ask).is_empty());
    }

    #[test]
    fn test_remove_below_best_keeps_best() {
        let mut book = state();
        book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        book.insert(BookSide::Bid, 1, 99.0, dec!(2)).unwrap();

        let best_changed = book.remove(BookSide::Bid, 1).unwrap();
        assert!(!best_changed);
        assert_eq!(book.best(BookSide::Bid), PriceLevel::new(100.0, dec!(5)));
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut book = state();
        book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        book.attribute(&trade(100.0, 3, TapeSide::AggressorBid));

        assert_eq!(book.remove(BookSide::Bid, 7), None);
        assert_eq!(book.ladder(BookSide::Bid).len(), 1);
        assert_eq!(book.best(BookSide::Bid), PriceLevel::new(100.0, dec!(5)));
        assert_eq!(
            book.traded(BookSide::Bid).get(&OrderedFloat(100.0)),
            Some(&dec!(3))
        );
    }

    #[test]
    fn test_remove_evicts_traded_volume_at_exact_price() {
        let mut book = state();
        book.insert(BookSide::Ask, 0, 105.0, dec!(4)).unwrap();
        book.insert(BookSide::Ask, 1, 106.0, dec!(4)).unwrap();
        book.attribute(&trade(105.0, 3, TapeSide::AggressorAsk));
        book.attribute(&trade(106.0, 1, TapeSide::AggressorAsk));

        book.remove(BookSide::Ask, 0).unwrap();
        assert!(!book.traded(BookSide::Ask).contains_key(&OrderedFloat(105.0)));
        assert_eq!(
            book.traded(BookSide::Ask).get(&OrderedFloat(106.0)),
            Some(&dec!(1))
        );
    }

    #[test]
    fn test_attribution_is_additive_and_side_routed() {
        let mut book = state();
        book.attribute(&trade(105.0, 3, TapeSide::AggressorAsk));
        book.attribute(&trade(105.0, 2, TapeSide::AggressorAsk));
        book.attribute(&trade(105.0, 7, TapeSide::AggressorBid));

        assert_eq!(
            book.traded(BookSide::Ask).get(&OrderedFloat(105.0)),
            Some(&dec!(5))
        );
        assert_eq!(
            book.traded(BookSide::Bid).get(&OrderedFloat(105.0)),
            Some(&dec!(7))
        );
    }

    #[test]
    fn test_neutral_trade_dropped() {
        let mut book = state();
        book.attribute(&trade(105.0, 3, TapeSide::Neutral));
        assert!(book.traded(BookSide::Ask).is_empty());
        assert!(book.traded(BookSide::Bid).is_empty());
    }

    #[test]
    fn test_prune_drops_undisplayed_prices() {
        let mut book = state();
        book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        book.attribute(&trade(100.0, 2, TapeSide::AggressorBid));
        book.attribute(&trade(97.5, 4, TapeSide::AggressorBid));

        book.prune_traded();
        assert_eq!(
            book.traded(BookSide::Bid).get(&OrderedFloat(100.0)),
            Some(&dec!(2))
        );
        assert!(!book.traded(BookSide::Bid).contains_key(&OrderedFloat(97.5)));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut book = state();
        book.insert(BookSide::Bid, 0, 100.0, dec!(5)).unwrap();
        book.insert(BookSide::Ask, 0, 101.0, dec!(2)).unwrap();
        book.attribute(&trade(100.0, 2, TapeSide::AggressorBid));

        book.clear();
        assert!(book.ladder(BookSide::Bid).is_empty());
        assert!(book.ladder(BookSide::Ask).is_empty());
        assert!(book.best(BookSide::Bid).is_sentinel());
        assert!(book.best(BookSide::Ask).is_sentinel());
        assert!(book.traded(BookSide::Bid).is_empty());
        assert!(book.traded(BookSide::Ask).is_empty());
    }
}
