//! Immutable point-in-time book snapshots.

use ordered_float::OrderedFloat;

use crate::types::{Price, Size, TimestampMs, TradedVolumeMap};

use super::ladder::PriceLevel;

/// A fully-copied view of one book at a single instant.
///
/// Snapshots own every field: the traded-volume maps are pruned copies and
/// the ladders are independent vectors, so later mutations of the live book
/// are never observable here. Safe to hand to other threads or consume late.
#[derive(Debug, Clone)]
pub struct BookSnapshot {
    instrument: String,
    timestamp_ms: TimestampMs,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    traded_bid: TradedVolumeMap,
    traded_ask: TradedVolumeMap,
}

impl BookSnapshot {
    pub(crate) fn new(
        instrument: String,
        timestamp_ms: TimestampMs,
        bids: Vec<PriceLevel>,
        asks: Vec<PriceLevel>,
        traded_bid: TradedVolumeMap,
        traded_ask: TradedVolumeMap,
    ) -> Self {
        Self {
            instrument,
            timestamp_ms,
            bids,
            asks,
            traded_bid,
            traded_ask,
        }
    }

    /// Instrument this snapshot was taken from
    #[must_use]
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Timestamp supplied by the caller at capture time
    #[must_use]
    pub fn timestamp_ms(&self) -> TimestampMs {
        self.timestamp_ms
    }

    /// Bid rows in position order
    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Ask rows in position order
    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Number of rows per side as `(bids, asks)`
    #[must_use]
    pub fn depth(&self) -> (usize, usize) {
        (self.bids.len(), self.asks.len())
    }

    /// Position-0 rows per side, sentinel where a side was empty
    #[must_use]
    pub fn best_levels(&self) -> (PriceLevel, PriceLevel) {
        let bid = self.bids.first().copied().unwrap_or_else(PriceLevel::sentinel);
        let ask = self.asks.first().copied().unwrap_or_else(PriceLevel::sentinel);
        (bid, ask)
    }

    /// Cumulative traded size attributed to the bid side at `price`
    #[must_use]
    pub fn traded_bid_volume(&self, price: Price) -> Option<Size> {
        self.traded_bid.get(&OrderedFloat(price)).copied()
    }

    /// Cumulative traded size attributed to the ask side at `price`
    #[must_use]
    pub fn traded_ask_volume(&self, price: Price) -> Option<Size> {
        self.traded_ask.get(&OrderedFloat(price)).copied()
    }

    /// The pruned bid-side traded-volume map
    #[must_use]
    pub fn traded_bid(&self) -> &TradedVolumeMap {
        &self.traded_bid
    }

    /// The pruned ask-side traded-volume map
    #[must_use]
    pub fn traded_ask(&self) -> &TradedVolumeMap {
        &self.traded_ask
    }
}
