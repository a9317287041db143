//! Mutex-serialized order book aggregate with synchronous notifications.
//!
//! [`OrderBook`] wraps the raw [`BookState`] in a single `parking_lot::Mutex`
//! and adds the subscriber registry. Every public operation - mutation, tape
//! attribution, snapshot production and best-quote queries - runs start to
//! finish inside that one exclusion region, including listener dispatch, so
//! readers can never observe a ladder mid-shift and attribution can never
//! race a pruning pass.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::BookConfig;
use crate::types::{
    BestQuoteEvent, BookSide, BookStateEvent, DepthOperation, DepthUpdate, Price, Size,
    TapeRecord, TimestampMs,
};
use crate::Result;

use super::core::BookState;
use super::ladder::PriceLevel;
use super::snapshot::BookSnapshot;

/// Callbacks delivered to book subscribers.
///
/// Both methods default to no-ops so a subscriber implements only what it
/// needs. Callbacks run synchronously on the mutating thread while the
/// book's lock is held: implementations must return quickly, must not block,
/// and must not call back into the same book (the lock is not reentrant).
/// Events are defensive copies and may be retained past the call.
pub trait BookListener: Send + Sync {
    /// Best bid or ask changed
    fn on_best_quote(&self, _event: &BestQuoteEvent) {}

    /// Any ladder mutation completed (fires whether or not best moved)
    fn on_book_state(&self, _event: &BookStateEvent) {}
}

/// Handle identifying a registered listener, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Inner {
    state: BookState,
    listeners: Vec<(ListenerId, Arc<dyn BookListener>)>,
    next_listener_id: u64,
}

/// A live depth-of-market book for a single instrument.
///
/// Holds one positional ladder per side, the cached best bid/ask, and the
/// per-side traded-volume maps fed by the tape. Create one per tracked
/// instrument at subscription start; [`clear`](OrderBook::clear) resets the
/// contents in place, dropping the book ends its life.
///
/// # Thread safety
///
/// Safe to share as `Arc<OrderBook>` across a feed-dispatch thread, a
/// trade-dispatch thread and arbitrary readers; all operations serialize on
/// one internal mutex. Nothing blocks or performs I/O under the lock, so
/// hold times stay short.
///
/// # Example
///
/// ```rust
/// use depthbook::OrderBook;
/// use rust_decimal::Decimal;
///
/// let book = OrderBook::new("ESZ6");
/// book.insert_bid(0, 4500.25, Decimal::from(10)).unwrap();
/// book.insert_ask(0, 4500.50, Decimal::from(7)).unwrap();
/// assert_eq!(book.top_of_book(), (4500.25, 4500.50));
/// ```
pub struct OrderBook {
    instrument: String,
    inner: Mutex<Inner>,
}

impl OrderBook {
    /// Create an empty book with default configuration
    pub fn new(instrument: impl Into<String>) -> Self {
        Self::with_config(instrument, BookConfig::default())
    }

    /// Create an empty book with the given configuration
    pub fn with_config(instrument: impl Into<String>, config: BookConfig) -> Self {
        Self {
            instrument: instrument.into(),
            inner: Mutex::new(Inner {
                state: BookState::new(&config),
                listeners: Vec::new(),
                next_listener_id: 0,
            }),
        }
    }

    /// Instrument identifier of this book
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Register a listener; returns the handle needed to unsubscribe.
    pub fn subscribe(&self, listener: Arc<dyn BookListener>) -> ListenerId {
        let mut inner = self.inner.lock();
        let id = ListenerId(inner.next_listener_id);
        inner.next_listener_id += 1;
        inner.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if the handle was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.listeners.len() != before
    }

    /// Insert a bid row at `position`, shifting later rows down.
    ///
    /// # Errors
    ///
    /// [`Error::PositionOutOfRange`](crate::Error::PositionOutOfRange) when
    /// `position > depth`; the book is left unchanged.
    pub fn insert_bid(&self, position: usize, price: Price, size: Size) -> Result<()> {
        self.insert(BookSide::Bid, position, price, size)
    }

    /// Insert an ask row at `position`, shifting later rows down.
    ///
    /// # Errors
    ///
    /// Same contract as [`OrderBook::insert_bid`].
    pub fn insert_ask(&self, position: usize, price: Price, size: Size) -> Result<()> {
        self.insert(BookSide::Ask, position, price, size)
    }

    /// Replace the bid row at `position` in place.
    ///
    /// # Errors
    ///
    /// [`Error::PositionOutOfRange`](crate::Error::PositionOutOfRange) when
    /// `position >= depth`; the book is left unchanged.
    pub fn update_bid(&self, position: usize, price: Price, size: Size) -> Result<()> {
        self.update(BookSide::Bid, position, price, size)
    }

    /// Replace the ask row at `position` in place.
    ///
    /// # Errors
    ///
    /// Same contract as [`OrderBook::update_bid`].
    pub fn update_ask(&self, position: usize, price: Price, size: Size) -> Result<()> {
        self.update(BookSide::Ask, position, price, size)
    }

    /// Delete the bid row at `position`.
    ///
    /// An out-of-range position is a silent no-op and fires no notification;
    /// late or duplicate feed deletes are expected. Callers must not assume
    /// removal always notifies.
    pub fn remove_bid(&self, position: usize) {
        self.remove(BookSide::Bid, position);
    }

    /// Delete the ask row at `position`. Same no-op contract as
    /// [`OrderBook::remove_bid`].
    pub fn remove_ask(&self, position: usize) {
        self.remove(BookSide::Ask, position);
    }

    /// Route a decoded feed message to the matching mutation.
    ///
    /// # Errors
    ///
    /// Propagates the out-of-range rejection from inserts and updates;
    /// deletes never fail.
    pub fn apply_depth(&self, update: &DepthUpdate) -> Result<()> {
        match update.operation {
            DepthOperation::Insert => {
                self.insert(update.side, update.position, update.price, update.size)
            }
            DepthOperation::Update => {
                self.update(update.side, update.position, update.price, update.size)
            }
            DepthOperation::Delete => {
                self.remove(update.side, update.position);
                Ok(())
            }
        }
    }

    /// Accumulate a tape print into the side implied by its classification.
    ///
    /// Neutral prints are dropped. Independent of the ladder path: no best
    /// re-evaluation, no notification.
    pub fn attribute_trade(&self, record: &TapeRecord) {
        let mut inner = self.inner.lock();
        inner.state.attribute(record);
        trace!(
            instrument = %self.instrument,
            price = record.price,
            size = %record.size,
            side = ?record.side,
            "tape attribution"
        );
    }

    /// Reset ladders, best quotes and traded volume to empty, atomically
    /// with respect to all other operations. Fires no notification.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.state.clear();
        debug!(instrument = %self.instrument, "book cleared");
    }

    /// Produce an immutable point-in-time copy stamped with `timestamp_ms`.
    ///
    /// Prunes both traded-volume maps against the live ladders first, so the
    /// returned maps only hold currently-displayed prices. The copy shares
    /// no storage with the live book.
    pub fn snapshot(&self, timestamp_ms: TimestampMs) -> BookSnapshot {
        let mut inner = self.inner.lock();
        inner.state.prune_traded();
        BookSnapshot::new(
            self.instrument.clone(),
            timestamp_ms,
            inner.state.ladder(BookSide::Bid).levels().to_vec(),
            inner.state.ladder(BookSide::Ask).levels().to_vec(),
            inner.state.traded(BookSide::Bid).clone(),
            inner.state.traded(BookSide::Ask).clone(),
        )
    }

    /// Cached best bid (sentinel when the bid ladder is empty)
    pub fn best_bid(&self) -> PriceLevel {
        self.inner.lock().state.best(BookSide::Bid)
    }

    /// Cached best ask (sentinel when the ask ladder is empty)
    pub fn best_ask(&self) -> PriceLevel {
        self.inner.lock().state.best(BookSide::Ask)
    }

    /// Best bid price, `0.0` when empty
    pub fn best_bid_price(&self) -> Price {
        self.best_bid().price
    }

    /// Best bid size, zero when empty
    pub fn best_bid_size(&self) -> Size {
        self.best_bid().size
    }

    /// Best ask price, `0.0` when empty
    pub fn best_ask_price(&self) -> Price {
        self.best_ask().price
    }

    /// Best ask size, zero when empty
    pub fn best_ask_size(&self) -> Size {
        self.best_ask().size
    }

    /// Both cached best levels under a single lock acquisition
    pub fn best_levels(&self) -> (PriceLevel, PriceLevel) {
        let inner = self.inner.lock();
        (
            inner.state.best(BookSide::Bid),
            inner.state.best(BookSide::Ask),
        )
    }

    /// Best bid and ask prices as a pair, `0.0` sentinels when empty.
    ///
    /// Reads the cached best, never indexes the ladder, so it is total even
    /// on an empty book.
    pub fn top_of_book(&self) -> (Price, Price) {
        let (bid, ask) = self.best_levels();
        (bid.price, ask.price)
    }

    /// Number of rows per side as `(bids, asks)`
    pub fn depth(&self) -> (usize, usize) {
        let inner = self.inner.lock();
        (
            inner.state.ladder(BookSide::Bid).len(),
            inner.state.ladder(BookSide::Ask).len(),
        )
    }

    /// Whether both ladders are empty
    pub fn is_empty(&self) -> bool {
        self.depth() == (0, 0)
    }

    fn insert(&self, side: BookSide, position: usize, price: Price, size: Size) -> Result<()> {
        let mut inner = self.inner.lock();
        match inner.state.insert(side, position, price, size) {
            Ok(best_changed) => {
                debug!(
                    instrument = %self.instrument,
                    %side,
                    position,
                    price,
                    size = %size,
                    best_changed,
                    "depth insert"
                );
                self.notify_mutation(&inner, best_changed);
                Ok(())
            }
            Err(err) => {
                warn!(instrument = %self.instrument, %err, "rejected depth insert");
                Err(err)
            }
        }
    }

    fn update(&self, side: BookSide, position: usize, price: Price, size: Size) -> Result<()> {
        let mut inner = self.inner.lock();
        match inner.state.update(side, position, price, size) {
            Ok(best_changed) => {
                debug!(
                    instrument = %self.instrument,
                    %side,
                    position,
                    price,
                    size = %size,
                    best_changed,
                    "depth update"
                );
                self.notify_mutation(&inner, best_changed);
                Ok(())
            }
            Err(err) => {
                warn!(instrument = %self.instrument, %err, "rejected depth update");
                Err(err)
            }
        }
    }

    fn remove(&self, side: BookSide, position: usize) {
        let mut inner = self.inner.lock();
        match inner.state.remove(side, position) {
            Some(best_changed) => {
                debug!(
                    instrument = %self.instrument,
                    %side,
                    position,
                    best_changed,
                    "depth remove"
                );
                self.notify_mutation(&inner, best_changed);
            }
            None => {
                trace!(
                    instrument = %self.instrument,
                    %side,
                    position,
                    "ignored out-of-range depth remove"
                );
            }
        }
    }

    /// Deliver post-mutation events while still holding the lock: the
    /// best-quote event first when best moved, then the unconditional
    /// book-state event.
    fn notify_mutation(&self, inner: &Inner, best_changed: bool) {
        if inner.listeners.is_empty() {
            return;
        }
        if best_changed {
            let event = self.best_quote_event(&inner.state);
            for (_, listener) in &inner.listeners {
                listener.on_best_quote(&event);
            }
        }
        let event = self.book_state_event(&inner.state);
        for (_, listener) in &inner.listeners {
            listener.on_book_state(&event);
        }
    }

    fn best_quote_event(&self, state: &BookState) -> BestQuoteEvent {
        let bid = state.best(BookSide::Bid);
        let ask = state.best(BookSide::Ask);
        BestQuoteEvent {
            instrument: self.instrument.clone(),
            bid_price: bid.price,
            bid_size: bid.size,
            ask_price: ask.price,
            ask_size: ask.size,
        }
    }

    fn book_state_event(&self, state: &BookState) -> BookStateEvent {
        BookStateEvent {
            instrument: self.instrument.clone(),
            bid_prices: state.ladder(BookSide::Bid).price_vec(),
            bid_sizes: state.ladder(BookSide::Bid).size_vec(),
            ask_prices: state.ladder(BookSide::Ask).price_vec(),
            ask_sizes: state.ladder(BookSide::Ask).size_vec(),
        }
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (bids, asks) = self.depth();
        f.debug_struct("OrderBook")
            .field("instrument", &self.instrument)
            .field("bid_depth", &bids)
            .field("ask_depth", &asks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Default)]
    struct Recorder {
        best_quotes: Mutex<Vec<BestQuoteEvent>>,
        book_states: Mutex<Vec<BookStateEvent>>,
    }

    impl BookListener for Recorder {
        fn on_best_quote(&self, event: &BestQuoteEvent) {
            self.best_quotes.lock().push(event.clone());
        }

        fn on_book_state(&self, event: &BookStateEvent) {
            self.book_states.lock().push(event.clone());
        }
    }

    fn book_with_recorder() -> (OrderBook, Arc<Recorder>) {
        let book = OrderBook::new("ES");
        let recorder = Arc::new(Recorder::default());
        book.subscribe(recorder.clone());
        (book, recorder)
    }

    #[test]
    fn test_insert_fires_best_then_state() {
        let (book, recorder) = book_with_recorder();
        book.insert_bid(0, 100.0, dec!(5)).unwrap();

        let best_quotes = recorder.best_quotes.lock();
        assert_eq!(best_quotes.len(), 1);
        assert_eq!(best_quotes[0].bid_price, 100.0);
        assert_eq!(best_quotes[0].bid_size, dec!(5));
        assert_eq!(best_quotes[0].ask_price, 0.0);

        let book_states = recorder.book_states.lock();
        assert_eq!(book_states.len(), 1);
        assert_eq!(book_states[0].bid_prices, vec![100.0]);
    }

    #[test]
    fn test_worse_insert_fires_state_only() {
        let (book, recorder) = book_with_recorder();
        book.insert_bid(0, 100.0, dec!(5)).unwrap();
        book.insert_bid(1, 99.0, dec!(2)).unwrap();

        assert_eq!(recorder.best_quotes.lock().len(), 1);
        let book_states = recorder.book_states.lock();
        assert_eq!(book_states.len(), 2);
        assert_eq!(book_states[1].bid_prices, vec![100.0, 99.0]);
    }

    #[test]
    fn test_out_of_range_remove_fires_nothing() {
        let (book, recorder) = book_with_recorder();
        book.remove_bid(3);

        assert!(recorder.best_quotes.lock().is_empty());
        assert!(recorder.book_states.lock().is_empty());
    }

    #[test]
    fn test_rejected_update_fires_nothing_and_errors() {
        let (book, recorder) = book_with_recorder();
        let err = book.update_bid(5, 99.0, dec!(1)).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::PositionOutOfRange { position: 5, .. }
        ));
        assert!(recorder.book_states.lock().is_empty());
    }

    #[test]
    fn test_remove_best_fires_best_quote() {
        let (book, recorder) = book_with_recorder();
        book.insert_bid(0, 100.0, dec!(5)).unwrap();
        book.insert_bid(0, 101.0, dec!(2)).unwrap();
        book.remove_bid(0);

        let best_quotes = recorder.best_quotes.lock();
        assert_eq!(best_quotes.len(), 3);
        assert_eq!(best_quotes[2].bid_price, 100.0);
        assert_eq!(book.best_bid_price(), 100.0);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let book = OrderBook::new("ES");
        let recorder = Arc::new(Recorder::default());
        let id = book.subscribe(recorder.clone());

        book.insert_bid(0, 100.0, dec!(5)).unwrap();
        assert!(book.unsubscribe(id));
        assert!(!book.unsubscribe(id));

        book.insert_bid(0, 101.0, dec!(1)).unwrap();
        assert_eq!(recorder.book_states.lock().len(), 1);
    }

    #[test]
    fn test_apply_depth_routes_operations() {
        let book = OrderBook::new("ES");
        book.apply_depth(&DepthUpdate::insert(BookSide::Ask, 0, 101.0, dec!(3)))
            .unwrap();
        book.apply_depth(&DepthUpdate::update(BookSide::Ask, 0, 101.5, dec!(4)))
            .unwrap();
        assert_eq!(book.best_ask(), PriceLevel::new(101.5, dec!(4)));

        book.apply_depth(&DepthUpdate::delete(BookSide::Ask, 0)).unwrap();
        assert!(book.best_ask().is_sentinel());
        // out-of-range delete stays infallible
        book.apply_depth(&DepthUpdate::delete(BookSide::Ask, 9)).unwrap();
    }

    #[test]
    fn test_top_of_book_on_empty_book() {
        let book = OrderBook::new("ES");
        assert_eq!(book.top_of_book(), (0.0, 0.0));
        assert_eq!(book.best_bid_size(), Size::ZERO);
        assert!(book.is_empty());
    }

    #[test]
    fn test_event_vectors_are_defensive_copies() {
        let (book, recorder) = book_with_recorder();
        book.insert_bid(0, 100.0, dec!(5)).unwrap();
        book.update_bid(0, 99.0, dec!(1)).unwrap();

        // the first event still shows the book as it was at dispatch time
        let book_states = recorder.book_states.lock();
        assert_eq!(book_states[0].bid_prices, vec![100.0]);
        assert_eq!(book_states[0].bid_sizes, vec![dec!(5)]);
    }
}
