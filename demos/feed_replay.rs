//! Replay a small scripted depth/tape sequence through a book manager and
//! print what a subscriber sees.
//!
//! Run with: `cargo run --example feed_replay`

use std::sync::Arc;

use rust_decimal::Decimal;

use depthbook::{
    BestQuoteEvent, BookListener, BookManager, BookSide, BookStateEvent, DepthUpdate, QuoteBar,
    TapeRecord, TapeSide, TickType,
};

struct PrintingListener;

impl BookListener for PrintingListener {
    fn on_best_quote(&self, event: &BestQuoteEvent) {
        println!(
            "[best]  {} bid {} x {} / ask {} x {}",
            event.instrument, event.bid_price, event.bid_size, event.ask_price, event.ask_size
        );
    }

    fn on_book_state(&self, event: &BookStateEvent) {
        println!(
            "[state] {} ({} bids / {} asks): {}",
            event.instrument,
            event.bid_depth(),
            event.ask_depth(),
            serde_json::to_string(event).expect("event serializes")
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "depthbook=debug".into()),
        )
        .init();

    let manager = BookManager::new();
    let book = manager.add_instrument("ESZ6");
    book.subscribe(Arc::new(PrintingListener));

    let size = |n: i64| Decimal::from(n);

    // a plausible opening burst: build both sides, tighten, trade, fade
    let depth_script = vec![
        DepthUpdate::insert(BookSide::Bid, 0, 4500.25, size(10)),
        DepthUpdate::insert(BookSide::Bid, 1, 4500.00, size(14)),
        DepthUpdate::insert(BookSide::Ask, 0, 4500.75, size(8)),
        DepthUpdate::insert(BookSide::Ask, 1, 4501.00, size(20)),
        DepthUpdate::insert(BookSide::Bid, 0, 4500.50, size(3)),
        DepthUpdate::update(BookSide::Ask, 0, 4500.75, size(5)),
        DepthUpdate::delete(BookSide::Bid, 0),
    ];

    for update in &depth_script {
        if let Err(err) = manager.apply_depth("ESZ6", update) {
            eprintln!("feed anomaly: {err}");
        }
    }

    for (price, qty, side) in [
        (4500.75, 2, TapeSide::AggressorAsk),
        (4500.75, 3, TapeSide::AggressorAsk),
        (4500.25, 5, TapeSide::AggressorBid),
    ] {
        book.attribute_trade(&TapeRecord::new(
            price,
            size(qty),
            side,
            1_700_000_000_000,
            TickType::Last,
        ));
    }

    let snapshot = book.snapshot(1_700_000_000_500);
    println!(
        "\nsnapshot @ {}: {} bids / {} asks, ask volume at 4500.75 = {:?}",
        snapshot.timestamp_ms(),
        snapshot.depth().0,
        snapshot.depth().1,
        snapshot.traded_ask_volume(4500.75)
    );

    let bar = QuoteBar::from_snapshot(&snapshot);
    println!("bar: {bar}");
}
