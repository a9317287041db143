//! Book configuration.
//!
//! This module provides [`BookConfig`] plus the [`BestQuotePolicy`] switch
//! governing how the cached best bid/ask reacts to inserts and updates away
//! from position 0.

/// Policy for promoting an insert/update into the cached best quote.
///
/// The upstream feed reports the top row at position 0, but messages can
/// arrive out of order. The two policies differ in how much they trust a
/// price-only comparison:
///
/// - [`Permissive`](BestQuotePolicy::Permissive) promotes any row whose price
///   ties or beats the cached best, regardless of position. This matches the
///   legacy feed semantics, including its known hazard: a tying row below the
///   top can overwrite the cached best size.
/// - [`StrictTopOnly`](BestQuotePolicy::StrictTopOnly) takes the best from
///   position 0 only, and for mutations below the top rescans the ladder for
///   the true extremum.
///
/// The default is `Permissive` for compatibility with recorded feed
/// sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BestQuotePolicy {
    /// Promote on sentinel, position 0, or a tying/better price anywhere.
    #[default]
    Permissive,
    /// Trust position 0; otherwise recompute the extremum from the ladder.
    StrictTopOnly,
}

/// Configuration for an order book or book manager
///
/// # Example
///
/// ```rust
/// use depthbook::{BestQuotePolicy, BookConfig};
///
/// let config = BookConfig::new()
///     .with_best_quote_policy(BestQuotePolicy::StrictTopOnly)
///     .with_depth_capacity(20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookConfig {
    /// Best-quote promotion policy
    best_quote_policy: BestQuotePolicy,

    /// Initial capacity of each ladder and traded-volume map
    depth_capacity: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            best_quote_policy: BestQuotePolicy::default(),
            // ten visible rows per side is the venue's usual depth subscription
            depth_capacity: 10,
        }
    }
}

impl BookConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the best-quote promotion policy
    #[must_use]
    pub fn with_best_quote_policy(mut self, policy: BestQuotePolicy) -> Self {
        self.best_quote_policy = policy;
        self
    }

    /// Set the initial per-side capacity hint
    #[must_use]
    pub fn with_depth_capacity(mut self, capacity: usize) -> Self {
        self.depth_capacity = capacity;
        self
    }

    /// Get the best-quote promotion policy
    pub fn best_quote_policy(&self) -> BestQuotePolicy {
        self.best_quote_policy
    }

    /// Get the per-side capacity hint
    pub fn depth_capacity(&self) -> usize {
        self.depth_capacity
    }
}
