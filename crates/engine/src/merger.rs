// In crates/engine/src/merger.rs

use crate::poller::{BatchResult, FetchResult};
use app_config::PollerSettings;
use core_types::{DashboardSnapshot, MarketMetrics, OrderBookDepth, OrderBookSnapshot};

/// The most entries of each sequence the dashboard holds on to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeLimits {
    pub candles: usize,
    pub equity: usize,
    pub trades: usize,
    pub market_history: usize,
    /// Levels kept per side of the order book.
    pub book_levels: usize,
}

impl Default for MergeLimits {
    fn default() -> Self {
        Self {
            candles: 200,
            equity: 400,
            trades: 200,
            market_history: 240,
            book_levels: OrderBookDepth::MAX as usize,
        }
    }
}

impl From<&PollerSettings> for MergeLimits {
    fn from(settings: &PollerSettings) -> Self {
        let defaults = Self::default();
        // Never hold more than the documented windows, even if more was requested.
        Self {
            candles: settings.candles_limit.min(defaults.candles),
            equity: settings.equity_limit.min(defaults.equity),
            trades: settings.trades_limit.min(defaults.trades),
            market_history: settings.market_history,
            book_levels: defaults.book_levels,
        }
    }
}

/// Folds a batch into the previous snapshot.
///
/// Each resource is either replaced by its fresh payload (sequences cut down to
/// their newest `limits` entries) or kept as it was when its request failed or
/// was not made. The error field names the first failure in request order and is
/// cleared when a batch has none. An empty batch returns `previous` unchanged.
pub fn merge(previous: &DashboardSnapshot, batch: BatchResult, limits: &MergeLimits) -> DashboardSnapshot {
    if batch.is_empty() {
        return previous.clone();
    }

    let error = batch.first_failure().map(|failure| failure.message.clone());

    DashboardSnapshot {
        status: match batch.status {
            Some(Ok(status)) => Some(status),
            _ => previous.status.clone(),
        },
        candles: replace_or_keep(batch.candles, &previous.candles, |c| keep_last(c, limits.candles)),
        equity: replace_or_keep(batch.equity, &previous.equity, |e| keep_last(e, limits.equity)),
        trades: replace_or_keep(batch.trades, &previous.trades, |t| keep_last(t, limits.trades)),
        orderbook: replace_or_keep(batch.orderbook, &previous.orderbook, |book| {
            cap_book(book, limits.book_levels)
        }),
        market_metrics: replace_or_keep(batch.market_metrics, &previous.market_metrics, |metrics| {
            MarketMetrics {
                history: keep_last(metrics.history, limits.market_history),
                ..metrics
            }
        }),
        error,
    }
}

fn replace_or_keep<T: Clone>(
    fresh: Option<FetchResult<T>>,
    previous: &T,
    shape: impl FnOnce(T) -> T,
) -> T {
    match fresh {
        Some(Ok(value)) => shape(value),
        _ => previous.clone(),
    }
}

/// Keeps the newest `cap` entries of an oldest-first sequence.
fn keep_last<T>(mut items: Vec<T>, cap: usize) -> Vec<T> {
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
    items
}

fn cap_book(mut book: OrderBookSnapshot, levels: usize) -> OrderBookSnapshot {
    // Both sides are best-first, so the tail is the far end of the book.
    book.bids.truncate(levels);
    book.asks.truncate(levels);
    book
}
