// In crates/engine/src/poller.rs

use api_client::DashboardSource;
use app_config::PollerSettings;
use core_types::{
    Candle, EquityPoint, MarketMetrics, OrderBookDepth, OrderBookSnapshot, Resource,
    StatusSnapshot, Trade,
};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Why a resource produced no fresh data this cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub resource: Resource,
    pub message: String,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchFailure>;

/// The outcome of one poll cycle, resource by resource.
///
/// `None` means the resource was not requested in this batch.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub status: Option<FetchResult<StatusSnapshot>>,
    pub candles: Option<FetchResult<Vec<Candle>>>,
    pub equity: Option<FetchResult<Vec<EquityPoint>>>,
    pub trades: Option<FetchResult<Vec<Trade>>>,
    pub orderbook: Option<FetchResult<OrderBookSnapshot>>,
    pub market_metrics: Option<FetchResult<MarketMetrics>>,
}

impl BatchResult {
    /// A batch in which nothing was attempted.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.candles.is_none()
            && self.equity.is_none()
            && self.trades.is_none()
            && self.orderbook.is_none()
            && self.market_metrics.is_none()
    }

    /// Failures in request order.
    pub fn failures(&self) -> Vec<&FetchFailure> {
        [
            failure_of(&self.status),
            failure_of(&self.candles),
            failure_of(&self.equity),
            failure_of(&self.trades),
            failure_of(&self.orderbook),
            failure_of(&self.market_metrics),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn first_failure(&self) -> Option<&FetchFailure> {
        self.failures().into_iter().next()
    }
}

fn failure_of<T>(result: &Option<FetchResult<T>>) -> Option<&FetchFailure> {
    match result {
        Some(Err(failure)) => Some(failure),
        _ => None,
    }
}

/// How much history each request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollLimits {
    pub candles: usize,
    pub equity: usize,
    pub trades: usize,
    pub market_history: usize,
}

impl Default for PollLimits {
    fn default() -> Self {
        Self::from(&PollerSettings::default())
    }
}

impl From<&PollerSettings> for PollLimits {
    fn from(settings: &PollerSettings) -> Self {
        Self {
            candles: settings.candles_limit,
            equity: settings.equity_limit,
            trades: settings.trades_limit,
            market_history: settings.market_history,
        }
    }
}

/// Fetches all six resources concurrently, one independent result each.
pub struct Poller<S: DashboardSource> {
    source: S,
    limits: PollLimits,
    timeout: Duration,
}

impl<S: DashboardSource> Poller<S> {
    pub fn new(source: S, limits: PollLimits, timeout: Duration) -> Self {
        Self {
            source,
            limits,
            timeout,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs one batch. Never fails as a whole: each resource carries its own outcome.
    pub async fn poll(&self, depth: OrderBookDepth) -> BatchResult {
        let source = &self.source;
        let limits = self.limits;

        let (status, candles, equity, trades, orderbook, market_metrics) = tokio::join!(
            self.fetch(Resource::Status, source.fetch_status()),
            self.fetch(Resource::Candles, source.fetch_candles(limits.candles)),
            self.fetch(Resource::Equity, source.fetch_equity(limits.equity)),
            self.fetch(Resource::Trades, source.fetch_trades(limits.trades)),
            self.fetch(Resource::OrderBook, source.fetch_orderbook(depth)),
            self.fetch(Resource::MarketMetrics, source.fetch_market_metrics(limits.market_history)),
        );

        BatchResult {
            status: Some(status),
            candles: Some(candles),
            equity: Some(equity),
            trades: Some(trades),
            orderbook: Some(orderbook),
            market_metrics: Some(market_metrics),
        }
    }

    /// Awaits one request, turning errors and timeouts into a `FetchFailure`.
    async fn fetch<T, F>(&self, resource: Resource, request: F) -> FetchResult<T>
    where
        F: Future<Output = api_client::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(resource = %resource, error = %e, "Poll request failed.");
                Err(FetchFailure {
                    resource,
                    message: e.to_string(),
                })
            }
            Err(_) => {
                tracing::warn!(resource = %resource, timeout = ?self.timeout, "Poll request timed out.");
                Err(FetchFailure {
                    resource,
                    message: format!("Request timed out for {}", resource.path()),
                })
            }
        }
    }
}
