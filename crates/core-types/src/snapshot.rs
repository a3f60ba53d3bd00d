// In crates/core-types/src/snapshot.rs

use crate::types::{Candle, EquityPoint, MarketMetrics, OrderBookSnapshot, StatusSnapshot, Trade};
use serde::Serialize;
use std::fmt;

/// The six resources fetched on every poll cycle, in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Status,
    Candles,
    Equity,
    Trades,
    OrderBook,
    MarketMetrics,
}

impl Resource {
    /// The backend path serving this resource.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Status => "/status",
            Resource::Candles => "/candles",
            Resource::Equity => "/equity",
            Resource::Trades => "/bot_trades",
            Resource::OrderBook => "/orderbook",
            Resource::MarketMetrics => "/market_metrics",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Status => "status",
            Resource::Candles => "candles",
            Resource::Equity => "equity",
            Resource::Trades => "trades",
            Resource::OrderBook => "orderbook",
            Resource::MarketMetrics => "market_metrics",
        };
        f.write_str(name)
    }
}

/// The merged view of every resource, as last successfully fetched.
///
/// A new value is produced by each merge; fields are never edited in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardSnapshot {
    /// `None` until the first successful `/status` poll.
    pub status: Option<StatusSnapshot>,
    pub candles: Vec<Candle>,
    pub equity: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub orderbook: OrderBookSnapshot,
    pub market_metrics: MarketMetrics,
    /// Message describing the first resource that failed in the latest cycle.
    pub error: Option<String>,
}
