// In crates/api-client/src/source.rs

use crate::Result;
use async_trait::async_trait;
use core_types::{
    Candle, EquityPoint, MarketMetrics, OrderBookDepth, OrderBookSnapshot, StatusSnapshot, Trade,
};

/// The read side of the bot backend, one method per polled resource.
///
/// `ApiClient` is the production implementation; the poller only sees this trait.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn fetch_status(&self) -> Result<StatusSnapshot>;

    async fn fetch_candles(&self, limit: usize) -> Result<Vec<Candle>>;

    async fn fetch_equity(&self, limit: usize) -> Result<Vec<EquityPoint>>;

    async fn fetch_trades(&self, limit: usize) -> Result<Vec<Trade>>;

    async fn fetch_orderbook(&self, depth: OrderBookDepth) -> Result<OrderBookSnapshot>;

    async fn fetch_market_metrics(&self, history: usize) -> Result<MarketMetrics>;
}

#[async_trait]
impl<T: DashboardSource + ?Sized> DashboardSource for std::sync::Arc<T> {
    async fn fetch_status(&self) -> Result<StatusSnapshot> {
        (**self).fetch_status().await
    }

    async fn fetch_candles(&self, limit: usize) -> Result<Vec<Candle>> {
        (**self).fetch_candles(limit).await
    }

    async fn fetch_equity(&self, limit: usize) -> Result<Vec<EquityPoint>> {
        (**self).fetch_equity(limit).await
    }

    async fn fetch_trades(&self, limit: usize) -> Result<Vec<Trade>> {
        (**self).fetch_trades(limit).await
    }

    async fn fetch_orderbook(&self, depth: OrderBookDepth) -> Result<OrderBookSnapshot> {
        (**self).fetch_orderbook(depth).await
    }

    async fn fetch_market_metrics(&self, history: usize) -> Result<MarketMetrics> {
        (**self).fetch_market_metrics(history).await
    }
}
