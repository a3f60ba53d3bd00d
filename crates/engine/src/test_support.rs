// In crates/engine/src/test_support.rs

use api_client::{DashboardSource, Error, Result};
use async_trait::async_trait;
use core_types::{
    BookLevel, Candle, EquityPoint, MarketMetrics, MarketReading, OrderBookDepth,
    OrderBookSnapshot, Resource, Signal, StatusSnapshot, Trade,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

/// In-memory backend with switchable failures.
pub struct FakeSource {
    failing: Mutex<HashSet<Resource>>,
    hanging: HashSet<Resource>,
    candles: Mutex<Vec<Candle>>,
    depths: Mutex<Vec<u32>>,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self {
            failing: Mutex::new(HashSet::new()),
            hanging: HashSet::new(),
            candles: Mutex::new(candles_with_signals(&[Signal::Flat, Signal::Flat, Signal::Long])),
            depths: Mutex::new(Vec::new()),
        }
    }
}

impl FakeSource {
    pub fn failing(self, resource: Resource) -> Self {
        self.failing.lock().unwrap().insert(resource);
        self
    }

    pub fn hanging(mut self, resource: Resource) -> Self {
        self.hanging.insert(resource);
        self
    }

    pub fn set_failing(&self, resource: Resource, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(resource);
        } else {
            set.remove(&resource);
        }
    }

    pub fn set_candles(&self, candles: Vec<Candle>) {
        *self.candles.lock().unwrap() = candles;
    }

    pub fn requested_depths(&self) -> Vec<u32> {
        self.depths.lock().unwrap().clone()
    }

    async fn gate(&self, resource: Resource) -> Result<()> {
        if self.hanging.contains(&resource) {
            tokio::time::sleep(Duration::from_secs(3_600)).await;
        }
        if self.failing.lock().unwrap().contains(&resource) {
            return Err(Error::HttpStatus {
                status: 500,
                url: resource.path().to_string(),
            });
        }
        Ok(())
    }
}

pub fn candles_with_signals(signals: &[Signal]) -> Vec<Candle> {
    signals
        .iter()
        .enumerate()
        .map(|(i, signal)| Candle {
            t0: Some(format!("2024-05-01T10:{:02}:00Z", i)),
            open: Some(dec!(100) + Decimal::from(i)),
            close: Some(dec!(101) + Decimal::from(i)),
            signal_combined: Some(*signal),
            ..Default::default()
        })
        .collect()
}

pub fn sample_status() -> StatusSnapshot {
    StatusSnapshot {
        initial_cash: Some(dec!(100)),
        equity: Some(dec!(110.5)),
        pnl: Some(dec!(10.5)),
        pnl_pct: Some(10.5),
        n_trades: Some(12),
        hit_rate_last_20: Some(0.65),
        ..Default::default()
    }
}

#[async_trait]
impl DashboardSource for FakeSource {
    async fn fetch_status(&self) -> Result<StatusSnapshot> {
        self.gate(Resource::Status).await?;
        Ok(sample_status())
    }

    async fn fetch_candles(&self, limit: usize) -> Result<Vec<Candle>> {
        self.gate(Resource::Candles).await?;
        let candles = self.candles.lock().unwrap().clone();
        let start = candles.len().saturating_sub(limit);
        Ok(candles[start..].to_vec())
    }

    async fn fetch_equity(&self, _limit: usize) -> Result<Vec<EquityPoint>> {
        self.gate(Resource::Equity).await?;
        Ok(vec![EquityPoint {
            t0: Some("2024-05-01T10:00:00Z".into()),
            equity: Some(dec!(110.5)),
        }])
    }

    async fn fetch_trades(&self, _limit: usize) -> Result<Vec<Trade>> {
        self.gate(Resource::Trades).await?;
        Ok(vec![Trade {
            action: Some("sell".into()),
            price: Some(dec!(103)),
            pnl: Some(dec!(2.5)),
            ..Default::default()
        }])
    }

    async fn fetch_orderbook(&self, depth: OrderBookDepth) -> Result<OrderBookSnapshot> {
        self.depths.lock().unwrap().push(depth.get());
        self.gate(Resource::OrderBook).await?;
        Ok(OrderBookSnapshot {
            bids: vec![BookLevel { price: dec!(100), qty: dec!(1) }],
            asks: vec![BookLevel { price: dec!(101), qty: dec!(2) }],
            timestamp: Some("2024-05-01T10:02:00Z".into()),
            latency_ms: Some(15.0),
        })
    }

    async fn fetch_market_metrics(&self, _history: usize) -> Result<MarketMetrics> {
        self.gate(Resource::MarketMetrics).await?;
        Ok(MarketMetrics {
            latest: Some(MarketReading {
                depth_imbalance: Some(0.2),
                spread_bp: Some(0.8),
                ..Default::default()
            }),
            history: Vec::new(),
            volatility: None,
        })
    }
}
