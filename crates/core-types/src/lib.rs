// In crates/core-types/src/lib.rs

pub mod error;
pub mod serde_util;
pub mod snapshot;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use snapshot::{DashboardSnapshot, Resource};
pub use types::{
    BookLevel, Candle, EquityPoint, MarketHistoryEntry, MarketMetrics, MarketReading,
    OrderBookDepth, OrderBookSnapshot, Signal, StatusSnapshot, StrategyParams, Trade,
};
