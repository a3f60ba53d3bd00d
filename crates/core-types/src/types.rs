// In crates/core-types/src/types.rs

use crate::serde_util::null_as_default;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The combined trading signal attached to a candle.
///
/// The backend encodes it as a number in {-1, 0, +1}; any other value is
/// reduced to its sign so a noisy payload cannot produce an invalid signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "i8")]
pub enum Signal {
    Short,
    #[default]
    Flat,
    Long,
}

impl Signal {
    pub fn is_flat(&self) -> bool {
        matches!(self, Signal::Flat)
    }

    pub fn as_i8(&self) -> i8 {
        match self {
            Signal::Short => -1,
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }
}

impl From<f64> for Signal {
    fn from(raw: f64) -> Self {
        if raw > 0.0 {
            Signal::Long
        } else if raw < 0.0 {
            Signal::Short
        } else {
            // Zero and NaN both read as "no signal".
            Signal::Flat
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.as_i8()
    }
}

/// Scalar bot state as returned by `GET /status`.
///
/// Every field is optional: the backend omits values it has not computed yet
/// (e.g. `hit_rate_last_20` before the first closing trade).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    pub pair: Option<String>,
    pub candle_sec: Option<u32>,
    /// Starting capital of the simulated account.
    pub initial_cash: Option<Decimal>,
    pub equity: Option<Decimal>,
    pub last_price: Option<Decimal>,
    pub price_timestamp: Option<String>,
    pub price_change_pct: Option<f64>,
    /// Total PnL (realized + unrealized).
    pub pnl: Option<Decimal>,
    pub pnl_pct: Option<f64>,
    pub pnl_realized: Option<Decimal>,
    pub pnl_realized_pct: Option<f64>,
    pub pnl_unrealized: Option<Decimal>,
    pub pnl_unrealized_pct: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
    pub trailing_stop_pct: Option<f64>,
    pub position_scale: Option<f64>,
    /// Open position size (positive long, negative short).
    pub position: Option<Decimal>,
    /// Number of candles the current position has been held.
    pub position_age: Option<u64>,
    pub n_trades: Option<u64>,
    /// Fraction of winning closes among the last 20, in [0, 1].
    pub hit_rate_last_20: Option<f64>,
    pub feed_status: Option<String>,
    pub feed_running: Option<bool>,
    pub market_latency_ms: Option<f64>,
    pub last_update: Option<String>,
}

/// One OHLC bar with its pattern flags and signals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Candle {
    /// Bar open time, passed through as sent by the backend.
    pub t0: Option<String>,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub hammer: Option<bool>,
    pub shooting_star: Option<bool>,
    /// +1 bullish engulfing, -1 bearish engulfing, 0 none.
    pub engulfing: Option<Signal>,
    pub inside_bar: Option<bool>,
    pub signal_candle: Option<Signal>,
    pub signal_combined: Option<Signal>,
}

impl Candle {
    /// The signal shown for this bar: combined if present, else single-candle, else flat.
    pub fn effective_signal(&self) -> Signal {
        self.signal_combined
            .or(self.signal_candle)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EquityPoint {
    pub t0: Option<String>,
    pub equity: Option<Decimal>,
}

/// An executed simulator action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Trade {
    pub t0: Option<String>,
    /// buy / sell / short / buy_to_cover
    pub action: Option<String>,
    pub price: Option<Decimal>,
    pub qty: Option<Decimal>,
    pub equity: Option<Decimal>,
    /// Realized PnL of this action.
    pub pnl: Option<Decimal>,
    pub context: Option<String>,
}

impl Trade {
    /// Realized PnL, treating a missing value as zero.
    pub fn realized_pnl(&self) -> Decimal {
        self.pnl.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub qty: Decimal,
}

/// Top-of-book levels captured at one instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBookSnapshot {
    /// Best bid first (descending price).
    #[serde(deserialize_with = "null_as_default")]
    pub bids: Vec<BookLevel>,
    /// Best ask first (ascending price).
    #[serde(deserialize_with = "null_as_default")]
    pub asks: Vec<BookLevel>,
    pub timestamp: Option<String>,
    pub latency_ms: Option<f64>,
}

/// A single microstructure reading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketReading {
    pub mid: Option<f64>,
    pub spread: Option<f64>,
    pub spread_bp: Option<f64>,
    pub bid_volume: Option<f64>,
    pub ask_volume: Option<f64>,
    /// (bid - ask) / (bid + ask) volume, in [-1, 1].
    pub depth_imbalance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketHistoryEntry {
    pub timestamp: Option<String>,
    pub latency_ms: Option<f64>,
    #[serde(flatten)]
    pub reading: MarketReading,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketMetrics {
    pub latest: Option<MarketReading>,
    #[serde(deserialize_with = "null_as_default")]
    pub history: Vec<MarketHistoryEntry>,
    pub volatility: Option<f64>,
}

/// Number of order book levels requested per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct OrderBookDepth(u32);

impl OrderBookDepth {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 50;
    pub const STEP: u32 = 5;

    pub fn new(levels: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&levels) && levels % Self::STEP == 0 {
            Ok(Self(levels))
        } else {
            Err(Error::InvalidDepth(levels))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for OrderBookDepth {
    fn default() -> Self {
        Self(25)
    }
}

impl TryFrom<u32> for OrderBookDepth {
    type Error = Error;

    fn try_from(levels: u32) -> Result<Self> {
        Self::new(levels)
    }
}

impl From<OrderBookDepth> for u32 {
    fn from(depth: OrderBookDepth) -> Self {
        depth.0
    }
}

/// Strategy parameters pushed to `POST /config`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub trailing_stop_pct: f64,
    pub position_scale: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            stop_loss_pct: 0.01,
            take_profit_pct: 0.02,
            trailing_stop_pct: 0.01,
            position_scale: 1.0,
        }
    }
}

impl StrategyParams {
    /// Starts from the values currently reported by the bot, falling back to defaults.
    pub fn from_status(status: Option<&StatusSnapshot>) -> Self {
        let defaults = Self::default();
        match status {
            Some(s) => Self {
                stop_loss_pct: s.stop_loss_pct.unwrap_or(defaults.stop_loss_pct),
                take_profit_pct: s.take_profit_pct.unwrap_or(defaults.take_profit_pct),
                trailing_stop_pct: s.trailing_stop_pct.unwrap_or(defaults.trailing_stop_pct),
                position_scale: s.position_scale.unwrap_or(defaults.position_scale),
            },
            None => defaults,
        }
    }

    /// Checks every field against the range the bot accepts.
    pub fn validate(&self) -> Result<()> {
        check_range("stop_loss_pct", self.stop_loss_pct, 0.0, 0.05)?;
        check_range("take_profit_pct", self.take_profit_pct, 0.0, 0.08)?;
        check_range("trailing_stop_pct", self.trailing_stop_pct, 0.0, 0.05)?;
        check_range("position_scale", self.position_scale, 0.2, 2.0)?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    // NaN fails both comparisons, so it is rejected here too.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}
