// In crates/analytics/src/types.rs

use core_types::{Signal, Trade};
use rust_decimal::Decimal;
use serde::Serialize;

/// One sample of the signal timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub time: Option<String>,
    pub signal: Signal,
    /// The candle close, zero when the backend did not send one.
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyPoint {
    pub time: Option<String>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Negative,
}

/// What buy-and-hold would have made over the visible candle window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldBaseline {
    pub pct: f64,
    pub pnl: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub detail: String,
}

/// Emitted when the latest candle carries a new non-flat signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalEvent {
    pub time: Option<String>,
    pub signal: Signal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Competitor {
    Hold,
    Flat,
    Bot,
}

impl Competitor {
    pub fn label(&self) -> &'static str {
        match self {
            Competitor::Hold => "HODL baseline",
            Competitor::Flat => "Flat (0%)",
            Competitor::Bot => "Live bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub id: Competitor,
    pub label: &'static str,
    pub pnl: Decimal,
    pub pct: f64,
}

/// Everything the dashboard shows that is computed rather than fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub timeline: Vec<TimelinePoint>,
    /// Depth imbalance of the latest reading, 0 when unknown.
    pub depth_gauge: f64,
    pub spread_bp: Option<f64>,
    pub latency_series: Vec<LatencyPoint>,
    pub mood: Mood,
    /// In [0, 1].
    pub mood_intensity: f64,
    pub best_trade: Option<Trade>,
    pub worst_trade: Option<Trade>,
    pub hold_baseline: Option<HoldBaseline>,
    pub badges: Vec<Badge>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub narrative: String,
}
