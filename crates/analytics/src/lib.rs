// In crates/analytics/src/lib.rs

pub mod engine;
pub mod format;
pub mod narrative;
pub mod signal;
pub mod types;

pub use engine::AnalyticsEngine;
pub use signal::SignalTracker;
pub use types::{
    Badge, Competitor, DerivedView, HoldBaseline, LatencyPoint, LeaderboardEntry, Mood,
    SignalEvent, TimelinePoint,
};
