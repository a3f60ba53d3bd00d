// --- Messages published to the presentation layer ---

use analytics::{DerivedView, SignalEvent};
use chrono::{DateTime, Utc};
use core_types::DashboardSnapshot;
use serde::Serialize;

/// Represents a log message event to be sent to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct LogMessage {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: String,
}

/// Everything the dashboard renders after one poll cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub updated_at: DateTime<Utc>,
    /// Monotonic poll cycle counter, starting at 1.
    pub cycle: u64,
    pub snapshot: DashboardSnapshot,
    pub derived: DerivedView,
    /// The most recent signal change, kept until a newer one fires.
    pub signal_event: Option<SignalEvent>,
}

impl ViewModel {
    /// The advisory shown while any resource is stale.
    pub fn error(&self) -> Option<&str> {
        self.snapshot.error.as_deref()
    }
}

/// The top-level message enum.
/// `tag` and `content` are used by serde for clean JSON representation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum DashboardMessage {
    Log(LogMessage),
    ViewModel(Box<ViewModel>),
    /// Sent alongside the view model on the cycle where the signal changed.
    SignalChanged(SignalEvent),
}
