// In crates/analytics/src/signal.rs

use crate::types::{SignalEvent, TimelinePoint};
use core_types::Signal;

/// Remembers the last non-flat signal seen so a persisting signal fires only once.
#[derive(Debug, Clone, Default)]
pub struct SignalTracker {
    last_nonzero: Option<Signal>,
}

impl SignalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_signal(&self) -> Option<Signal> {
        self.last_nonzero
    }

    /// Looks at the newest timeline sample and returns an event if it carries a
    /// non-flat signal different from the last one observed.
    pub fn observe(&mut self, timeline: &[TimelinePoint]) -> Option<SignalEvent> {
        let latest = timeline.last()?;
        if latest.signal.is_flat() || self.last_nonzero == Some(latest.signal) {
            return None;
        }
        self.last_nonzero = Some(latest.signal);
        Some(SignalEvent {
            time: latest.time.clone(),
            signal: latest.signal,
        })
    }
}
