// In crates/engine/src/pipeline.rs

use crate::merger::{MergeLimits, merge};
use crate::poller::BatchResult;
use analytics::{AnalyticsEngine, SignalEvent, SignalTracker};
use chrono::Utc;
use core_types::DashboardSnapshot;
use events::ViewModel;

/// What one cycle hands to the presentation layer.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    pub view: ViewModel,
    /// Set only on the cycle where a new non-flat signal appeared.
    pub signal_changed: Option<SignalEvent>,
}

/// The dashboard state carried from one cycle to the next.
pub struct Dashboard {
    snapshot: DashboardSnapshot,
    limits: MergeLimits,
    analytics: AnalyticsEngine,
    tracker: SignalTracker,
    last_event: Option<SignalEvent>,
    cycle: u64,
}

impl Dashboard {
    pub fn new(limits: MergeLimits) -> Self {
        Self {
            snapshot: DashboardSnapshot::default(),
            limits,
            analytics: AnalyticsEngine::new(),
            tracker: SignalTracker::new(),
            last_event: None,
            cycle: 0,
        }
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Merge, derive, detect. The only place the snapshot changes.
    pub fn apply(&mut self, batch: BatchResult) -> CycleOutput {
        self.snapshot = merge(&self.snapshot, batch, &self.limits);
        self.cycle += 1;

        let derived = self.analytics.derive(&self.snapshot);
        let signal_changed = self.tracker.observe(&derived.timeline);
        if let Some(event) = &signal_changed {
            tracing::info!(signal = ?event.signal, time = ?event.time, "Signal changed.");
            self.last_event = Some(event.clone());
        }

        let view = ViewModel {
            updated_at: Utc::now(),
            cycle: self.cycle,
            snapshot: self.snapshot.clone(),
            derived,
            signal_event: self.last_event.clone(),
        };

        CycleOutput { view, signal_changed }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(MergeLimits::default())
    }
}
