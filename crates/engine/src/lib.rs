// In crates/engine/src/lib.rs

pub mod error;
pub mod merger;
pub mod pipeline;
pub mod poller;
#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use merger::{MergeLimits, merge};
pub use pipeline::{CycleOutput, Dashboard};
pub use poller::{BatchResult, FetchFailure, FetchResult, PollLimits, Poller};

use api_client::{ApiClient, DashboardSource};
use app_config::Settings;
use core_types::OrderBookDepth;
use events::DashboardMessage;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;

/// Drives the refresh cycle: poll, merge, derive, publish.
pub struct DashboardEngine<S: DashboardSource> {
    poller: Poller<S>,
    dashboard: Dashboard,
    interval: Duration,
    tx: broadcast::Sender<DashboardMessage>,
}

impl DashboardEngine<ApiClient> {
    /// Wires the HTTP client and both window sets from the loaded settings.
    pub fn from_settings(
        settings: &Settings,
        tx: broadcast::Sender<DashboardMessage>,
    ) -> Result<Self> {
        let client = ApiClient::new(&settings.backend)?;
        let poller = Poller::new(
            client,
            PollLimits::from(&settings.poller),
            settings.backend.request_timeout(),
        );
        let dashboard = Dashboard::new(MergeLimits::from(&settings.poller));
        Ok(Self::new(poller, dashboard, settings.poller.interval(), tx))
    }
}

impl<S: DashboardSource> DashboardEngine<S> {
    pub fn new(
        poller: Poller<S>,
        dashboard: Dashboard,
        interval: Duration,
        tx: broadcast::Sender<DashboardMessage>,
    ) -> Self {
        Self {
            poller,
            dashboard,
            interval,
            tx,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Runs a single cycle and publishes its output.
    pub async fn poll_once(&mut self, depth: OrderBookDepth) -> CycleOutput {
        let batch = self.poller.poll(depth).await;
        self.complete_cycle(batch)
    }

    /// The main refresh loop. Polls immediately, then on every tick and whenever
    /// the requested order book depth changes. Returns once `shutdown` fires; a
    /// poll still in flight at that point is dropped and nothing more is published.
    pub async fn run(
        mut self,
        mut shutdown: broadcast::Receiver<()>,
        mut depth_rx: watch::Receiver<OrderBookDepth>,
    ) {
        tracing::info!(interval = ?self.interval, "Starting dashboard refresh loop.");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut depth = *depth_rx.borrow_and_update();
        let mut depth_open = true;

        loop {
            // 1. Wait for a reason to refresh
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                changed = depth_rx.changed(), if depth_open => {
                    if changed.is_err() {
                        // Sender gone: keep the last depth and stop watching.
                        depth_open = false;
                        continue;
                    }
                    depth = *depth_rx.borrow_and_update();
                    ticker.reset();
                    tracing::info!(depth = depth.get(), "Order book depth changed, refreshing now.");
                }
                _ = ticker.tick() => {}
            }

            // 2. Poll, abandoning the batch if shutdown arrives first
            let batch = tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                batch = self.poller.poll(depth) => batch,
            };

            // 3. Merge, derive and publish
            self.complete_cycle(batch);
        }

        tracing::info!(cycles = self.dashboard.cycle(), "Dashboard refresh loop stopped.");
    }

    fn complete_cycle(&mut self, batch: BatchResult) -> CycleOutput {
        let output = self.dashboard.apply(batch);
        if let Some(error) = output.view.error() {
            tracing::debug!(cycle = output.view.cycle, %error, "Cycle completed with stale data.");
        }

        // No subscribers is not an error for the engine.
        let _ = self
            .tx
            .send(DashboardMessage::ViewModel(Box::new(output.view.clone())));
        if let Some(event) = &output.signal_changed {
            let _ = self.tx.send(DashboardMessage::SignalChanged(event.clone()));
        }
        output
    }
}
