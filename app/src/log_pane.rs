// In app/src/log_pane.rs

use crate::tracing_layer::LogCache;
use events::{DashboardMessage, LogMessage};
use std::collections::VecDeque;
use std::fmt::Write;

/// Lines shown under each refresh.
pub const ALERT_LINES: usize = 5;

/// The most recent warnings and errors, shown beneath the dashboard.
pub struct LogPane {
    alerts: VecDeque<LogMessage>,
    capacity: usize,
}

impl LogPane {
    /// Starts from whatever the log layer cached before the renderer subscribed.
    pub fn from_cache(cache: &LogCache, capacity: usize) -> Self {
        let mut pane = Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        };
        if let Ok(cached) = cache.lock() {
            for msg in cached.iter() {
                if let DashboardMessage::Log(log) = msg {
                    pane.push(log.clone());
                }
            }
        }
        pane
    }

    /// Keeps the message if it is a warning or an error.
    pub fn push(&mut self, log: LogMessage) {
        if log.level != "WARN" && log.level != "ERROR" {
            return;
        }
        if self.alerts.len() >= self.capacity {
            self.alerts.pop_front();
        }
        self.alerts.push_back(log);
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("  recent alerts:\n");
        for log in &self.alerts {
            let _ = writeln!(
                out,
                "    {} {:<5} {}",
                log.timestamp.format("%H:%M:%S"),
                log.level,
                log.message
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    fn log(level: &str, message: &str) -> LogMessage {
        LogMessage {
            timestamp: Utc::now(),
            level: level.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn replays_cached_warnings_only() {
        let cache: LogCache = Arc::new(Mutex::new(VecDeque::from(vec![
            DashboardMessage::Log(log("INFO", "Starting dashboard refresh loop.")),
            DashboardMessage::Log(log("WARN", "Poll request failed. resource=status")),
            DashboardMessage::Log(log("ERROR", "boom")),
        ])));

        let pane = LogPane::from_cache(&cache, ALERT_LINES);
        let text = pane.render();
        assert!(!text.contains("Starting dashboard"));
        assert!(text.contains("WARN  Poll request failed. resource=status"));
        assert!(text.contains("ERROR boom"));
    }

    #[test]
    fn picks_up_warnings_logged_before_the_renderer_started() {
        use crate::tracing_layer::BroadcastLogLayer;
        use tokio::sync::broadcast;
        use tracing_subscriber::prelude::*;

        let (tx, _rx) = broadcast::channel(16);
        let cache: LogCache = Arc::new(Mutex::new(VecDeque::new()));
        let subscriber =
            tracing_subscriber::registry().with(BroadcastLogLayer::new(tx, cache.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Starting dashboard application");
            tracing::warn!(input = "7", "Ignoring invalid order book depth.");
        });

        let pane = LogPane::from_cache(&cache, ALERT_LINES);
        assert!(!pane.is_empty());
        assert!(pane.render().contains("Ignoring invalid order book depth. input=7"));
        assert!(!pane.render().contains("Starting dashboard"));
    }

    #[test]
    fn keeps_only_the_newest_alerts() {
        let cache: LogCache = Arc::new(Mutex::new(VecDeque::new()));
        let mut pane = LogPane::from_cache(&cache, 2);
        assert!(pane.is_empty());

        pane.push(log("WARN", "first"));
        pane.push(log("DEBUG", "ignored"));
        pane.push(log("WARN", "second"));
        pane.push(log("WARN", "third"));

        let text = pane.render();
        assert!(!text.contains("first"));
        assert!(!text.contains("ignored"));
        assert!(text.contains("second"));
        assert!(text.contains("third"));
    }
}
