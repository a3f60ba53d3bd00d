// In app/src/tracing_layer.rs

use chrono::Utc;
use events::{DashboardMessage, LogMessage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;

/// How many log lines a late subscriber can replay.
pub const LOG_CACHE_SIZE: usize = 200;

pub type LogCache = Arc<Mutex<VecDeque<DashboardMessage>>>;

/// Forwards every log event onto the dashboard channel and keeps the latest ones for replay.
pub struct BroadcastLogLayer {
    tx: broadcast::Sender<DashboardMessage>,
    cache: LogCache,
}

impl BroadcastLogLayer {
    pub fn new(tx: broadcast::Sender<DashboardMessage>, cache: LogCache) -> Self {
        Self { tx, cache }
    }
}

impl<S> Layer<S> for BroadcastLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = LogMessageVisitor::default();
        event.record(&mut visitor);
        let msg = DashboardMessage::Log(LogMessage {
            timestamp: Utc::now(),
            level: event.metadata().level().to_string(),
            message: visitor.finish(),
        });

        let _ = self.tx.send(msg.clone());

        // A poisoned cache only loses replay history.
        if let Ok(mut cache) = self.cache.lock() {
            if cache.len() >= LOG_CACHE_SIZE {
                cache.pop_front();
            }
            cache.push_back(msg);
        }
    }
}

/// Captures the `message` field, then appends the structured fields as `key=value`.
#[derive(Default)]
struct LogMessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl LogMessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{} {}", self.message, self.fields.join(" "))
        }
    }
}

impl tracing::field::Visit for LogMessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::prelude::*;

    #[test]
    fn forwards_and_caches_log_lines() {
        let (tx, mut rx) = broadcast::channel(16);
        let cache: LogCache = Arc::new(Mutex::new(VecDeque::new()));
        let subscriber =
            tracing_subscriber::registry().with(BroadcastLogLayer::new(tx, cache.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(resource = "status", "Poll request failed.");
        });

        match rx.try_recv() {
            Ok(DashboardMessage::Log(log)) => {
                assert_eq!(log.level, "WARN");
                assert_eq!(log.message, "Poll request failed. resource=status");
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert_eq!(cache.lock().unwrap().len(), 1);
    }

    #[test]
    fn cache_is_bounded() {
        let (tx, _rx) = broadcast::channel(16);
        let cache: LogCache = Arc::new(Mutex::new(VecDeque::new()));
        let subscriber =
            tracing_subscriber::registry().with(BroadcastLogLayer::new(tx, cache.clone()));

        tracing::subscriber::with_default(subscriber, || {
            for i in 0..(LOG_CACHE_SIZE + 25) {
                tracing::info!(i, "tick");
            }
        });

        assert_eq!(cache.lock().unwrap().len(), LOG_CACHE_SIZE);
    }
}
