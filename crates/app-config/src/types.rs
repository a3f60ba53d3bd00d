// In crates/app-config/src/types.rs

use core_types::OrderBookDepth;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Where the bot backend lives and how long to wait for it.
    pub backend: BackendSettings,
    #[serde(default)]
    pub poller: PollerSettings,
    #[serde(default)]
    pub preferences: PreferencesSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BackendSettings {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// A request still pending after this long counts as failed for its cycle.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PollerSettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_orderbook_depth")]
    pub orderbook_depth: u32,
    #[serde(default = "default_candles_limit")]
    pub candles_limit: usize,
    #[serde(default = "default_equity_limit")]
    pub equity_limit: usize,
    #[serde(default = "default_trades_limit")]
    pub trades_limit: usize,
    #[serde(default = "default_market_history")]
    pub market_history: usize,
}

impl PollerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// The configured depth, validated.
    pub fn depth(&self) -> core_types::Result<OrderBookDepth> {
        OrderBookDepth::new(self.orderbook_depth)
    }
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            orderbook_depth: default_orderbook_depth(),
            candles_limit: default_candles_limit(),
            equity_limit: default_equity_limit(),
            trades_limit: default_trades_limit(),
            market_history: default_market_history(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PreferencesSettings {
    /// TOML file the UI preferences are persisted to.
    #[serde(default = "default_preferences_path")]
    pub path: PathBuf,
}

impl Default for PreferencesSettings {
    fn default() -> Self {
        Self { path: default_preferences_path() }
    }
}

/// Helper functions for serde defaults
fn default_request_timeout_ms() -> u64 { 5_000 }
fn default_interval_ms() -> u64 { 1_500 }
fn default_orderbook_depth() -> u32 { 25 }
fn default_candles_limit() -> usize { 200 }
fn default_equity_limit() -> usize { 400 }
fn default_trades_limit() -> usize { 200 }
fn default_market_history() -> usize { 240 }
fn default_preferences_path() -> PathBuf { PathBuf::from("config/preferences.toml") }
