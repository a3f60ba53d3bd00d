// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod preferences;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, PreferencesController, Skin,
    Theme, UiAction, UiPreferences,
};
pub use types::{AppSettings, BackendSettings, PollerSettings, PreferencesSettings, Settings};

/// Loads the application settings from the `config/` directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings_from(config_dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let base = config_dir.join("base");
    let env_specific = config_dir.join(&environment);

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::with_name(&base.to_string_lossy()))
        // 2. Load the environment-specific configuration file.
        .add_source(File::with_name(&env_specific.to_string_lossy()).required(false))
        // 3. Load settings from environment variables (e.g., `APP_BACKEND__BASE_URL=...`).
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;
    settings.poller.depth()?;

    tracing::debug!(environment = %environment, base_url = %settings.backend.base_url, "Settings loaded.");
    Ok(settings)
}
