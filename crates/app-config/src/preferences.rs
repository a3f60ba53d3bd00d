// In crates/app-config/src/preferences.rs

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    #[default]
    Aurora,
    Cyberpunk,
    Solar,
    Minimal,
}

/// Presentation preferences, passed down explicitly to whatever renders the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPreferences {
    pub theme: Theme,
    pub skin: Skin,
    pub focus_mode: bool,
    pub sound_enabled: bool,
    pub large_text: bool,
    pub text_only: bool,
    // Session-only state, never written to the store.
    #[serde(skip)]
    pub sidebar_open: bool,
    #[serde(skip)]
    pub show_shortcuts: bool,
}

/// Every way the preferences can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ToggleTheme,
    SetSkin(Skin),
    ToggleFocus,
    ToggleSound,
    ToggleLargeText,
    ToggleTextOnly,
    ShowShortcuts,
    HideShortcuts,
    /// `None` flips the sidebar, `Some(open)` forces it.
    ToggleSidebar(Option<bool>),
}

impl UiPreferences {
    /// Applies one action, returning the new preferences.
    pub fn reduce(&self, action: UiAction) -> Self {
        let mut next = self.clone();
        match action {
            UiAction::ToggleTheme => {
                next.theme = match self.theme {
                    Theme::Dark => Theme::Light,
                    Theme::Light => Theme::Dark,
                }
            }
            UiAction::SetSkin(skin) => next.skin = skin,
            UiAction::ToggleFocus => next.focus_mode = !self.focus_mode,
            UiAction::ToggleSound => next.sound_enabled = !self.sound_enabled,
            UiAction::ToggleLargeText => next.large_text = !self.large_text,
            UiAction::ToggleTextOnly => next.text_only = !self.text_only,
            UiAction::ShowShortcuts => next.show_shortcuts = true,
            UiAction::HideShortcuts => next.show_shortcuts = false,
            UiAction::ToggleSidebar(value) => next.sidebar_open = value.unwrap_or(!self.sidebar_open),
        }
        next
    }

    fn persisted_eq(&self, other: &Self) -> bool {
        self.theme == other.theme
            && self.skin == other.skin
            && self.focus_mode == other.focus_mode
            && self.sound_enabled == other.sound_enabled
            && self.large_text == other.large_text
            && self.text_only == other.text_only
    }
}

/// Where preferences survive between sessions.
pub trait PreferenceStore {
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<UiPreferences>>;

    fn save(&mut self, preferences: &UiPreferences) -> Result<()>;
}

/// Stores preferences as a TOML file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Option<UiPreferences>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let preferences: UiPreferences = toml::from_str(&content)?;
        Ok(Some(preferences))
    }

    fn save(&mut self, preferences: &UiPreferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string(preferences)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Keeps preferences in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    saved: Option<UiPreferences>,
    save_count: usize,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<UiPreferences>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, preferences: &UiPreferences) -> Result<()> {
        self.saved = Some(preferences.clone());
        self.save_count += 1;
        Ok(())
    }
}

/// Owns the current preferences and writes persisted changes through the store.
pub struct PreferencesController<S: PreferenceStore> {
    store: S,
    current: UiPreferences,
}

impl<S: PreferenceStore> PreferencesController<S> {
    /// Loads saved preferences; an unreadable store falls back to the defaults.
    pub fn new(store: S) -> Self {
        let current = match store.load() {
            Ok(Some(saved)) => saved,
            Ok(None) => UiPreferences::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load UI preferences. Using defaults.");
                UiPreferences::default()
            }
        };
        Self { store, current }
    }

    pub fn preferences(&self) -> &UiPreferences {
        &self.current
    }

    /// Applies an action and saves the result if a persisted field changed.
    pub fn dispatch(&mut self, action: UiAction) -> Result<&UiPreferences> {
        let next = self.current.reduce(action);
        let changed = !next.persisted_eq(&self.current);
        self.current = next;
        if changed {
            self.store.save(&self.current)?;
        }
        Ok(&self.current)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
