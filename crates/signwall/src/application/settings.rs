//! Settings editing: the non-UI half of the settings window.
//!
//! [`SettingsEditor`] holds two things side by side:
//!
//! - the **applied** configuration, which is what the display is showing;
//! - a **draft**: the page list being edited plus the raw text of the
//!   refresh-interval and slots fields.
//!
//! Draft edits change nothing on screen until [`SettingsEditor::submit`].
//! Toggling the mode is the exception: it applies immediately (against the
//! applied pages, not the draft) and is only persisted by the next submit.
//!
//! Persistence goes through the [`ConfigStore`] trait so the editor can be
//! driven from a console, a GUI, or a test without touching the file system.

use signwall_core::{Config, DisplayMode, Page};
use thiserror::Error;

/// Validation errors from settings input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("both a title and a URL are required")]
    MissingPageField,

    #[error("no page at position {index} (list has {len})")]
    NoSuchPage { index: usize, len: usize },

    #[error("refresh interval must be a positive whole number of milliseconds, got '{0}'")]
    InvalidRefreshInterval(String),

    #[error("slots per screen must be a positive whole number, got '{0}'")]
    InvalidSlots(String),
}

/// Errors from persisting a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigStoreError {
    #[error("could not persist configuration: {0}")]
    Persist(String),
}

/// Loads and saves the canonical configuration.
pub trait ConfigStore: Send + Sync {
    /// Returns the stored configuration, or defaults when none is usable.
    fn load(&self) -> Config;

    fn save(&self, config: &Config) -> Result<(), ConfigStoreError>;
}

/// Draft settings over an applied configuration.
#[derive(Debug, Clone)]
pub struct SettingsEditor {
    applied: Config,
    draft_pages: Vec<Page>,
    refresh_input: String,
    slots_input: String,
}

impl SettingsEditor {
    /// Starts a draft that mirrors `applied`.
    pub fn new(applied: Config) -> Self {
        Self {
            draft_pages: applied.pages.clone(),
            refresh_input: applied.refresh_interval_ms.to_string(),
            slots_input: applied.slots_per_surface.to_string(),
            applied,
        }
    }

    /// Appends a page to the draft.  Both fields are trimmed and must be non-empty.
    pub fn add_page(&mut self, title: &str, url: &str) -> Result<(), SettingsError> {
        let (title, url) = (title.trim(), url.trim());
        if title.is_empty() || url.is_empty() {
            return Err(SettingsError::MissingPageField);
        }
        self.draft_pages.push(Page::new(title, url));
        Ok(())
    }

    /// Removes the draft page at `index` and returns it.
    pub fn remove_page(&mut self, index: usize) -> Result<Page, SettingsError> {
        if index >= self.draft_pages.len() {
            return Err(SettingsError::NoSuchPage {
                index,
                len: self.draft_pages.len(),
            });
        }
        Ok(self.draft_pages.remove(index))
    }

    /// Flips the applied mode and returns the configuration to apply now.
    pub fn toggle_mode(&mut self) -> Config {
        self.applied = self.applied.with_mode(self.applied.mode.toggled());
        self.applied.clone()
    }

    pub fn set_refresh_input(&mut self, text: impl Into<String>) {
        self.refresh_input = text.into();
    }

    pub fn set_slots_input(&mut self, text: impl Into<String>) {
        self.slots_input = text.into();
    }

    /// Validates the whole draft and, if it is valid, makes it the applied config.
    ///
    /// Nothing changes on error.
    pub fn submit(&mut self) -> Result<Config, SettingsError> {
        let refresh_interval_ms = parse_positive(&self.refresh_input)
            .ok_or_else(|| SettingsError::InvalidRefreshInterval(self.refresh_input.clone()))?;
        let slots = parse_positive(&self.slots_input)
            .ok_or_else(|| SettingsError::InvalidSlots(self.slots_input.clone()))?;

        let config = Config::new(
            self.draft_pages.clone(),
            refresh_interval_ms,
            self.applied.mode,
            slots as usize,
        )
        .map_err(|_| SettingsError::InvalidSlots(self.slots_input.clone()))?;

        self.applied = config.clone();
        Ok(config)
    }

    /// Pages in the draft, in display order.
    pub fn pages(&self) -> &[Page] {
        &self.draft_pages
    }

    pub fn applied(&self) -> &Config {
        &self.applied
    }

    pub fn mode(&self) -> DisplayMode {
        self.applied.mode
    }

    pub fn refresh_input(&self) -> &str {
        &self.refresh_input
    }

    pub fn slots_input(&self) -> &str {
        &self.slots_input
    }
}

fn parse_positive(text: &str) -> Option<u64> {
    text.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
