//! The canonical engine configuration.
//!
//! [`Config`] is the single shape the engine ever sees.  Whatever schema the
//! configuration file was written in (titled pages, legacy bare URLs, with or
//! without a slot count) is migrated into this type by the config store before
//! it reaches the controller.
//!
//! # Preconditions as types
//!
//! The engine requires a positive refresh interval and at least one slot per
//! surface.  Both fields use `NonZero*` integers so a `Config` that violates
//! them cannot be constructed; [`Config::new`] is the validating entry point
//! for raw user input.

use std::fmt;
use std::num::{NonZeroU64, NonZeroUsize};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::page::Page;

/// Default period between scheduler ticks, in milliseconds.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5000;

const DEFAULT_REFRESH_INTERVAL: NonZeroU64 = match NonZeroU64::new(DEFAULT_REFRESH_INTERVAL_MS) {
    Some(ms) => ms,
    None => panic!("default refresh interval must be non-zero"),
};

/// Errors raised when building a [`Config`] from raw values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("refresh interval must be a positive number of milliseconds")]
    ZeroRefreshInterval,

    #[error("slots per surface must be at least 1")]
    ZeroSlots,

    #[error("unknown display mode '{0}': expected 'single' or 'multi'")]
    UnknownMode(String),
}

/// How pages are spread over the available displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// One window that rotates through every page.
    #[default]
    Single,
    /// One window per monitor, each split into a grid of fixed slots.
    Multi,
}

impl DisplayMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Single => DisplayMode::Multi,
            DisplayMode::Multi => DisplayMode::Single,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Single => "single",
            DisplayMode::Multi => "multi",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(DisplayMode::Single),
            "multi" => Ok(DisplayMode::Multi),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Process-wide display configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pages in display order.
    pub pages: Vec<Page>,
    /// Period between ticks, shared by rotation (single) and reload (multi).
    pub refresh_interval_ms: NonZeroU64,
    pub mode: DisplayMode,
    /// Pages shown per monitor in multi mode.  Ignored in single mode.
    pub slots_per_surface: NonZeroUsize,
}

impl Config {
    /// Builds a config from raw integers, rejecting zero values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroRefreshInterval`] or [`ConfigError::ZeroSlots`].
    pub fn new(
        pages: Vec<Page>,
        refresh_interval_ms: u64,
        mode: DisplayMode,
        slots_per_surface: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            pages,
            refresh_interval_ms: NonZeroU64::new(refresh_interval_ms)
                .ok_or(ConfigError::ZeroRefreshInterval)?,
            mode,
            slots_per_surface: NonZeroUsize::new(slots_per_surface)
                .ok_or(ConfigError::ZeroSlots)?,
        })
    }

    /// The scheduler period as a [`Duration`].
    pub fn refresh_period(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.get())
    }

    /// Returns a copy that uses `mode` instead of the current display mode.
    pub fn with_mode(&self, mode: DisplayMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    /// Pages used when no configuration file exists yet.
    pub fn default_pages() -> Vec<Page> {
        vec![
            Page::new("Example 1", "https://example.com"),
            Page::new("Example 2", "https://example.org"),
            Page::new("Example 3", "https://example.net"),
        ]
    }

    pub fn default_refresh_interval() -> NonZeroU64 {
        DEFAULT_REFRESH_INTERVAL
    }

    pub fn default_slots_per_surface() -> NonZeroUsize {
        NonZeroUsize::MIN
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages: Self::default_pages(),
            refresh_interval_ms: Self::default_refresh_interval(),
            mode: DisplayMode::Single,
            slots_per_surface: Self::default_slots_per_surface(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_first_run_settings() {
        let cfg = Config::default();
        assert_eq!(cfg.pages.len(), 3);
        assert_eq!(cfg.pages[0], Page::new("Example 1", "https://example.com"));
        assert_eq!(cfg.refresh_interval_ms.get(), 5000);
        assert_eq!(cfg.mode, DisplayMode::Single);
        assert_eq!(cfg.slots_per_surface.get(), 1);
    }

    #[test]
    fn test_config_new_rejects_zero_interval() {
        assert_eq!(
            Config::new(vec![], 0, DisplayMode::Single, 1),
            Err(ConfigError::ZeroRefreshInterval)
        );
    }

    #[test]
    fn test_config_new_rejects_zero_slots() {
        assert_eq!(
            Config::new(vec![], 1000, DisplayMode::Multi, 0),
            Err(ConfigError::ZeroSlots)
        );
    }

    #[test]
    fn test_refresh_period_converts_milliseconds() {
        let cfg = Config::new(vec![], 1500, DisplayMode::Single, 1).expect("valid");
        assert_eq!(cfg.refresh_period(), Duration::from_millis(1500));
    }

    #[test]
    fn test_display_mode_parses_case_insensitively() {
        assert_eq!("Multi".parse::<DisplayMode>(), Ok(DisplayMode::Multi));
        assert_eq!(" single ".parse::<DisplayMode>(), Ok(DisplayMode::Single));
        assert!(matches!(
            "grid".parse::<DisplayMode>(),
            Err(ConfigError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_display_mode_toggles() {
        assert_eq!(DisplayMode::Single.toggled(), DisplayMode::Multi);
        assert_eq!(DisplayMode::Multi.toggled(), DisplayMode::Single);
    }

    #[test]
    fn test_with_mode_keeps_other_fields() {
        let cfg = Config::default();
        let multi = cfg.with_mode(DisplayMode::Multi);
        assert_eq!(multi.mode, DisplayMode::Multi);
        assert_eq!(multi.pages, cfg.pages);
        assert_eq!(multi.refresh_interval_ms, cfg.refresh_interval_ms);
    }
}
