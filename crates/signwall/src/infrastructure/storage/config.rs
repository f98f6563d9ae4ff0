//! File-based configuration persistence.
//!
//! Reads and writes the engine [`Config`] to the platform-appropriate file:
//! - Windows:  `%APPDATA%\Signwall\config.toml`
//! - Linux:    `~/.config/signwall/config.toml` (or `$XDG_CONFIG_HOME/signwall`)
//! - macOS:    `~/Library/Application Support/Signwall/config.toml`
//!
//! # Formats
//!
//! The format follows the file extension.  `.json` files are read and written
//! as JSON, which keeps `config.json` files from older deployments working
//! unchanged.  Every other extension is TOML:
//!
//! ```toml
//! version = 2
//! refresh_interval = 5000
//! mode = "multi"
//! slots_per_screen = 4
//!
//! [[pages]]
//! title = "Dashboard"
//! url = "grafana.example/d/ops"
//! ```
//!
//! # Migration (for beginners)
//!
//! The file on disk is read into a loose [`ConfigRecord`] where every field is
//! optional.  [`migrate`] then turns that record into the strict [`Config`]
//! the engine uses, filling each missing or invalid field from its default on
//! its own.  One bad field never throws away the rest of the file.
//!
//! Older files list bare URLs under `urls` instead of titled `pages`.  Those
//! become untitled pages.  When both keys are present, `pages` wins.  Saving
//! always writes the current schema (`version = 2`, `pages`), so a legacy file
//! is upgraded the first time the user saves.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use signwall_core::{Config, DisplayMode, Page};
use thiserror::Error;
use tracing::{info, warn};

use crate::application::settings::{ConfigStore, ConfigStoreError};

/// Schema version written by [`FileConfigStore::save`].
pub const CONFIG_VERSION: u32 = 2;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("failed to parse config JSON: {0}")]
    ParseJson(#[source] serde_json::Error),

    #[error("failed to serialize config to TOML: {0}")]
    SerializeToml(#[from] toml::ser::Error),

    #[error("failed to serialize config to JSON: {0}")]
    SerializeJson(#[source] serde_json::Error),
}

// ── On-disk schema ────────────────────────────────────────────────────────────

/// The configuration file as written, before validation.
///
/// Integers are signed so that a negative value reads as "invalid" and falls
/// back to its default instead of failing the whole file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots_per_screen: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<Page>>,
    /// Legacy schema: bare URLs without titles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
}

impl From<&Config> for ConfigRecord {
    fn from(config: &Config) -> Self {
        Self {
            version: Some(CONFIG_VERSION),
            refresh_interval: Some(
                i64::try_from(config.refresh_interval_ms.get()).unwrap_or(i64::MAX),
            ),
            mode: Some(config.mode.as_str().to_string()),
            slots_per_screen: Some(
                i64::try_from(config.slots_per_surface.get()).unwrap_or(i64::MAX),
            ),
            pages: Some(config.pages.clone()),
            urls: None,
        }
    }
}

/// Converts an on-disk record into a valid [`Config`].
///
/// Each field is resolved independently; anything missing or invalid takes
/// its default, with a warning for the invalid ones.
pub fn migrate(record: ConfigRecord) -> Config {
    let defaults = Config::default();

    if let Some(version) = record.version {
        if version > CONFIG_VERSION {
            warn!(version, "config file is from a newer version; reading known fields only");
        }
    }

    let pages = match (record.pages, record.urls) {
        (Some(pages), _) => pages,
        (None, Some(urls)) => {
            info!(count = urls.len(), "migrating legacy url list to pages");
            urls.into_iter().map(Page::untitled).collect()
        }
        (None, None) => defaults.pages,
    };

    let refresh_interval_ms = match record.refresh_interval {
        None => defaults.refresh_interval_ms,
        Some(raw) => match u64::try_from(raw).ok().and_then(std::num::NonZeroU64::new) {
            Some(ms) => ms,
            None => {
                warn!(value = raw, "invalid refresh_interval; using default");
                defaults.refresh_interval_ms
            }
        },
    };

    let mode = match record.mode {
        None => defaults.mode,
        Some(raw) => raw.parse::<DisplayMode>().unwrap_or_else(|e| {
            warn!("{e}; using default mode");
            defaults.mode
        }),
    };

    let slots_per_surface = match record.slots_per_screen {
        None => defaults.slots_per_surface,
        Some(raw) => match usize::try_from(raw).ok().and_then(std::num::NonZeroUsize::new) {
            Some(slots) => slots,
            None => {
                warn!(value = raw, "invalid slots_per_screen; using default");
                defaults.slots_per_surface
            }
        },
    };

    Config {
        pages,
        refresh_interval_ms,
        mode,
        slots_per_surface,
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the default path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

/// Reads and writes the configuration at a fixed path.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformConfigDir`] when no config directory
    /// can be determined.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(config_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, returning `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system errors other than "not
    /// found", and a parse error if the file is malformed.
    pub fn try_load(&self) -> Result<Option<Config>, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let record: ConfigRecord = match Format::of(&self.path) {
            Format::Toml => toml::from_str(&content)?,
            Format::Json => serde_json::from_str(&content).map_err(ConfigError::ParseJson)?,
        };
        Ok(Some(migrate(record)))
    }

    /// Persists `config`, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system failures or a serialize
    /// error if encoding fails.
    pub fn try_save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let record = ConfigRecord::from(config);
        let content = match Format::of(&self.path) {
            Format::Toml => toml::to_string_pretty(&record)?,
            Format::Json => {
                serde_json::to_string_pretty(&record).map_err(ConfigError::SerializeJson)?
            }
        };
        std::fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(Some(config)) => {
                info!(
                    path = %self.path.display(),
                    pages = config.pages.len(),
                    "configuration loaded"
                );
                config
            }
            Ok(None) => {
                info!(path = %self.path.display(), "no configuration file; using defaults");
                Config::default()
            }
            Err(e) => {
                warn!("{e}; using default configuration");
                Config::default()
            }
        }
    }

    fn save(&self, config: &Config) -> Result<(), ConfigStoreError> {
        self.try_save(config)
            .map_err(|e| ConfigStoreError::Persist(e.to_string()))?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}

/// Resolves the platform config base directory, including the `Signwall` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Signwall"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("signwall"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Signwall")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
