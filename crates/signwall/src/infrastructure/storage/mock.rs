//! In-memory configuration store for unit testing.

use std::sync::Mutex;

use signwall_core::Config;

use crate::application::settings::{ConfigStore, ConfigStoreError};

/// A [`ConfigStore`] that keeps the last saved config in memory.
pub struct MemoryConfigStore {
    stored: Mutex<Option<Config>>,
    save_count: Mutex<u32>,
    /// When `true`, every `save()` fails.
    pub should_fail: bool,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self {
            stored: Mutex::new(None),
            save_count: Mutex::new(0),
            should_fail: false,
        }
    }

    /// Creates a store that already holds `config`.
    pub fn with_config(config: Config) -> Self {
        Self {
            stored: Mutex::new(Some(config)),
            ..Self::new()
        }
    }

    /// Creates a store whose `save()` always fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    /// The last successfully saved (or preloaded) config.
    pub fn stored(&self) -> Option<Config> {
        self.stored.lock().expect("lock poisoned").clone()
    }

    /// Number of `save()` calls, failed ones included.
    pub fn save_count(&self) -> u32 {
        *self.save_count.lock().expect("lock poisoned")
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        self.stored().unwrap_or_default()
    }

    fn save(&self, config: &Config) -> Result<(), ConfigStoreError> {
        *self.save_count.lock().expect("lock poisoned") += 1;
        if self.should_fail {
            return Err(ConfigStoreError::Persist("disk full".to_string()));
        }
        *self.stored.lock().expect("lock poisoned") = Some(config.clone());
        Ok(())
    }
}
