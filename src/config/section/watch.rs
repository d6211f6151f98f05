//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! enable = true          # Reload automatically when the library is rebuilt
//! debounce_ms = 1000     # Drop triggers this long after an accepted one
//! settle_ms = 500        # Let the build finish writing before reloading
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// File watcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Enable the artifact watcher.
    pub enable: bool,

    /// Debounce window, measured from the last accepted trigger.
    pub debounce_ms: u64,

    /// Delay between an accepted trigger and the reload.
    pub settle_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enable: true,
            debounce_ms: 1000,
            settle_ms: 500,
        }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
