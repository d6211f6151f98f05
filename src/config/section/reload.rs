//! `[reload]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [reload]
//! scratch_dir = "~/.cache/hotframe"    # Where per-generation copies go
//! cleanup_delay_ms = 5000              # Delay after unload before deleting a copy
//! dependencies = ["libwidgets.so"]     # Sibling libraries the app module needs
//! shared_prefixes = ["libstd-"]        # Names resolved once by the process loader
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::DependencyPolicy;

/// Scratch copies and dependency resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Scratch root. Defaults to `<tmp>/hotframe`.
    pub scratch_dir: Option<PathBuf>,

    /// Delay between a generation's unload and deletion of its copy.
    pub cleanup_delay_ms: u64,

    /// Library files next to the artifact the app module depends on.
    pub dependencies: Vec<String>,

    /// File name prefixes of shared/platform libraries.
    pub shared_prefixes: Vec<String>,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            cleanup_delay_ms: 5000,
            dependencies: Vec::new(),
            shared_prefixes: DependencyPolicy::default_shared_prefixes(),
        }
    }
}

impl ReloadConfig {
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("hotframe"))
    }

    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.cleanup_delay_ms)
    }

    pub fn policy(&self) -> DependencyPolicy {
        DependencyPolicy::new(&self.shared_prefixes)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::context::Resolution;

    #[test]
    fn test_reload_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.reload.cleanup_delay_ms, 5000);
        assert!(config.reload.dependencies.is_empty());
        assert!(config.reload.scratch_root().ends_with("hotframe"));
        assert_eq!(
            config.reload.policy().classify("libstd-123.so"),
            Resolution::Shared
        );
    }

    #[test]
    fn test_reload_custom_policy() {
        let config = test_parse_config(
            "[reload]\ncleanup_delay_ms = 0\ndependencies = [\"libwidgets.so\"]\nshared_prefixes = [\"libframework\"]",
        );
        assert_eq!(config.reload.cleanup_delay_ms, 0);
        assert_eq!(config.reload.dependencies, vec!["libwidgets.so"]);
        let policy = config.reload.policy();
        assert_eq!(policy.classify("libframework_ui.so"), Resolution::Shared);
        assert_eq!(policy.classify("libstd-123.so"), Resolution::Private);
    }
}
