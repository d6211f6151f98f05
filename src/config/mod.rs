//! Host configuration management for `hotframe.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── artifact   # [artifact]
//! │   ├── reload     # [reload]
//! │   └── watch      # [watch]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── path       # PathResolver
//! └── mod.rs         # HostConfig (this file)
//! ```
//!
//! The config file is optional: without one every section uses its defaults
//! and paths resolve against the current directory.
//!
//! # Sections
//!
//! | Section      | Purpose                                        |
//! |--------------|------------------------------------------------|
//! | `[artifact]` | App module name or explicit path               |
//! | `[watch]`    | Watcher toggle, debounce window, settle delay  |
//! | `[reload]`   | Scratch directory, cleanup delay, dependencies |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{ArtifactConfig, ReloadConfig, WatchConfig};
pub use types::{ConfigError, PathResolver};

use crate::{
    cli::{Cli, Commands, HostArgs},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing hotframe.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Resolved artifact path (internal use only)
    #[serde(skip)]
    pub artifact_path: PathBuf,

    /// App module location
    #[serde(default)]
    pub artifact: ArtifactConfig,

    /// File watcher settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Scratch copies and dependency policy
    #[serde(default)]
    pub reload: ReloadConfig,
}

impl HostConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Relative paths resolve
    /// against the config file's directory, or cwd without one.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, root) = match find_config_file(&cli.config) {
            Some(path) => {
                let root = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.clone());
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(crate::utils::path::normalize_path(&path));
                (config, root)
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                (Self::default(), cwd.clone())
            }
        };

        config.finalize(cli, &PathResolver::for_current_exe(&root), &root, &cwd);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored): {}", display_path, fields.join(", "));
    }

    /// Apply CLI overrides and resolve paths.
    ///
    /// Paths from the config file are relative to `root` (its directory),
    /// paths from the command line to `cwd`.
    fn finalize(&mut self, cli: &Cli, resolver: &PathResolver, root: &Path, cwd: &Path) {
        self.apply_command_options(cli, cwd);

        if let Some(dir) = self.reload.scratch_dir.take() {
            self.reload.scratch_dir = Some(crate::utils::path::resolve_path(&dir, root));
        }
        self.artifact_path = resolver.artifact_path(&self.artifact.name, self.artifact.path.as_deref());
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        self.apply_host_args(cli.host_args(), cwd);
        match &cli.command {
            Commands::Run {
                watch,
                debounce_ms,
                settle_ms,
                ..
            } => {
                Self::update_option(&mut self.watch.enable, watch.as_ref());
                Self::update_option(&mut self.watch.debounce_ms, debounce_ms.as_ref());
                Self::update_option(&mut self.watch.settle_ms, settle_ms.as_ref());
            }
            Commands::Check { .. } => {
                self.watch.enable = false;
            }
        }
    }

    /// Apply shared host arguments from CLI.
    fn apply_host_args(&mut self, args: &HostArgs, cwd: &Path) {
        // Set verbose mode globally
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.artifact.name, args.name.as_ref());
        if let Some(path) = &args.artifact {
            self.artifact.path = Some(crate::utils::path::resolve_path(path, cwd));
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.artifact.name.trim();
        if self.artifact.path.is_none() && name.is_empty() {
            return Err(ConfigError::Validation(
                "[artifact] name must not be empty".into(),
            ));
        }
        if name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "[artifact] name `{name}` must be a crate name, not a path (use `path` instead)"
            )));
        }
        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "[watch] debounce_ms must be positive".into(),
            ));
        }
        if let Some(dep) = self.reload.dependencies.iter().find(|d| d.contains(['/', '\\'])) {
            return Err(ConfigError::Validation(format!(
                "[reload] dependency `{dep}` must be a file name next to the artifact"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> HostConfig {
    let (parsed, ignored) = HostConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Config file in `/project`, invoked from `/project/app`.
    fn finalize(content: &str, args: &[&str]) -> HostConfig {
        let cli = Cli::parse_from(args);
        let mut config = test_parse_config(content);
        let resolver = PathResolver::new("/project", "/project/target/debug");
        config.finalize(&cli, &resolver, Path::new("/project"), Path::new("/project/app"));
        config
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result: Result<HostConfig, _> = toml::from_str("[artifact\nname = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let (config, ignored) =
            HostConfig::parse_with_ignored("[watch]\nsettle_ms = 10\n[server]\nport = 1").unwrap();
        assert_eq!(config.watch.settle_ms, 10);
        assert!(ignored.iter().any(|f| f.contains("server")));
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = finalize(
            "[watch]\ndebounce_ms = 2000\nenable = true",
            &["hotframe", "run", "--debounce-ms", "300", "--watch", "false"],
        );
        assert_eq!(config.watch.debounce_ms, 300);
        assert!(!config.watch.enable);
        assert_eq!(config.watch.settle_ms, 500);
    }

    #[test]
    fn test_check_disables_watch() {
        let config = finalize("", &["hotframe", "check"]);
        assert!(!config.watch.enable);
    }

    #[test]
    fn test_explicit_artifact_resolves_against_root() {
        let config = finalize(
            "[artifact]\npath = \"out/libapp.so\"",
            &["hotframe", "run"],
        );
        assert_eq!(config.artifact_path, PathBuf::from("/project/out/libapp.so"));

        let config = finalize("", &["hotframe", "run", "--artifact", "/abs/libx.so"]);
        assert_eq!(config.artifact_path, PathBuf::from("/abs/libx.so"));
    }

    #[test]
    fn test_cli_artifact_resolves_against_cwd() {
        let config = finalize(
            "[artifact]\npath = \"out/libapp.so\"",
            &["hotframe", "run", "--artifact", "target/debug/libapp.so"],
        );
        assert_eq!(
            config.artifact_path,
            PathBuf::from("/project/app/target/debug/libapp.so")
        );
    }

    #[test]
    fn test_name_override() {
        let config = finalize("", &["hotframe", "run", "--name", "my-app"]);
        assert!(config.artifact_path.starts_with("/project/target/debug"));
        assert!(config.artifact_path.to_string_lossy().contains("my_app"));
    }

    #[test]
    fn test_validation() {
        assert!(test_parse_config("").validate().is_ok());
        assert!(test_parse_config("[artifact]\nname = \"\"").validate().is_err());
        assert!(test_parse_config("[artifact]\nname = \"a/b\"").validate().is_err());
        assert!(test_parse_config("[watch]\ndebounce_ms = 0").validate().is_err());
        assert!(
            test_parse_config("[reload]\ndependencies = [\"../x.so\"]")
                .validate()
                .is_err()
        );
    }
}
