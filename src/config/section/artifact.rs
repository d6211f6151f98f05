//! `[artifact]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [artifact]
//! name = "my-app"                              # Crate name, resolved next to the host
//! path = "target/debug/libmy_app.so"           # Or an explicit path (wins over name)
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// App module location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Crate/library base name. `-` is mapped to `_` like cargo does.
    pub name: String,

    /// Explicit library path, relative to the config file directory.
    pub path: Option<PathBuf>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            name: "hotframe_demo".to_string(),
            path: None,
        }
    }
}
