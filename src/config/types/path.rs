//! Artifact path resolution.
//!
//! ```text
//! [artifact] path = "..."   → <config dir>/<path>            (explicit wins)
//! [artifact] name = "my-app" → <host exe dir>/libmy_app.so   (platform naming)
//! ```

use std::path::{Path, PathBuf};

use crate::utils::path::{library_file_name, normalize_path, resolve_path};

/// Computes where the app module library is expected on disk.
#[derive(Debug, Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
    exe_dir: PathBuf,
}

impl PathResolver {
    pub fn new(base_dir: impl Into<PathBuf>, exe_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            exe_dir: exe_dir.into(),
        }
    }

    /// Resolver rooted at `base_dir`, looking next to the running executable.
    pub fn for_current_exe(base_dir: &Path) -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| base_dir.to_path_buf());
        Self::new(base_dir, exe_dir)
    }

    pub fn artifact_path(&self, name: &str, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => resolve_path(path, &self.base_dir),
            None => normalize_path(&self.exe_dir.join(library_file_name(name))),
        }
    }
}
