//! The watched build output.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::context::Generation;

/// Produced by the guest build; read-only here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleArtifact {
    path: PathBuf,
    last_modified: Option<SystemTime>,
    generation: Option<Generation>,
}

impl ModuleArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_modified: None,
            generation: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    /// Generation that last snapshotted this artifact.
    pub fn generation(&self) -> Option<Generation> {
        self.generation
    }

    /// Record the current modification time for `generation`.
    pub fn observe(&mut self, generation: Generation) {
        self.last_modified = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok();
        self.generation = Some(generation);
    }

    /// Directory siblings (private dependencies) are looked up in.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_observe_records_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("libdemo.so");
        let mut artifact = ModuleArtifact::new(&path);
        assert!(!artifact.exists());

        std::fs::write(&path, b"x").unwrap();
        assert!(artifact.exists());
        artifact.observe(Generation::new(4));
        assert!(artifact.last_modified().is_some());
        assert_eq!(artifact.generation(), Some(Generation::new(4)));
        assert_eq!(artifact.dir(), dir.path());
    }
}
