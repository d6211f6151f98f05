//! Per-generation scratch copies of the artifact.
//!
//! The watched file is never opened directly. Each generation gets its own
//! `hotframe-gen<N>-<random>/` directory holding the artifact and its private
//! dependencies. A snapshot is only deleted after its context's unload
//! receipt has been presented, plus a configurable delay.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use tempfile::TempDir;

use super::{ModuleArtifact, ReloadError};
use crate::context::{ContextScope, Generation, UnloadReceipt};

const SNAPSHOT_PREFIX: &str = "hotframe-gen";

/// Scratch directories left by crashed runs are removed once this old.
pub const STALE_SNAPSHOT_AGE: Duration = Duration::from_secs(10 * 60);

/// One generation's private copy.
#[derive(Debug)]
pub struct Snapshot {
    generation: Generation,
    dir: TempDir,
    artifact: PathBuf,
    private_deps: Vec<PathBuf>,
}

impl Snapshot {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    pub fn scope(&self) -> ContextScope {
        ContextScope::new(self.dir.path(), self.private_deps.clone())
    }
}

#[derive(Debug)]
struct PendingDeletion {
    generation: Generation,
    /// `None` holds the directory until [`ScratchArea::flush`].
    due: Option<Instant>,
    dir: TempDir,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct ScratchArea {
    root: PathBuf,
    cleanup_delay: Duration,
    pending: Vec<PendingDeletion>,
}

impl ScratchArea {
    pub fn new(root: impl Into<PathBuf>, cleanup_delay: Duration) -> Self {
        Self {
            root: root.into(),
            cleanup_delay,
            pending: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Copy the artifact and its private dependencies into a fresh directory.
    pub fn capture(
        &self,
        generation: Generation,
        artifact: &ModuleArtifact,
        private_deps: &[&str],
    ) -> Result<Snapshot, ReloadError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            ReloadError::UnexpectedLoadFailure(format!(
                "cannot create scratch root {}: {e}",
                self.root.display()
            ))
        })?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("{SNAPSHOT_PREFIX}{}-", generation.get()))
            .tempdir_in(&self.root)
            .map_err(|e| {
                ReloadError::UnexpectedLoadFailure(format!("cannot create snapshot: {e}"))
            })?;

        let file_name = artifact
            .path()
            .file_name()
            .ok_or_else(|| ReloadError::ArtifactMissing(artifact.path().to_path_buf()))?;
        let copied = dir.path().join(file_name);
        fs::copy(artifact.path(), &copied).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ReloadError::ArtifactMissing(artifact.path().to_path_buf()),
            _ => ReloadError::UnexpectedLoadFailure(format!(
                "cannot copy {}: {e}",
                artifact.path().display()
            )),
        })?;

        let mut deps = Vec::with_capacity(private_deps.len());
        for name in private_deps {
            let source = artifact.dir().join(name);
            if !source.is_file() {
                return Err(ReloadError::UnexpectedLoadFailure(format!(
                    "private dependency `{name}` not found in {}",
                    artifact.dir().display()
                )));
            }
            let target = dir.path().join(name);
            fs::copy(&source, &target).map_err(|e| {
                ReloadError::UnexpectedLoadFailure(format!("cannot copy dependency `{name}`: {e}"))
            })?;
            deps.push(target);
        }

        crate::debug!("scratch"; "{} snapshot at {}", generation, dir.path().display());
        Ok(Snapshot {
            generation,
            dir,
            artifact: copied,
            private_deps: deps,
        })
    }

    /// Schedule deletion of `snapshot`. Requires its own context's receipt.
    ///
    /// A foreign receipt or one reporting close failures keeps the directory
    /// until [`ScratchArea::flush`].
    pub fn retire(&mut self, snapshot: Snapshot, receipt: &UnloadReceipt, now: Instant) {
        let Snapshot {
            generation, dir, ..
        } = snapshot;

        let due = if receipt.generation() != generation {
            crate::log!("error"; "unload receipt {} does not match snapshot {}", receipt.generation(), generation);
            None
        } else if !receipt.is_clean() {
            crate::log!("error"; "{} did not close cleanly: {}", generation, receipt.failures().join("; "));
            None
        } else {
            Some(now + self.cleanup_delay)
        };

        self.pending.push(PendingDeletion { generation, due, dir });
        if self.cleanup_delay.is_zero() {
            self.reap_due(now);
        }
    }

    /// Delete every snapshot whose delay has elapsed.
    pub fn reap_due(&mut self, now: Instant) -> usize {
        let (due, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due.is_some_and(|at| at <= now));
        self.pending = keep;
        due.into_iter().map(Self::delete).filter(|ok| *ok).count()
    }

    /// Delete everything still pending, regardless of delay.
    pub fn flush(&mut self) -> usize {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(Self::delete)
            .filter(|ok| *ok)
            .count()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().filter_map(|p| p.due).min()
    }

    fn delete(pending: PendingDeletion) -> bool {
        let path = pending.dir.path().to_path_buf();
        match pending.dir.close() {
            Ok(()) => {
                crate::debug!("scratch"; "deleted {} snapshot {}", pending.generation, path.display());
                true
            }
            Err(e) => {
                crate::log!("scratch"; "failed to delete {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Remove snapshot directories older than `max_age` left by earlier runs.
    pub fn sweep_stale(&self, max_age: Duration) -> SweepReport {
        let mut report = SweepReport::default();
        let Ok(entries) = fs::read_dir(&self.root) else {
            return report;
        };

        let now = SystemTime::now();
        for entry in entries.flatten() {
            let name = entry.file_name();
            if !name.to_string_lossy().starts_with(SNAPSHOT_PREFIX) {
                continue;
            }
            let Ok(meta) = entry.metadata() else { continue };
            if !meta.is_dir() {
                continue;
            }
            report.scanned += 1;

            let age = meta
                .modified()
                .ok()
                .and_then(|m| now.duration_since(m).ok())
                .unwrap_or_default();
            if age < max_age {
                continue;
            }
            match fs::remove_dir_all(entry.path()) {
                Ok(()) => report.deleted += 1,
                Err(_) => report.failed += 1,
            }
        }
        report
    }
}
