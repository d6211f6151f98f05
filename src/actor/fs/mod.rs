//! FileSystem Watcher
//!
//! Watches the artifact's directory and posts matching changes to the host
//! actor. The notify callback never touches host state.
//!
//! Architecture:
//! ```text
//! notify callback → std mpsc → bridge thread (filter) → tokio mpsc → HostActor (debounce)
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

use super::messages::{HostMsg, ReloadEvent};

// Pure timing, applied on the consuming side.
mod debouncer;
// Base name + extension matching.
mod filter;


pub use debouncer::Debouncer;
pub use filter::ArtifactFilter;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watcher setup failed for `{}`: {reason}", dir.display())]
    SetupFailed { dir: PathBuf, reason: String },
}

/// Keeps the notify watcher alive. Dropping it stops watching and ends the
/// bridge thread.
pub struct FileWatcher {
    dir: PathBuf,
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Start watching the directory containing `artifact`.
    ///
    /// A missing directory is not created or retried; the caller degrades to
    /// manual reloads.
    pub fn spawn(artifact: &Path, host_tx: mpsc::Sender<HostMsg>) -> Result<Self, WatchError> {
        let dir = artifact
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        if !dir.is_dir() {
            return Err(WatchError::SetupFailed {
                dir,
                reason: "directory does not exist".to_string(),
            });
        }

        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })
        .map_err(|e| WatchError::SetupFailed {
            dir: dir.clone(),
            reason: e.to_string(),
        })?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::SetupFailed {
                dir: dir.clone(),
                reason: e.to_string(),
            })?;

        let filter = ArtifactFilter::for_artifact(artifact);
        std::thread::Builder::new()
            .name("hotframe-watch".into())
            .spawn(move || {
                while let Ok(result) = notify_rx.recv() {
                    match result {
                        Ok(event) => {
                            for reload in reload_events(&event, &filter, Instant::now()) {
                                if host_tx.blocking_send(HostMsg::FileChanged(reload)).is_err() {
                                    return; // Host stopped
                                }
                            }
                        }
                        Err(e) => crate::log!("watch"; "notify error: {}", e),
                    }
                }
            })
            .map_err(|e| WatchError::SetupFailed {
                dir: dir.clone(),
                reason: e.to_string(),
            })?;

        crate::log!("watch"; "watching {}", dir.display());
        Ok(Self {
            dir,
            _watcher: watcher,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Writes and creates of matching files. Metadata-only changes are noise.
pub(crate) fn reload_events(
    event: &notify::Event,
    filter: &ArtifactFilter,
    at: Instant,
) -> Vec<ReloadEvent> {
    use notify::EventKind;
    use notify::event::ModifyKind;

    match event.kind {
        EventKind::Create(_) => {}
        EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
        EventKind::Modify(_) => {}
        _ => return Vec::new(),
    }

    crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

    event
        .paths
        .iter()
        .filter(|path| filter.matches(path))
        .filter_map(|path| path.file_name())
        .map(|name| ReloadEvent {
            at,
            file_name: name.to_string_lossy().into_owned(),
        })
        .collect()
}
