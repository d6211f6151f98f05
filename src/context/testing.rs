//! In-process fake of the platform loader for tests, plus the real demo
//! guest for tests that go through [`DylibBackend`](super::DylibBackend).
//!
//! A fake "library" is a file holding a JSON [`FakeGuest`]. Any other content
//! opens fine but exports no entry point, which is how private dependencies
//! are modelled.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, OnceLock};

use hotframe_guest::{HOTFRAME_ABI_VERSION, HOTFRAME_ENTRY_SYMBOL, Visual};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{ContextError, GuestRoot, ModuleBackend, ModuleImage};

/// Build `demos/hello` once per test run and return its cdylib.
///
/// Uses its own target directory so it never waits on the build lock of
/// the running test.
pub fn demo_library() -> &'static Path {
    static DEMO: OnceLock<PathBuf> = OnceLock::new();
    DEMO.get_or_init(|| {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let target = root.join("target").join("guest-fixtures");
        let status = Command::new(env!("CARGO"))
            .args(["build", "--quiet", "--offline", "-p", "hotframe-demo", "--target-dir"])
            .arg(&target)
            .current_dir(root)
            .status()
            .unwrap();
        assert!(status.success(), "building hotframe-demo failed");
        target
            .join("debug")
            .join(crate::utils::path::library_file_name("hotframe-demo"))
    })
}

/// Copy the demo guest to `dir` under the name the host would watch.
pub fn install_demo(dir: &Path) -> PathBuf {
    let path = dir.join(crate::utils::path::library_file_name("hotframe-demo"));
    std::fs::copy(demo_library(), &path).unwrap();
    path
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FakeFailure {
    NoEntry,
    AbiMismatch,
    Constructor { message: String },
    BadContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeGuest {
    pub title: String,
    #[serde(default)]
    pub content: Option<Visual>,
    #[serde(default)]
    pub fail: Option<FakeFailure>,
}

impl FakeGuest {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Some(Visual::text(format!("{title} content"))),
            fail: None,
        }
    }

    pub fn failing(failure: FakeFailure) -> Self {
        Self {
            fail: Some(failure),
            ..Self::titled("Broken")
        }
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, serde_json::to_vec(self).unwrap()).unwrap();
    }
}

#[derive(Debug, Default)]
struct FakeLog {
    opened: Vec<PathBuf>,
    closed: Vec<PathBuf>,
    /// Live image count per containing directory (one directory per snapshot).
    live: HashMap<PathBuf, usize>,
    /// Opens that happened while another snapshot still had live images.
    overlaps: usize,
    /// Closes whose backing file had already been deleted.
    deleted_while_open: usize,
}

/// Shared log so tests can inspect what a backend clone did.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    log: Arc<Mutex<FakeLog>>,
}

impl FakeBackend {
    pub fn opened(&self) -> Vec<PathBuf> {
        self.log.lock().opened.clone()
    }

    pub fn closed_order(&self) -> Vec<PathBuf> {
        self.log.lock().closed.clone()
    }

    pub fn live_images(&self) -> usize {
        self.log.lock().live.values().sum()
    }

    pub fn overlaps(&self) -> usize {
        self.log.lock().overlaps
    }

    pub fn deleted_while_open(&self) -> usize {
        self.log.lock().deleted_while_open
    }
}

fn scope_key(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

impl ModuleBackend for FakeBackend {
    type Image = FakeImage;

    fn open(&self, path: &Path) -> Result<FakeImage, ContextError> {
        let bytes = std::fs::read(path).map_err(|e| ContextError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let guest = serde_json::from_slice::<FakeGuest>(&bytes).ok();

        let mut log = self.log.lock();
        let key = scope_key(path);
        if log.live.iter().any(|(dir, n)| *dir != key && *n > 0) {
            log.overlaps += 1;
        }
        *log.live.entry(key).or_default() += 1;
        log.opened.push(path.to_path_buf());
        drop(log);

        Ok(FakeImage {
            path: path.to_path_buf(),
            guest,
            log: Arc::clone(&self.log),
        })
    }
}

pub struct FakeImage {
    path: PathBuf,
    guest: Option<FakeGuest>,
    log: Arc<Mutex<FakeLog>>,
}

impl ModuleImage for FakeImage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn instantiate_root(&self) -> Result<GuestRoot, ContextError> {
        let Some(guest) = &self.guest else {
            return Err(ContextError::EntryMissing {
                path: self.path.clone(),
                symbol: HOTFRAME_ENTRY_SYMBOL,
            });
        };

        match &guest.fail {
            Some(FakeFailure::NoEntry) => Err(ContextError::EntryMissing {
                path: self.path.clone(),
                symbol: HOTFRAME_ENTRY_SYMBOL,
            }),
            Some(FakeFailure::AbiMismatch) => Err(ContextError::AbiMismatch {
                path: self.path.clone(),
                guest: HOTFRAME_ABI_VERSION + 1,
                host: HOTFRAME_ABI_VERSION,
            }),
            Some(FakeFailure::Constructor { message }) => {
                Err(ContextError::Constructor(message.clone()))
            }
            Some(FakeFailure::BadContent) => Err(ContextError::Content(
                "expected value at line 1 column 1".to_string(),
            )),
            None => Ok(GuestRoot {
                title: guest.title.clone(),
                content: guest.content.clone().unwrap_or_default(),
            }),
        }
    }

    fn close(self) -> Result<(), ContextError> {
        let mut log = self.log.lock();
        if !self.path.exists() {
            log.deleted_while_open += 1;
        }
        if let Some(n) = log.live.get_mut(&scope_key(&self.path)) {
            *n = n.saturating_sub(1);
        }
        log.closed.push(self.path);
        Ok(())
    }
}
