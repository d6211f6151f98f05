//! Isolated module contexts.
//!
//! One [`IsolatedModuleContext`] per generation. It is bound at construction
//! to one artifact snapshot ([`ContextScope`]) and exposes only `load` (by
//! path) and `unload`. `unload` consumes the context, so it can never be
//! reused for another generation, and everything borrowed from it must be
//! gone before it can be called.
//!
//! ```text
//! process loader (persistent parent)      shared/platform libraries
//!         │
//!         └── IsolatedModuleContext g7    private deps + artifact snapshot
//!                 └── ModuleImage ──▶ GuestRoot (copied out)
//! ```
//!
//! The actual opening of images sits behind [`ModuleBackend`]; production
//! uses [`DylibBackend`], tests use a fake.

mod dylib;
mod error;
mod policy;
#[cfg(test)]
pub mod testing;

use std::fmt;
use std::path::{Path, PathBuf};

use hotframe_guest::Visual;

pub use dylib::DylibBackend;
pub use error::ContextError;
pub use policy::DependencyPolicy;
#[cfg(test)]
pub use policy::Resolution;

/// Monotonic generation id. One per reload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Root extracted from a guest: title and inner content, fully owned by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestRoot {
    pub title: String,
    pub content: Visual,
}

/// Opens module images. The seam between the orchestrator and the platform loader.
pub trait ModuleBackend: Clone {
    type Image: ModuleImage;

    fn open(&self, path: &Path) -> Result<Self::Image, ContextError>;
}

/// A module image opened inside a context.
pub trait ModuleImage {
    fn path(&self) -> &Path;

    /// Instantiate the designated root through the fixed entry contract and
    /// copy its title and content out of the image.
    fn instantiate_root(&self) -> Result<GuestRoot, ContextError>;

    /// Close the image. After this returns no code or data of the image is reachable.
    fn close(self) -> Result<(), ContextError>;
}

/// The snapshot a context is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextScope {
    root: PathBuf,
    private_deps: Vec<PathBuf>,
}

impl ContextScope {
    pub fn new(root: impl Into<PathBuf>, private_deps: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            private_deps,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn private_deps(&self) -> &[PathBuf] {
        &self.private_deps
    }

    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

/// Proof that a context was unloaded. Required to retire its snapshot.
#[derive(Debug)]
pub struct UnloadReceipt {
    generation: Generation,
    closed: usize,
    failures: Vec<String>,
}

impl UnloadReceipt {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn closed(&self) -> usize {
        self.closed
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One generation's unloadable loading boundary.
pub struct IsolatedModuleContext<B: ModuleBackend> {
    generation: Generation,
    collectible: bool,
    scope: ContextScope,
    backend: B,
    /// Load order; closed in reverse.
    images: Vec<B::Image>,
    deps_loaded: bool,
}

impl<B: ModuleBackend> IsolatedModuleContext<B> {
    pub fn new(generation: Generation, scope: ContextScope, backend: B) -> Self {
        crate::debug!("context"; "create {} scoped to {}", generation, scope.root().display());
        Self {
            generation,
            collectible: true,
            scope,
            backend,
            images: Vec::new(),
            deps_loaded: false,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_collectible(&self) -> bool {
        self.collectible
    }

    pub fn scope(&self) -> &ContextScope {
        &self.scope
    }

    pub fn loaded_count(&self) -> usize {
        self.images.len()
    }

    /// Load a module image by path.
    ///
    /// The first load also opens the scope's private dependencies so they
    /// resolve inside this generation. Shared dependencies are never opened
    /// here; the process loader resolves them once for every generation.
    pub fn load(&mut self, path: &Path) -> Result<&B::Image, ContextError> {
        if !self.scope.contains(path) {
            return Err(ContextError::OutOfScope {
                path: path.to_path_buf(),
                scope: self.scope.root().to_path_buf(),
            });
        }

        if !self.deps_loaded {
            for dep in &self.scope.private_deps {
                let image = self.backend.open(dep)?;
                crate::debug!("context"; "{} private dep {}", self.generation, dep.display());
                self.images.push(image);
            }
            self.deps_loaded = true;
        }

        let image = self.backend.open(path)?;
        crate::debug!("context"; "{} loaded {}", self.generation, path.display());
        self.images.push(image);
        Ok(&self.images[self.images.len() - 1])
    }

    /// Close every image in reverse load order and hand back the receipt.
    pub fn unload(self) -> UnloadReceipt {
        let Self {
            generation,
            mut images,
            ..
        } = self;

        let mut closed = 0;
        let mut failures = Vec::new();
        while let Some(image) = images.pop() {
            match image.close() {
                Ok(()) => closed += 1,
                Err(e) => failures.push(e.to_string()),
            }
        }

        crate::debug!("context"; "unloaded {} ({} image(s))", generation, closed);
        UnloadReceipt {
            generation,
            closed,
            failures,
        }
    }
}
