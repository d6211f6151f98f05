//! The reload state machine.
//!
//! ```text
//! Idle/Mounted ─▶ Unloading ─▶ Loading ─┬─▶ Mounted(gN)
//!                                       └─▶ Failed
//! ```
//!
//! Unload-before-load is enforced here and only here: the previous context
//! is consumed by `unload` before a new one is constructed, so two
//! generations are never reachable at the same time.

use std::time::Instant;

use super::snapshot::{STALE_SNAPSHOT_AGE, ScratchArea, Snapshot, SweepReport};
use super::{ModuleArtifact, ReloadError};
use crate::context::{
    DependencyPolicy, Generation, IsolatedModuleContext, ModuleBackend, ModuleImage, UnloadReceipt,
};
use crate::log;
use crate::view::{ContentHost, GuestRootHandle, HostStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
    Idle,
    Unloading,
    Loading,
    Mounted(Generation),
    Failed,
}

/// Context and snapshot of the live generation. The context is dropped
/// before the snapshot.
struct ActiveGeneration<B: ModuleBackend> {
    context: IsolatedModuleContext<B>,
    snapshot: Snapshot,
}

pub struct ReloadOrchestrator<B: ModuleBackend> {
    artifact: ModuleArtifact,
    backend: B,
    policy: DependencyPolicy,
    dependencies: Vec<String>,
    scratch: ScratchArea,
    state: ReloadState,
    last_generation: u64,
    active: Option<ActiveGeneration<B>>,
}

impl<B: ModuleBackend> ReloadOrchestrator<B> {
    pub fn new(
        artifact: ModuleArtifact,
        backend: B,
        policy: DependencyPolicy,
        dependencies: Vec<String>,
        scratch: ScratchArea,
    ) -> Self {
        Self {
            artifact,
            backend,
            policy,
            dependencies,
            scratch,
            state: ReloadState::Idle,
            last_generation: 0,
            active: None,
        }
    }

    pub fn state(&self) -> ReloadState {
        self.state
    }

    pub fn artifact(&self) -> &ModuleArtifact {
        &self.artifact
    }

    pub fn active_generation(&self) -> Option<Generation> {
        self.active.as_ref().map(|a| a.context.generation())
    }

    pub fn has_active_context(&self) -> bool {
        self.active.is_some()
    }

    /// Last generation id handed out, including failed attempts.
    pub fn last_generation(&self) -> Option<Generation> {
        (self.last_generation > 0).then(|| Generation::new(self.last_generation))
    }

    pub fn scratch(&self) -> &ScratchArea {
        &self.scratch
    }

    pub fn sweep_stale_snapshots(&self) -> SweepReport {
        let report = self.scratch.sweep_stale(STALE_SNAPSHOT_AGE);
        if report.deleted > 0 || report.failed > 0 {
            log!("scratch"; "removed {} stale snapshot(s), {} failed", report.deleted, report.failed);
        }
        report
    }

    /// Run one full reload cycle. Failures are shown in `host` and returned
    /// for the caller's information only.
    pub fn reload(&mut self, host: &mut ContentHost, now: Instant) -> Result<Generation, ReloadError> {
        self.state = ReloadState::Unloading;
        drop(host.unmount());
        self.teardown(now);

        self.state = ReloadState::Loading;
        if !self.artifact.exists() {
            return self.fail(host, ReloadError::ArtifactMissing(self.artifact.path().to_path_buf()));
        }

        self.last_generation += 1;
        let generation = Generation::new(self.last_generation);
        log!("host"; "loading app module {} from {}", generation, self.artifact.path().display());

        let private = self.policy.private_only(&self.dependencies);
        let snapshot = match self.scratch.capture(generation, &self.artifact, &private) {
            Ok(snapshot) => snapshot,
            Err(e) => return self.fail(host, e),
        };
        self.artifact.observe(generation);

        let mut context = IsolatedModuleContext::new(generation, snapshot.scope(), self.backend.clone());
        let root = context
            .load(snapshot.artifact())
            .and_then(|image| image.instantiate_root());

        match root {
            Ok(root) => {
                host.mount(GuestRootHandle::new(generation, root));
                log!("host"; "app loaded: {} (load #{})", host.chrome().window_title(), host.chrome().load_count());
                self.active = Some(ActiveGeneration { context, snapshot });
                self.state = ReloadState::Mounted(generation);
                Ok(generation)
            }
            Err(e) => {
                let receipt = context.unload();
                self.scratch.retire(snapshot, &receipt, now);
                self.fail(host, e.into())
            }
        }
    }

    /// Manual teardown. A no-op when nothing is active.
    pub fn unload(&mut self, host: &mut ContentHost, now: Instant) -> Option<Generation> {
        let generation = self.active_generation()?;
        drop(host.unmount());
        self.teardown(now);
        host.set_status(HostStatus::Unloaded);
        self.state = ReloadState::Idle;
        log!("host"; "app unloaded ({})", generation);
        Some(generation)
    }

    /// Unload and delete every scratch copy.
    pub fn close(&mut self, host: &mut ContentHost, now: Instant) {
        self.unload(host, now);
        let deleted = self.scratch.flush();
        crate::debug!("scratch"; "flushed {} snapshot(s)", deleted);
    }

    /// Delete snapshots whose cleanup delay has elapsed.
    pub fn reap(&mut self, now: Instant) -> usize {
        self.scratch.reap_due(now)
    }

    pub fn next_cleanup(&self) -> Option<Instant> {
        self.scratch.next_deadline()
    }

    fn teardown(&mut self, now: Instant) -> Option<UnloadReceipt> {
        let ActiveGeneration { context, snapshot } = self.active.take()?;
        let receipt = context.unload();
        self.scratch.retire(snapshot, &receipt, now);
        Some(receipt)
    }

    fn fail(&mut self, host: &mut ContentHost, err: ReloadError) -> Result<Generation, ReloadError> {
        log!("error"; "{}", err);
        host.show_message(err.fallback_message());
        host.set_status(err.status());
        self.state = ReloadState::Failed;
        Err(err)
    }
}

impl<B: ModuleBackend> Drop for ReloadOrchestrator<B> {
    fn drop(&mut self) {
        if let Some(ActiveGeneration { context, snapshot }) = self.active.take() {
            let receipt = context.unload();
            self.scratch.retire(snapshot, &receipt, Instant::now());
        }
        self.scratch.flush();
    }
}
