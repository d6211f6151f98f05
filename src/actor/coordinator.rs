//! Actor Coordinator - Wires up the Host
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates the host inbox
//! - Starts the watcher (or degrades to manual reloads) and the input reader
//! - Loads the first generation and runs the host actor until Close

use std::time::Instant;

use anyhow::Result;
use tokio::sync::mpsc;

use super::fs::FileWatcher;
use super::host::{HostActor, HostState};
use super::input;
use super::messages::HostMsg;
use crate::config::HostConfig;
use crate::context::DylibBackend;
use crate::reload::{ModuleArtifact, ReloadOrchestrator, ScratchArea};

const CHANNEL_BUFFER: usize = 32;

/// Orchestrator for the configured artifact, backed by the platform loader.
pub fn build_orchestrator(config: &HostConfig) -> ReloadOrchestrator<DylibBackend> {
    ReloadOrchestrator::new(
        ModuleArtifact::new(&config.artifact_path),
        DylibBackend,
        config.reload.policy(),
        config.reload.dependencies.clone(),
        ScratchArea::new(config.reload.scratch_root(), config.reload.cleanup_delay()),
    )
}

/// Coordinator - wires up and runs the host.
pub struct Coordinator {
    config: HostConfig,
}

impl Coordinator {
    pub fn with_config(config: HostConfig) -> Self {
        Self { config }
    }

    /// Run the host until Close (command, Ctrl+C) is received.
    pub async fn run(self) -> Result<()> {
        let config = self.config;
        let (host_tx, host_rx) = mpsc::channel::<HostMsg>(CHANNEL_BUFFER);
        crate::core::register_host(host_tx.clone());

        let mut state = HostState::new(
            build_orchestrator(&config),
            config.watch.debounce(),
            config.watch.settle(),
        );

        let watcher = if config.watch.enable {
            match FileWatcher::spawn(&config.artifact_path, host_tx.clone()) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    crate::log!("watch"; "{}", e);
                    crate::log!("watch"; "watcher disabled, use `r` to reload manually");
                    None
                }
            }
        } else {
            crate::debug!("watch"; "disabled by config");
            None
        };
        state.attach_watcher(watcher);

        if let Err(e) = input::spawn(host_tx) {
            crate::log!("host"; "terminal input unavailable: {}", e);
        }

        // Failure is already shown in the window; keep running either way
        let _ = state.startup(Instant::now());
        crate::log!("host"; "{}", input::HELP);

        crate::debug!("actor"; "start");
        let state = HostActor::new(state, host_rx).run().await;
        crate::debug!("actor"; "stopped after {} reload cycle(s)", state.cycles());
        Ok(())
    }
}
