//! Host Actor
//!
//! Owns the orchestrator and the content host on the UI thread. Every input
//! arrives as a [`HostMsg`]; timing is injected so the state can be driven
//! without a runtime in tests.
//!
//! ```text
//! FileChanged ─▶ Debouncer ─(accepted)─▶ settle deadline queue ─(due)─▶ reload
//! Command     ─────────────────────────────────────────────────────────▶ reload / unload / close
//! ```

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::fs::{Debouncer, FileWatcher};
use super::messages::{HostCommand, HostMsg, ReloadEvent};
use crate::context::ModuleBackend;
use crate::logger;
use crate::reload::{ReloadError, ReloadOrchestrator};
use crate::view::{ContentHost, HostStatus};

#[cfg(test)]
mod tests;

/// Sleep when nothing is scheduled.
const IDLE_SLEEP: Duration = Duration::from_secs(86400);

pub struct HostState<B: ModuleBackend> {
    orchestrator: ReloadOrchestrator<B>,
    content: ContentHost,
    debouncer: Debouncer,
    settle: Duration,
    /// One entry per accepted trigger, in arrival order.
    pending: VecDeque<Instant>,
    /// Dropped first on close so no trigger can follow the unload.
    watcher: Option<FileWatcher>,
    watching: bool,
    render: bool,
    cycles: u64,
    closed: bool,
}

impl<B: ModuleBackend> HostState<B> {
    pub fn new(orchestrator: ReloadOrchestrator<B>, debounce: Duration, settle: Duration) -> Self {
        Self {
            orchestrator,
            content: ContentHost::new(),
            debouncer: Debouncer::new(debounce),
            settle,
            pending: VecDeque::new(),
            watcher: None,
            watching: false,
            render: true,
            cycles: 0,
            closed: false,
        }
    }

    pub fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    /// Record whether the watcher came up. Shown until the first load.
    pub fn set_watching(&mut self, watching: bool) {
        self.watching = watching;
        self.content.set_status(if watching {
            HostStatus::Watching
        } else {
            HostStatus::ManualOnly
        });
    }

    /// Take ownership of the watcher, or degrade to manual reloads without one.
    pub fn attach_watcher(&mut self, watcher: Option<FileWatcher>) {
        self.set_watching(watcher.is_some());
        self.watcher = watcher;
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    pub fn content(&self) -> &ContentHost {
        &self.content
    }

    pub fn orchestrator(&self) -> &ReloadOrchestrator<B> {
        &self.orchestrator
    }

    /// Full reload cycles run so far, failed ones included.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn pending_triggers(&self) -> usize {
        self.pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Sweep leftovers from earlier runs and load the first generation.
    pub fn startup(&mut self, now: Instant) -> Result<(), ReloadError> {
        self.orchestrator.sweep_stale_snapshots();
        self.reload(now).map(|_| ())
    }

    pub fn handle(&mut self, msg: HostMsg, now: Instant) -> ControlFlow<()> {
        if self.closed {
            return ControlFlow::Break(());
        }
        match msg {
            HostMsg::FileChanged(event) => self.on_change(event, now),
            HostMsg::Command(HostCommand::Reload) => {
                self.reload(now).ok();
            }
            HostMsg::Command(HostCommand::Unload) => {
                if self.orchestrator.unload(&mut self.content, now).is_some() {
                    logger::status_warning("app unloaded");
                    self.present();
                } else {
                    crate::debug!("host"; "unload: nothing loaded");
                }
            }
            HostMsg::Command(HostCommand::Close) => {
                self.close(now);
                return ControlFlow::Break(());
            }
        }
        self.tick(now);
        ControlFlow::Continue(())
    }

    /// Run every reload whose settle delay has elapsed, then reap scratch.
    pub fn tick(&mut self, now: Instant) {
        while self.pending.front().is_some_and(|due| *due <= now) {
            self.pending.pop_front();
            self.reload(now).ok();
        }
        self.orchestrator.reap(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        let settle = self.pending.front().copied();
        let cleanup = self.orchestrator.next_cleanup();
        match (settle, cleanup) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn close(&mut self, now: Instant) {
        if self.closed {
            return;
        }
        if let Some(watcher) = self.watcher.take() {
            crate::debug!("watch"; "stopped watching {}", watcher.dir().display());
        }
        self.watching = false;
        self.pending.clear();
        self.orchestrator.close(&mut self.content, now);
        self.closed = true;
        crate::log!("host"; "closed");
    }

    fn on_change(&mut self, event: ReloadEvent, now: Instant) {
        if !self.debouncer.accept(event.at) {
            crate::debug!("watch"; "debounced: {}", event.file_name);
            return;
        }
        crate::log!("watch"; "detected change: {}", event.file_name);
        self.content.set_status(HostStatus::Reloading);
        self.pending.push_back(now + self.settle);
    }

    fn reload(&mut self, now: Instant) -> Result<(), ReloadError> {
        self.cycles += 1;
        let result = self.orchestrator.reload(&mut self.content, now);
        match &result {
            Ok(_) => {
                let chrome = self.content.chrome();
                logger::status_success(&format!(
                    "{} (load #{})",
                    chrome.window_title(),
                    chrome.load_count()
                ));
            }
            Err(e) => logger::status_error(&e.fallback_message(), &e.to_string()),
        }
        self.present();
        result.map(|_| ())
    }

    fn present(&self) {
        if self.render {
            crate::view::present(&self.content);
        }
    }
}

/// Async shell around [`HostState`] on the current-thread runtime.
pub struct HostActor<B: ModuleBackend> {
    state: HostState<B>,
    rx: mpsc::Receiver<HostMsg>,
}

impl<B: ModuleBackend> HostActor<B> {
    pub fn new(state: HostState<B>, rx: mpsc::Receiver<HostMsg>) -> Self {
        Self { state, rx }
    }

    /// Run until `Close` or every sender is gone.
    pub async fn run(mut self) -> HostState<B> {
        loop {
            let sleep = self
                .state
                .next_deadline()
                .map(|at| at.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_SLEEP);

            tokio::select! {
                biased;
                msg = self.rx.recv() => {
                    let Some(msg) = msg else { break };
                    if self.state.handle(msg, Instant::now()).is_break() {
                        break;
                    }
                }
                _ = tokio::time::sleep(sleep) => self.state.tick(Instant::now()),
            }
        }
        self.state.close(Instant::now());
        self.state
    }
}
