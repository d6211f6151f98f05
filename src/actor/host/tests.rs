use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use proptest::prelude::*;
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::{HostActor, HostState};
use crate::actor::fs::FileWatcher;
use crate::actor::messages::{HostCommand, HostMsg, ReloadEvent};
use crate::context::DependencyPolicy;
use crate::context::testing::{FakeBackend, FakeGuest};
use crate::reload::{ModuleArtifact, ReloadOrchestrator, ScratchArea};
use crate::view::{ContentView, HostStatus};

const DEBOUNCE: Duration = Duration::from_millis(1000);
const SETTLE: Duration = Duration::from_millis(500);

struct Harness {
    state: HostState<FakeBackend>,
    backend: FakeBackend,
    artifact: PathBuf,
    _scratch: TempDir,
    _build: TempDir,
}

fn harness() -> Harness {
    let build = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let artifact = build.path().join("libhotframe_demo.so");
    let backend = FakeBackend::default();
    let orchestrator = ReloadOrchestrator::new(
        ModuleArtifact::new(&artifact),
        backend.clone(),
        DependencyPolicy::default(),
        vec![],
        ScratchArea::new(scratch.path(), Duration::ZERO),
    );
    let mut state = HostState::new(orchestrator, DEBOUNCE, SETTLE).with_render(false);
    state.set_watching(true);
    Harness {
        state,
        backend,
        artifact,
        _scratch: scratch,
        _build: build,
    }
}

fn changed(at: Instant) -> HostMsg {
    HostMsg::FileChanged(ReloadEvent {
        at,
        file_name: "libhotframe_demo.so".into(),
    })
}

/// Deliver each trigger at its own time, then let every settle delay elapse.
fn drive(h: &mut Harness, times: &[Instant]) {
    for at in times {
        assert!(h.state.handle(changed(*at), *at).is_continue());
    }
    if let Some(last) = times.last() {
        h.state.tick(*last + SETTLE);
    }
}

#[test]
fn test_watching_status() {
    let h = harness();
    assert!(h.state.is_watching());
    assert_eq!(h.state.content().chrome().status(), &HostStatus::Watching);
}

#[test]
fn test_trigger_waits_for_settle_delay() {
    let mut h = harness();
    FakeGuest::titled("Demo").write_to(&h.artifact);
    let t0 = Instant::now();

    let _ = h.state.handle(changed(t0), t0);
    assert_eq!(h.state.content().chrome().status(), &HostStatus::Reloading);
    assert_eq!(h.state.next_deadline(), Some(t0 + SETTLE));

    h.state.tick(t0 + Duration::from_millis(499));
    assert_eq!(h.state.cycles(), 0);

    h.state.tick(t0 + SETTLE);
    assert_eq!(h.state.cycles(), 1);
    assert_eq!(h.state.content().chrome().load_count(), 1);
    assert_eq!(h.state.pending_triggers(), 0);
}

#[test]
fn test_scenario_c_burst_within_window() {
    let mut h = harness();
    FakeGuest::titled("Demo").write_to(&h.artifact);
    let t0 = Instant::now();

    drive(&mut h, &[t0, t0 + Duration::from_millis(200)]);
    h.state.tick(t0 + Duration::from_secs(10));
    assert_eq!(h.state.cycles(), 1);
    assert_eq!(h.state.content().chrome().load_count(), 1);
}

#[test]
fn test_missing_artifact_keeps_watching() {
    let mut h = harness();
    let t0 = Instant::now();

    drive(&mut h, &[t0]);
    assert_eq!(h.state.cycles(), 1);
    assert_eq!(h.state.content().chrome().load_count(), 0);
    assert_eq!(h.state.content().chrome().status(), &HostStatus::ArtifactMissing);
    assert!(h.state.is_watching());

    // Next build lands, next trigger loads
    FakeGuest::titled("Demo").write_to(&h.artifact);
    drive(&mut h, &[t0 + DEBOUNCE]);
    assert_eq!(h.state.content().chrome().load_count(), 1);
}

#[test]
fn test_manual_reload_and_unload() {
    let mut h = harness();
    FakeGuest::titled("Demo").write_to(&h.artifact);
    let now = Instant::now();

    let _ = h.state.handle(HostMsg::Command(HostCommand::Reload), now);
    assert_eq!(h.state.content().chrome().load_count(), 1);

    let _ = h.state.handle(HostMsg::Command(HostCommand::Unload), now);
    assert_eq!(h.state.content().view(), &ContentView::Placeholder);
    assert!(!h.state.orchestrator().has_active_context());
    assert_eq!(h.backend.live_images(), 0);
}

#[test]
fn test_unload_without_context_changes_nothing() {
    let mut h = harness();
    let now = Instant::now();
    let before = h.state.content().chrome().clone();

    assert!(h.state.handle(HostMsg::Command(HostCommand::Unload), now).is_continue());
    assert_eq!(h.state.content().chrome(), &before);
    assert_eq!(h.state.cycles(), 0);
}

#[test]
fn test_close_stops_everything() {
    let mut h = harness();
    FakeGuest::titled("Demo").write_to(&h.artifact);
    let t0 = Instant::now();
    h.state.startup(t0).unwrap();

    // Pending trigger is discarded by close
    let _ = h.state.handle(changed(t0 + DEBOUNCE), t0 + DEBOUNCE);
    let flow = h.state.handle(HostMsg::Command(HostCommand::Close), t0 + DEBOUNCE);
    assert_eq!(flow, ControlFlow::Break(()));
    assert!(h.state.is_closed());
    assert_eq!(h.state.pending_triggers(), 0);
    assert_eq!(h.backend.live_images(), 0);
    assert_eq!(h.state.orchestrator().scratch().pending_count(), 0);

    let flow = h.state.handle(HostMsg::Command(HostCommand::Reload), t0 + DEBOUNCE * 2);
    assert_eq!(flow, ControlFlow::Break(()));
    assert_eq!(h.state.cycles(), 1);
}

#[test]
fn test_close_stops_watcher_before_unload() {
    let mut h = harness();
    FakeGuest::titled("Demo").write_to(&h.artifact);
    let (tx, mut rx) = mpsc::channel(8);
    let watcher = FileWatcher::spawn(&h.artifact, tx).unwrap();
    h.state.attach_watcher(Some(watcher));
    assert!(h.state.is_watching());

    let t0 = Instant::now();
    h.state.startup(t0).unwrap();
    h.state.close(t0);
    assert!(!h.state.is_watching());
    assert_eq!(h.backend.live_images(), 0);

    // Watcher and its bridge thread are gone, so the inbox ends
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let drained = runtime.block_on(async {
        tokio::time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await
    });
    assert!(drained.is_ok());
}

#[test]
fn test_missing_watcher_degrades_to_manual() {
    let mut h = harness();
    h.state.attach_watcher(None);
    assert!(!h.state.is_watching());
    assert_eq!(h.state.content().chrome().status(), &HostStatus::ManualOnly);
}

#[test]
fn test_startup_loads_first_generation() {
    let mut h = harness();
    FakeGuest::titled("Demo").write_to(&h.artifact);
    h.state.startup(Instant::now()).unwrap();
    assert_eq!(h.state.content().chrome().window_title(), "Hotframe Host - Demo");
}

#[test]
fn test_actor_runs_commands_until_close() {
    let h = harness();
    FakeGuest::titled("Demo").write_to(&h.artifact);
    let (tx, rx) = mpsc::channel(8);
    tx.try_send(HostMsg::Command(HostCommand::Reload)).unwrap();
    tx.try_send(HostMsg::Command(HostCommand::Close)).unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let state = runtime.block_on(HostActor::new(h.state, rx).run());

    assert!(state.is_closed());
    assert_eq!(state.cycles(), 1);
    assert_eq!(h.backend.live_images(), 0);
}

#[test]
fn test_actor_stops_when_senders_dropped() {
    let h = harness();
    let (tx, rx) = mpsc::channel::<HostMsg>(1);
    drop(tx);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let state = runtime.block_on(HostActor::new(h.state, rx).run());
    assert!(state.is_closed());
    assert_eq!(state.cycles(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_spaced_triggers_each_reload(gaps in prop::collection::vec(1001u64..4000, 0..8)) {
        let mut h = harness();
        FakeGuest::titled("Demo").write_to(&h.artifact);

        let mut at = Instant::now();
        let mut times = vec![at];
        for gap in &gaps {
            at += Duration::from_millis(*gap);
            times.push(at);
        }
        drive(&mut h, &times);

        let n = times.len() as u64;
        prop_assert_eq!(h.state.cycles(), n);
        prop_assert_eq!(h.state.content().chrome().load_count(), n);
        prop_assert_eq!(h.backend.overlaps(), 0);
    }

    #[test]
    fn prop_bursts_reload_once_per_window(
        bursts in prop::collection::vec(prop::collection::vec(1u64..1000, 0..5), 1..6)
    ) {
        let mut h = harness();
        FakeGuest::titled("Demo").write_to(&h.artifact);

        let mut start = Instant::now();
        let mut times = Vec::new();
        for burst in &bursts {
            times.push(start);
            let mut offsets = burst.clone();
            offsets.sort_unstable();
            times.extend(offsets.iter().map(|ms| start + Duration::from_millis(*ms)));
            start += DEBOUNCE * 2;
        }
        drive(&mut h, &times);

        prop_assert_eq!(h.state.cycles(), bursts.len() as u64);
    }
}
