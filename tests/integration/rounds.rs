//! Coordinated round behavior across the full stack.

use std::time::Duration;

use serde_json::json;

use cellscribe::history::mock::{MockActor, RecordingSync};
use cellscribe::{EditRequest, RestoreOutcome, Supervisor, SupervisorState, SyncTrigger};

use super::fast_config;

#[tokio::test]
async fn n_commits_then_n_undos_restore_every_actor() {
    let sync = RecordingSync::new();
    let mut supervisor = Supervisor::new(sync, fast_config());

    let viewport = MockActor::new("viewport", json!({"x": 0, "y": 0, "zoom": 1}));
    let frame = MockActor::new("frame", json!({"frame": 0}));
    let labels = MockActor::new("labels", json!({"foreground": 1, "background": 0}));
    supervisor.add_actor(viewport.clone());
    supervisor.add_actor(frame.clone());
    supervisor.add_actor(labels.clone());

    let initial = (viewport.context(), frame.context(), labels.context());

    // Each edit snapshots current state, then its effects land.
    let effects = [
        (json!({"x": 10, "y": 0, "zoom": 1}), json!({"frame": 1})),
        (json!({"x": 10, "y": 5, "zoom": 2}), json!({"frame": 2})),
        (json!({"x": 30, "y": 5, "zoom": 2}), json!({"frame": 5})),
    ];
    for (viewport_ctx, frame_ctx) in &effects {
        supervisor.edit(EditRequest::new("brush")).await.unwrap();
        viewport.set_context(viewport_ctx.clone());
        frame.set_context(frame_ctx.clone());
    }

    for _ in 0..effects.len() {
        assert!(supervisor.undo().await.unwrap());
    }

    assert_eq!(viewport.context(), initial.0);
    assert_eq!(frame.context(), initial.1);
    assert_eq!(labels.context(), initial.2);
    assert_eq!(supervisor.status().action, 0);
}

#[tokio::test]
async fn commit_after_undo_prunes_every_future_stack() {
    let sync = RecordingSync::new();
    let mut supervisor = Supervisor::new(sync, fast_config());

    let viewport = MockActor::new("viewport", json!({"x": 0}));
    let tool = MockActor::new("tool", json!({"tool": "select"}));
    supervisor.add_actor(viewport.clone());
    supervisor.add_actor(tool.clone());

    supervisor.edit(EditRequest::new("brush")).await.unwrap();
    supervisor.edit(EditRequest::new("flood")).await.unwrap();
    supervisor.undo().await.unwrap();

    for tracker in supervisor.trackers() {
        assert_eq!(tracker.stats().await.unwrap().future, 1);
    }
    assert!(supervisor.can_redo());

    supervisor.edit(EditRequest::new("threshold")).await.unwrap();

    for tracker in supervisor.trackers() {
        let stats = tracker.stats().await.unwrap();
        assert_eq!(stats.future, 0);
        assert_eq!(stats.past, 3);
    }
    // Redo is illegal again until further undos occur.
    assert!(!supervisor.can_redo());
    assert!(!supervisor.redo().await.unwrap());
}

#[tokio::test]
async fn unchanged_context_acknowledges_same_context_without_side_effects() {
    let sync = RecordingSync::new();
    let mut supervisor = Supervisor::new(sync, fast_config());

    let viewport = MockActor::new("viewport", json!({"x": 7}));
    supervisor.add_actor(viewport.clone());

    supervisor.edit(EditRequest::new("brush")).await.unwrap();
    // Nothing moved between commit and undo.
    supervisor.undo().await.unwrap();

    let log = viewport.restore_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].1, RestoreOutcome::SameContext);
    assert_eq!(viewport.context(), json!({"x": 7}));
}

#[tokio::test]
async fn backend_trigger_waits_for_every_local_acknowledgement() {
    let sync = RecordingSync::new();
    let mut supervisor = Supervisor::new(sync.clone(), fast_config());

    let viewport = MockActor::new("viewport", json!({"x": 0}));
    let slow = MockActor::new("slow", json!({"frame": 0}));
    supervisor.add_actor(viewport.clone());
    supervisor.add_actor(slow.clone());

    supervisor.edit(EditRequest::new("brush")).await.unwrap();
    slow.set_delay(Duration::from_millis(100));

    let probe = sync.clone();
    let round = tokio::spawn(async move {
        supervisor.undo().await.unwrap();
        supervisor
    });

    // Mid-round: the slow tracker has not acknowledged, so the backend
    // trigger must not have fired yet.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(probe.triggers().is_empty());

    let supervisor = round.await.unwrap();
    assert_eq!(probe.triggers(), vec![SyncTrigger::BackendUndo]);
    assert_eq!(supervisor.state(), SupervisorState::Idle);
}

#[tokio::test]
async fn acknowledgement_order_does_not_matter() {
    let sync = RecordingSync::new();
    let mut supervisor = Supervisor::new(sync, fast_config());

    // Mixed latencies: completions arrive out of broadcast order.
    let delays = [40u64, 5, 25, 0];
    let mut actors = Vec::new();
    for (index, delay) in delays.iter().enumerate() {
        let actor = MockActor::new(format!("actor-{index}"), json!({"n": index}));
        actor.set_delay(Duration::from_millis(*delay));
        supervisor.add_actor(actor.clone());
        actors.push(actor);
    }

    supervisor.edit(EditRequest::new("brush")).await.unwrap();
    assert_eq!(supervisor.state(), SupervisorState::Idle);
    for actor in &actors {
        assert_eq!(actor.save_calls(), 1);
    }

    // A second round over the same mixed latencies also converges.
    supervisor.undo().await.unwrap();
    assert_eq!(supervisor.state(), SupervisorState::Idle);
    assert_eq!(supervisor.status().action, 0);
}
