//! Timeout and relay failure behavior.

use serde_json::json;
use std::time::Duration;

use cellscribe::history::mock::{MockActor, RecordingSync};
use cellscribe::{
    EditRequest, HistoryConfig, HistoryError, Supervisor, SupervisorState, SyncTrigger,
};

fn timeout_config(ms: u64) -> HistoryConfig {
    HistoryConfig {
        round_timeout_ms: Some(ms),
        ..HistoryConfig::default()
    }
}

#[tokio::test]
async fn unacknowledged_participant_fails_the_round_instead_of_stalling() {
    let sync = RecordingSync::new();
    let mut supervisor = Supervisor::new(sync.clone(), timeout_config(50));

    let healthy = MockActor::new("viewport", json!({"x": 0}));
    let stalled = MockActor::new("stalled", json!({"frame": 0}));
    stalled.set_stalled(true);
    supervisor.add_actor(healthy.clone());
    supervisor.add_actor(stalled);

    let err = supervisor
        .edit(EditRequest::new("brush"))
        .await
        .unwrap_err();
    assert!(matches!(err, HistoryError::RoundTimeout(50)));
    assert_eq!(supervisor.state(), SupervisorState::Failed);

    // The healthy participant did save; the round still failed as a whole.
    assert_eq!(healthy.save_calls(), 1);
    assert!(sync.triggers().is_empty());
}

#[tokio::test]
async fn failed_supervisor_refuses_rounds_until_reset() {
    let sync = RecordingSync::new();
    let mut supervisor = Supervisor::new(sync, timeout_config(50));

    let stalled = MockActor::new("stalled", json!({}));
    stalled.set_stalled(true);
    supervisor.add_actor(stalled.clone());

    supervisor
        .edit(EditRequest::new("brush"))
        .await
        .unwrap_err();

    assert!(matches!(
        supervisor.edit(EditRequest::new("flood")).await,
        Err(HistoryError::Failed)
    ));
    assert!(matches!(supervisor.undo().await, Err(HistoryError::Failed)));
    assert!(matches!(supervisor.redo().await, Err(HistoryError::Failed)));

    supervisor.reset_failure();
    assert_eq!(supervisor.state(), SupervisorState::Idle);

    // Recovery: clearing the stall releases the parked save, and the next
    // commit lands on top of it, bringing the log back to the counter.
    stalled.set_stalled(false);
    supervisor.edit(EditRequest::new("flood")).await.unwrap();
    assert_eq!(supervisor.state(), SupervisorState::Idle);

    let status = supervisor.status();
    assert_eq!(status.num_actions, 2);
    assert_eq!(status.action, 2);
    let stats = supervisor.trackers()[0].stats().await.unwrap();
    assert_eq!(stats.past, 2);
    assert_eq!(stats.cursor, 2);
}

#[tokio::test]
async fn relay_failure_surfaces_but_local_state_stays_consistent() {
    let sync = RecordingSync::new();
    let mut supervisor = Supervisor::new(sync.clone(), timeout_config(1_000));

    let viewport = MockActor::new("viewport", json!({"x": 0}));
    supervisor.add_actor(viewport.clone());

    supervisor.edit(EditRequest::new("brush")).await.unwrap();
    viewport.set_context(json!({"x": 9}));

    sync.set_failing(true);
    let err = supervisor.undo().await.unwrap_err();
    assert!(matches!(err, HistoryError::RelayUnavailable));

    // The local round completed before the trigger was attempted: the actor
    // was restored and the counter moved. Only the server log is behind.
    assert_eq!(viewport.context(), json!({"x": 0}));
    assert_eq!(supervisor.status().action, 0);
    assert_eq!(supervisor.state(), SupervisorState::Idle);
}

#[tokio::test]
async fn slow_but_responsive_actors_do_not_time_out() {
    let sync = RecordingSync::new();
    let mut supervisor = Supervisor::new(sync.clone(), timeout_config(500));

    let slow = MockActor::new("slow", json!({"x": 0}));
    slow.set_delay(Duration::from_millis(50));
    supervisor.add_actor(slow);

    supervisor.edit(EditRequest::new("brush")).await.unwrap();
    supervisor.undo().await.unwrap();
    assert_eq!(sync.triggers(), vec![SyncTrigger::BackendUndo]);
}
