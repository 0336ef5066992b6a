//! Mock participants for deterministic testing
//!
//! Implements the [`HistoryActor`] and [`BackendSync`] contracts without any
//! real component state behind them. Use these for unit and integration
//! tests that need to verify coordination rounds, acknowledgement counting,
//! and relay triggering.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::history::actor::{ActorId, HistoryActor};
use crate::history::error::HistoryError;
use crate::history::relay::{BackendSync, SyncTrigger};
use crate::history::snapshot::{RestoreOutcome, Snapshot};

/// Mock history actor with an inspectable JSON context.
///
/// The context plays the role of a real component's observable state: tests
/// mutate it between commits (a pan, a frame change) and assert that undo
/// rounds bring it back. Delays simulate slow acknowledgements; a stalled
/// actor withholds acknowledgement until the stall is cleared, which is how
/// the supervisor's timeout and recovery paths are exercised.
pub struct MockActor {
    id: ActorId,
    name: String,
    context: Mutex<serde_json::Value>,
    restore_log: Mutex<Vec<(Snapshot, RestoreOutcome)>>,
    save_calls: AtomicUsize,
    delay: Mutex<Duration>,
    stalled: watch::Sender<bool>,
}

impl MockActor {
    pub fn new(name: impl Into<String>, initial: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            id: ActorId::new(),
            name: name.into(),
            context: Mutex::new(initial),
            restore_log: Mutex::new(Vec::new()),
            save_calls: AtomicUsize::new(0),
            delay: Mutex::new(Duration::ZERO),
            stalled: watch::Sender::new(false),
        })
    }

    /// Replace the mock's context, as a user interaction would.
    pub fn set_context(&self, value: serde_json::Value) {
        *self.context.lock() = value;
    }

    /// Current context value.
    pub fn context(&self) -> serde_json::Value {
        self.context.lock().clone()
    }

    /// Delay every save/restore acknowledgement by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    /// While stalled, save and restore park without acknowledging; clearing
    /// the stall releases any request already parked.
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.send_replace(stalled);
    }

    /// Every restore received, with the acknowledgement that was returned.
    pub fn restore_log(&self) -> Vec<(Snapshot, RestoreOutcome)> {
        self.restore_log.lock().clone()
    }

    /// Number of save requests received.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) -> Result<(), HistoryError> {
        // Unacknowledged participant: park until the stall is lifted.
        let mut stalled = self.stalled.subscribe();
        let _ = stalled.wait_for(|stalled| !*stalled).await;

        let delay = *self.delay.lock();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryActor for MockActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn save(&self) -> Result<Snapshot, HistoryError> {
        self.simulate_latency().await?;
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let context = self.context.lock().clone();
        Snapshot::capture(&context)
    }

    async fn restore(&self, snapshot: Snapshot) -> Result<RestoreOutcome, HistoryError> {
        self.simulate_latency().await?;
        let value: serde_json::Value = snapshot.decode()?;
        let outcome = {
            let mut context = self.context.lock();
            if *context == value {
                RestoreOutcome::SameContext
            } else {
                *context = value;
                RestoreOutcome::Restored
            }
        };
        self.restore_log.lock().push((snapshot, outcome));
        Ok(outcome)
    }
}

/// Backend relay that records the trigger sequence for assertions.
#[derive(Default)]
pub struct RecordingSync {
    triggers: Mutex<Vec<SyncTrigger>>,
    fail: AtomicBool,
}

impl RecordingSync {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make subsequent triggers fail with `RelayUnavailable`.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn triggers(&self) -> Vec<SyncTrigger> {
        self.triggers.lock().clone()
    }

    fn record(&self, trigger: SyncTrigger) -> Result<(), HistoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HistoryError::RelayUnavailable);
        }
        self.triggers.lock().push(trigger);
        Ok(())
    }
}

#[async_trait]
impl BackendSync for RecordingSync {
    async fn backend_undo(&self) -> Result<(), HistoryError> {
        self.record(SyncTrigger::BackendUndo)
    }

    async fn backend_redo(&self) -> Result<(), HistoryError> {
        self.record(SyncTrigger::BackendRedo)
    }
}
