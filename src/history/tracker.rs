//! Per-actor history tracking.
//!
//! One tracker runs per registered actor, as its own task commanded over a
//! channel. The tracker owns that actor's snapshot history exclusively: the
//! supervisor only ever sees completion acknowledgements, never the stacks
//! themselves.
//!
//! # Stack discipline
//!
//! `past` is an append-only log of commit snapshots; its length always
//! equals the total number of commits the tracker has seen. A `cursor`
//! marks the position in that log and moves in lock-step with the
//! supervisor's `action` counter, because every tracker participates in
//! every round:
//!
//! - **commit** pushes exactly one snapshot, clears `future` entirely
//!   (branch pruning), and moves the cursor to the end of the log.
//! - **undo** re-admits the snapshot at `cursor - 1` as the head of
//!   `future`, restores the snapshot of the commit below it (the first
//!   commit's snapshot doubles as the pre-history context), and steps the
//!   cursor back.
//! - **redo** pops the head of `future`, restores it, and steps the cursor
//!   forward. Nothing is pushed: the log already holds the value at the new
//!   cursor position.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::history::actor::{ActorId, HistoryActor};
use crate::history::barrier::RoundBarrier;
use crate::history::error::HistoryError;
use crate::history::snapshot::Snapshot;

/// Stack depths reported for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerStats {
    /// Length of the commit log.
    pub past: usize,
    /// Length of the redo stack.
    pub future: usize,
    /// Position in the commit log (= commits not yet undone).
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerState {
    Idle,
    Saving,
    RestoringPast,
    RestoringFuture,
}

pub(crate) enum TrackerCommand {
    Commit { barrier: Arc<RoundBarrier> },
    Undo { barrier: Arc<RoundBarrier> },
    Redo { barrier: Arc<RoundBarrier> },
    Inspect { reply: oneshot::Sender<TrackerStats> },
}

/// Handle to a running tracker task.
pub struct TrackerHandle {
    actor_id: ActorId,
    name: String,
    tx: mpsc::Sender<TrackerCommand>,
}

impl TrackerHandle {
    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) async fn send(&self, command: TrackerCommand) -> Result<(), HistoryError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| HistoryError::TrackerGone(self.name.clone()))
    }

    /// Current stack depths.
    pub async fn stats(&self) -> Result<TrackerStats, HistoryError> {
        let (reply, rx) = oneshot::channel();
        self.send(TrackerCommand::Inspect { reply }).await?;
        rx.await
            .map_err(|_| HistoryError::TrackerGone(self.name.clone()))
    }
}

pub(crate) struct Tracker {
    actor: Arc<dyn HistoryActor>,
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
    cursor: usize,
    state: TrackerState,
    rx: mpsc::Receiver<TrackerCommand>,
}

impl Tracker {
    /// Spawn a tracker task for `actor` and return its handle.
    pub(crate) fn spawn(actor: Arc<dyn HistoryActor>, capacity: usize) -> TrackerHandle {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = TrackerHandle {
            actor_id: actor.id(),
            name: actor.name().to_string(),
            tx,
        };
        let tracker = Self {
            actor,
            past: Vec::new(),
            future: Vec::new(),
            cursor: 0,
            state: TrackerState::Idle,
            rx,
        };
        tokio::spawn(tracker.run());
        handle
    }

    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            match command {
                TrackerCommand::Commit { barrier } => {
                    self.commit().await;
                    barrier.complete();
                }
                TrackerCommand::Undo { barrier } => {
                    self.undo().await;
                    barrier.complete();
                }
                TrackerCommand::Redo { barrier } => {
                    self.redo().await;
                    barrier.complete();
                }
                TrackerCommand::Inspect { reply } => {
                    let _ = reply.send(TrackerStats {
                        past: self.past.len(),
                        future: self.future.len(),
                        cursor: self.cursor,
                    });
                }
            }
        }
        debug!(actor = %self.actor.name(), "tracker channel closed, shutting down");
    }

    async fn commit(&mut self) {
        self.state = TrackerState::Saving;
        debug!(actor = %self.actor.name(), state = ?self.state, "save requested");
        match self.actor.save().await {
            Ok(snapshot) => {
                self.past.push(snapshot);
                self.future.clear();
                self.cursor = self.past.len();
                debug!(
                    actor = %self.actor.name(),
                    past = self.past.len(),
                    "snapshot committed"
                );
            }
            Err(error) => {
                // Only positive acknowledgements exist at the protocol
                // level; a failed save is logged and the round still counts
                // this tracker as complete.
                warn!(actor = %self.actor.name(), %error, "save request failed");
            }
        }
        self.state = TrackerState::Idle;
    }

    async fn undo(&mut self) {
        if self.cursor == 0 {
            // Nothing to undo locally. An actor registered after earlier
            // commits legitimately has a shorter log than the global
            // counter; it acknowledges without restoring.
            debug!(actor = %self.actor.name(), "undo with empty history, acknowledging");
            return;
        }
        self.state = TrackerState::RestoringPast;
        debug!(actor = %self.actor.name(), state = ?self.state, "restore requested");

        let reentry = self.past[self.cursor - 1].clone();
        let target = self.past[self.cursor.saturating_sub(2)].clone();
        self.future.push(reentry);
        self.cursor -= 1;

        match self.actor.restore(target).await {
            Ok(outcome) => {
                debug!(
                    actor = %self.actor.name(),
                    outcome = outcome.as_str(),
                    cursor = self.cursor,
                    "undo restore acknowledged"
                );
            }
            Err(error) => {
                warn!(actor = %self.actor.name(), %error, "undo restore failed");
            }
        }
        self.state = TrackerState::Idle;
    }

    async fn redo(&mut self) {
        let Some(snapshot) = self.future.pop() else {
            debug!(actor = %self.actor.name(), "redo with empty future, acknowledging");
            return;
        };
        self.state = TrackerState::RestoringFuture;
        debug!(actor = %self.actor.name(), state = ?self.state, "restore requested");
        self.cursor += 1;

        match self.actor.restore(snapshot).await {
            Ok(outcome) => {
                debug!(
                    actor = %self.actor.name(),
                    outcome = outcome.as_str(),
                    cursor = self.cursor,
                    "redo restore acknowledged"
                );
            }
            Err(error) => {
                warn!(actor = %self.actor.name(), %error, "redo restore failed");
            }
        }
        self.state = TrackerState::Idle;
    }
}
