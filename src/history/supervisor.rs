//! Global coordination of edit/undo/redo rounds.
//!
//! The supervisor owns exactly two pieces of protocol state: the edit
//! counter `(action, num_actions)` and the append-only tracker registry.
//! Everything else lives with the trackers and actors; consistency comes
//! from broadcasting a round to every tracker and waiting on a count-to-N
//! barrier for their acknowledgements, which may arrive in any order.
//!
//! The counter bounds are the sole signal exposed upward for enabling or
//! disabling undo/redo affordances: undo is legal while `action > 0`, redo
//! while `action < num_actions`. An illegal request is a guarded no-op, not
//! an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::HistoryConfig;
use crate::history::actor::{ActorId, HistoryActor};
use crate::history::barrier::RoundBarrier;
use crate::history::error::HistoryError;
use crate::history::relay::BackendSync;
use crate::history::tracker::{Tracker, TrackerCommand, TrackerHandle};

/// Supervisor lifecycle states.
///
/// `Failed` is entered when a round times out waiting for acknowledgements
/// and persists until [`Supervisor::reset_failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Committing,
    Undoing,
    Redoing,
    Failed,
}

/// Point-in-time view of the supervisor for the affordance layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorStatus {
    pub state: SupervisorState,
    pub action: usize,
    pub num_actions: usize,
    pub actors: usize,
}

/// An edit request entering the protocol.
///
/// The supervisor coordinates the snapshot round for the edit; executing
/// the edit against the server-side label arrays is the network layer's
/// concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    pub action_name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

impl EditRequest {
    pub fn new(action_name: impl Into<String>) -> Self {
        Self {
            action_name: action_name.into(),
            args: serde_json::Value::Null,
        }
    }

    pub fn with_args(mut self, args: serde_json::Value) -> Self {
        self.args = args;
        self
    }
}

enum RoundKind {
    Commit,
    Undo,
    Redo,
}

/// Coordinator for the history protocol.
pub struct Supervisor {
    config: HistoryConfig,
    relay: Arc<dyn BackendSync>,
    trackers: Vec<TrackerHandle>,
    action: usize,
    num_actions: usize,
    state: SupervisorState,
}

impl Supervisor {
    pub fn new(relay: Arc<dyn BackendSync>, config: HistoryConfig) -> Self {
        Self {
            config,
            relay,
            trackers: Vec::new(),
            action: 0,
            num_actions: 0,
            state: SupervisorState::Idle,
        }
    }

    /// Register a new participating actor and spawn its tracker.
    ///
    /// Legal at any point in the session; sub-components created after
    /// initial load join the registry with an empty history and catch up on
    /// the next commit. Entries are never removed.
    pub fn add_actor(&mut self, actor: Arc<dyn HistoryActor>) -> ActorId {
        let handle = Tracker::spawn(actor, self.config.channel_capacity);
        let id = handle.actor_id();
        info!(actor = handle.name(), %id, "actor registered");
        self.trackers.push(handle);
        id
    }

    /// Whether an undo round would currently be dispatched.
    pub fn can_undo(&self) -> bool {
        self.action > 0
    }

    /// Whether a redo round would currently be dispatched.
    pub fn can_redo(&self) -> bool {
        self.action < self.num_actions
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn status(&self) -> SupervisorStatus {
        SupervisorStatus {
            state: self.state,
            action: self.action,
            num_actions: self.num_actions,
            actors: self.trackers.len(),
        }
    }

    /// Registered tracker handles, in broadcast order.
    pub fn trackers(&self) -> &[TrackerHandle] {
        &self.trackers
    }

    /// Clear the failed state after a timed-out round.
    ///
    /// This does not rewind the edit counter: a timed-out commit already
    /// advanced `num_actions`, so the counter runs ahead of any tracker
    /// whose save never finished. A participant that was merely slow
    /// catches back up when its parked request completes; one that is truly
    /// gone stays behind until the caller rebuilds the session (most likely
    /// by reloading the project). The supervisor only refuses new rounds
    /// until the reset.
    pub fn reset_failure(&mut self) {
        if self.state == SupervisorState::Failed {
            warn!("failed state cleared, resuming coordination");
            self.state = SupervisorState::Idle;
        }
    }

    /// Coordinate the snapshot round for a new edit.
    ///
    /// Always legal. Advances the edit counter, discarding any redo branch
    /// at the global level, and has every tracker capture a snapshot.
    pub async fn edit(&mut self, request: EditRequest) -> Result<(), HistoryError> {
        self.ensure_operational()?;
        self.num_actions += 1;
        self.action = self.num_actions;
        debug!(
            action = self.action,
            name = %request.action_name,
            "commit round started"
        );
        self.run_round(RoundKind::Commit).await
    }

    /// Coordinate an undo round.
    ///
    /// Returns `Ok(false)` without dispatching anything when `action == 0`.
    /// After every local tracker confirms, triggers the backend undo and
    /// decrements `action`.
    pub async fn undo(&mut self) -> Result<bool, HistoryError> {
        self.ensure_operational()?;
        if !self.can_undo() {
            debug!("undo ignored, no actions to roll back");
            return Ok(false);
        }
        debug!(action = self.action, "undo round started");
        self.run_round(RoundKind::Undo).await?;

        let relayed = self.relay.backend_undo().await;
        self.action -= 1;
        if let Err(error) = relayed {
            // Local state already moved; the server log is now one step
            // ahead until the network layer reconciles.
            warn!(%error, "backend undo trigger failed");
            return Err(error);
        }
        Ok(true)
    }

    /// Coordinate a redo round; mirror of [`undo`](Self::undo).
    pub async fn redo(&mut self) -> Result<bool, HistoryError> {
        self.ensure_operational()?;
        if !self.can_redo() {
            debug!("redo ignored, no undone actions to replay");
            return Ok(false);
        }
        debug!(action = self.action, "redo round started");
        self.run_round(RoundKind::Redo).await?;

        let relayed = self.relay.backend_redo().await;
        self.action += 1;
        if let Err(error) = relayed {
            warn!(%error, "backend redo trigger failed");
            return Err(error);
        }
        Ok(true)
    }

    fn ensure_operational(&self) -> Result<(), HistoryError> {
        if self.state == SupervisorState::Failed {
            return Err(HistoryError::Failed);
        }
        Ok(())
    }

    async fn run_round(&mut self, kind: RoundKind) -> Result<(), HistoryError> {
        self.state = match kind {
            RoundKind::Commit => SupervisorState::Committing,
            RoundKind::Undo => SupervisorState::Undoing,
            RoundKind::Redo => SupervisorState::Redoing,
        };

        // Quorum is the tracker count at round start; an actor registered
        // while the round is in flight joins the next one.
        let expected = self.trackers.len();
        let barrier = Arc::new(RoundBarrier::new(expected));

        for tracker in &self.trackers {
            let command = match kind {
                RoundKind::Commit => TrackerCommand::Commit {
                    barrier: barrier.clone(),
                },
                RoundKind::Undo => TrackerCommand::Undo {
                    barrier: barrier.clone(),
                },
                RoundKind::Redo => TrackerCommand::Redo {
                    barrier: barrier.clone(),
                },
            };
            if let Err(error) = tracker.send(command).await {
                warn!(actor = tracker.name(), %error, "broadcast failed");
                self.state = SupervisorState::Failed;
                return Err(error);
            }
        }

        match self.config.round_timeout() {
            Some(limit) => {
                if timeout(limit, barrier.wait()).await.is_err() {
                    warn!(
                        expected,
                        completed = barrier.completed(),
                        timeout_ms = limit.as_millis() as u64,
                        "round timed out waiting for acknowledgements"
                    );
                    self.state = SupervisorState::Failed;
                    return Err(HistoryError::RoundTimeout(limit.as_millis() as u64));
                }
            }
            None => barrier.wait().await,
        }

        debug!(expected, "round complete");
        self.state = SupervisorState::Idle;
        Ok(())
    }
}
