use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::error::HistoryError;
use crate::history::snapshot::{RestoreOutcome, Snapshot};

/// Stable identity for a participant in the history protocol.
///
/// Identities are assigned once at registration and never reused, so the
/// supervisor's registry can stay append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability contract for a state component participating in history.
///
/// Every facet of document state that must survive undo/redo (viewport,
/// frame selection, active tool, label selection) implements this trait and
/// registers with the [`Supervisor`](crate::history::Supervisor). The
/// supervisor never touches component state directly; all consistency is
/// achieved through this save/restore exchange.
#[async_trait]
pub trait HistoryActor: Send + Sync {
    /// Registry identity of this actor.
    fn id(&self) -> ActorId;

    /// Short name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Produce a minimal snapshot of the current context.
    ///
    /// Must be side-effect-free and capture only the fields needed to
    /// restore observable state, never bulk or derived data.
    async fn save(&self) -> Result<Snapshot, HistoryError>;

    /// Apply a previously saved snapshot.
    ///
    /// Compares the snapshot to the current context field by field. If
    /// identical, acknowledges [`RestoreOutcome::SameContext`] without side
    /// effects; otherwise applies every field, performs any cascading
    /// re-fetch needed for dependent derived state, and acknowledges
    /// [`RestoreOutcome::Restored`]. Re-applying the same snapshot must be
    /// a no-op the second time.
    async fn restore(&self, snapshot: Snapshot) -> Result<RestoreOutcome, HistoryError>;
}
