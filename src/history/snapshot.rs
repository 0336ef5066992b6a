use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::history::error::HistoryError;

/// An actor-defined, minimal, serializable capture of restorable state.
///
/// Snapshots are opaque to the tracker and supervisor: only the actor that
/// produced one knows how to interpret it. They are immutable once stored
/// and deliberately exclude bulk or derived data (decoded frames, pixel
/// arrays) so that keeping a full history stays cheap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(serde_json::Value);

impl Snapshot {
    /// Capture a typed context value as an opaque snapshot.
    pub fn capture<T: Serialize>(value: &T) -> Result<Self, HistoryError> {
        Ok(Self(serde_json::to_value(value)?))
    }

    /// Decode the snapshot back into the actor's context type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, HistoryError> {
        Ok(serde_json::from_value(self.0.clone())?)
    }

    /// Raw access for logging and diagnostics.
    pub fn raw(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Acknowledgement returned by an actor for a restore command.
///
/// Both variants are valid completions of a restore request and are counted
/// identically by the supervisor's barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The snapshot differed from the current context and was applied.
    Restored,
    /// The snapshot matched the current context; nothing changed.
    SameContext,
}

impl RestoreOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreOutcome::Restored => "restored",
            RestoreOutcome::SameContext => "same-context",
        }
    }
}
