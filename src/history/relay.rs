//! Backend sync relay contract.
//!
//! The server keeps its own edit log for the label arrays. After every
//! locally-confirmed undo or redo round the supervisor fires exactly one
//! trigger so the server log steps in the same direction, bounding
//! client/server divergence to the duration of a single round. Executing the
//! trigger against the server is the network layer's business.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::history::error::HistoryError;

/// One-way trigger relayed to the network layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// Roll the server-side edit log back one step.
    BackendUndo,
    /// Replay the server-side edit log forward one step.
    BackendRedo,
}

/// Contract between the supervisor and the server-side edit log.
///
/// Triggers are invoked only after every local tracker has confirmed the
/// corresponding local round.
#[async_trait]
pub trait BackendSync: Send + Sync {
    async fn backend_undo(&self) -> Result<(), HistoryError>;
    async fn backend_redo(&self) -> Result<(), HistoryError>;
}

/// Relay that forwards triggers onto a channel consumed by the network layer.
pub struct ChannelBackendSync {
    tx: mpsc::Sender<SyncTrigger>,
}

impl ChannelBackendSync {
    /// Create a relay and the receiving end for the network layer.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<SyncTrigger>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    async fn send(&self, trigger: SyncTrigger) -> Result<(), HistoryError> {
        self.tx
            .send(trigger)
            .await
            .map_err(|_| HistoryError::RelayUnavailable)
    }
}

#[async_trait]
impl BackendSync for ChannelBackendSync {
    async fn backend_undo(&self) -> Result<(), HistoryError> {
        self.send(SyncTrigger::BackendUndo).await
    }

    async fn backend_redo(&self) -> Result<(), HistoryError> {
        self.send(SyncTrigger::BackendRedo).await
    }
}
