use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::history::{ActorId, HistoryActor, HistoryError, RestoreOutcome, Snapshot};

/// Restorable label selection. Label `0` is background/no-cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSelection {
    pub foreground: u32,
    pub background: u32,
}

impl Default for LabelSelection {
    fn default() -> Self {
        Self {
            foreground: 1,
            background: 0,
        }
    }
}

/// Holder of the foreground/background cell labels used by editing tools.
pub struct LabelSelectActor {
    id: ActorId,
    context: RwLock<LabelSelection>,
}

impl LabelSelectActor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ActorId::new(),
            context: RwLock::new(LabelSelection::default()),
        })
    }

    pub fn selection(&self) -> LabelSelection {
        *self.context.read()
    }

    pub fn select_foreground(&self, label: u32) {
        self.context.write().foreground = label;
    }

    pub fn select_background(&self, label: u32) {
        self.context.write().background = label;
    }

    /// Swap foreground and background labels.
    pub fn swap(&self) {
        let context = &mut *self.context.write();
        std::mem::swap(&mut context.foreground, &mut context.background);
    }
}

#[async_trait]
impl HistoryActor for LabelSelectActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> &str {
        "labels"
    }

    async fn save(&self) -> Result<Snapshot, HistoryError> {
        Snapshot::capture(&self.selection())
    }

    async fn restore(&self, snapshot: Snapshot) -> Result<RestoreOutcome, HistoryError> {
        let saved: LabelSelection = snapshot.decode()?;
        let mut context = self.context.write();
        if *context == saved {
            return Ok(RestoreOutcome::SameContext);
        }
        *context = saved;
        Ok(RestoreOutcome::Restored)
    }
}
