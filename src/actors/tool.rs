use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::history::{ActorId, HistoryActor, HistoryError, RestoreOutcome, Snapshot};

/// The closed set of editing tools and their per-tool state.
///
/// The active tool is a tagged-variant slot rather than a freshly spawned
/// object per tool change, so the tracker always follows one stable actor
/// whose snapshot is the active variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolKind {
    Select,
    Brush { size: u32, erase: bool },
    Flood,
    Threshold { min: f32, max: f32 },
    Trim,
    Watershed,
}

impl ToolKind {
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Brush { .. } => "brush",
            ToolKind::Flood => "flood",
            ToolKind::Threshold { .. } => "threshold",
            ToolKind::Trim => "trim",
            ToolKind::Watershed => "watershed",
        }
    }
}

impl Default for ToolKind {
    fn default() -> Self {
        ToolKind::Select
    }
}

/// Holder of the active tool variant.
pub struct ToolActor {
    id: ActorId,
    context: RwLock<ToolKind>,
}

impl ToolActor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ActorId::new(),
            context: RwLock::new(ToolKind::default()),
        })
    }

    pub fn tool(&self) -> ToolKind {
        *self.context.read()
    }

    pub fn select_tool(&self, tool: ToolKind) {
        *self.context.write() = tool;
    }
}

#[async_trait]
impl HistoryActor for ToolActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> &str {
        "tool"
    }

    async fn save(&self) -> Result<Snapshot, HistoryError> {
        Snapshot::capture(&self.tool())
    }

    async fn restore(&self, snapshot: Snapshot) -> Result<RestoreOutcome, HistoryError> {
        let saved: ToolKind = snapshot.decode()?;
        let mut context = self.context.write();
        if *context == saved {
            return Ok(RestoreOutcome::SameContext);
        }
        *context = saved;
        Ok(RestoreOutcome::Restored)
    }
}
