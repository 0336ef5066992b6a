use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::history::{ActorId, HistoryActor, HistoryError, RestoreOutcome, Snapshot};

const MIN_ZOOM: f64 = 0.125;
const MAX_ZOOM: f64 = 64.0;

/// Restorable pan/zoom state of the canvas viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportContext {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for ViewportContext {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Pan/zoom state holder for the annotation canvas.
///
/// The rendering pipeline consumes the restored parameters; the actor only
/// tracks them. Snapshots carry exactly `{x, y, zoom}`.
pub struct ViewportActor {
    id: ActorId,
    context: RwLock<ViewportContext>,
}

impl ViewportActor {
    pub fn new() -> Arc<Self> {
        Self::with_context(ViewportContext::default())
    }

    pub fn with_context(context: ViewportContext) -> Arc<Self> {
        Arc::new(Self {
            id: ActorId::new(),
            context: RwLock::new(context),
        })
    }

    pub fn view(&self) -> ViewportContext {
        *self.context.read()
    }

    /// Translate the viewport by canvas-space offsets.
    pub fn pan(&self, dx: f64, dy: f64) {
        let mut context = self.context.write();
        context.x += dx;
        context.y += dy;
    }

    /// Set the zoom factor, clamped to the supported range.
    pub fn set_zoom(&self, zoom: f64) {
        self.context.write().zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[async_trait]
impl HistoryActor for ViewportActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> &str {
        "viewport"
    }

    async fn save(&self) -> Result<Snapshot, HistoryError> {
        Snapshot::capture(&self.view())
    }

    async fn restore(&self, snapshot: Snapshot) -> Result<RestoreOutcome, HistoryError> {
        let saved: ViewportContext = snapshot.decode()?;
        let mut context = self.context.write();
        if *context == saved {
            return Ok(RestoreOutcome::SameContext);
        }
        *context = saved;
        Ok(RestoreOutcome::Restored)
    }
}
