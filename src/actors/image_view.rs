use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::history::{ActorId, HistoryActor, HistoryError, RestoreOutcome, Snapshot};

/// Restorable frame/feature/channel selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageViewContext {
    pub frame: usize,
    pub feature: usize,
    pub channel: usize,
}

/// Re-fetch hook for derived image data.
///
/// Restoring a changed frame/feature/channel selection leaves the decoded
/// pixel buffer stale; the loader is how the actor asks the (out-of-scope)
/// fetch layer to make it consistent again.
#[async_trait]
pub trait FrameLoader: Send + Sync {
    async fn load_frame(
        &self,
        frame: usize,
        feature: usize,
        channel: usize,
    ) -> Result<(), HistoryError>;
}

/// Holder of the current frame/feature/channel indices.
pub struct ImageViewActor {
    id: ActorId,
    context: RwLock<ImageViewContext>,
    loader: Option<Arc<dyn FrameLoader>>,
}

impl ImageViewActor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ActorId::new(),
            context: RwLock::new(ImageViewContext::default()),
            loader: None,
        })
    }

    /// Attach the re-fetch hook invoked on cascading restores.
    pub fn with_loader(loader: Arc<dyn FrameLoader>) -> Arc<Self> {
        Arc::new(Self {
            id: ActorId::new(),
            context: RwLock::new(ImageViewContext::default()),
            loader: Some(loader),
        })
    }

    pub fn view(&self) -> ImageViewContext {
        *self.context.read()
    }

    pub fn set_frame(&self, frame: usize) {
        self.context.write().frame = frame;
    }

    pub fn set_feature(&self, feature: usize) {
        self.context.write().feature = feature;
    }

    pub fn set_channel(&self, channel: usize) {
        self.context.write().channel = channel;
    }
}

#[async_trait]
impl HistoryActor for ImageViewActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> &str {
        "image-view"
    }

    async fn save(&self) -> Result<Snapshot, HistoryError> {
        Snapshot::capture(&self.view())
    }

    async fn restore(&self, snapshot: Snapshot) -> Result<RestoreOutcome, HistoryError> {
        let saved: ImageViewContext = snapshot.decode()?;
        {
            let mut context = self.context.write();
            if *context == saved {
                return Ok(RestoreOutcome::SameContext);
            }
            *context = saved;
        }
        // The indices changed; the dependent pixel buffer must follow.
        if let Some(loader) = &self.loader {
            debug!(
                frame = saved.frame,
                feature = saved.feature,
                channel = saved.channel,
                "reloading frame after restore"
            );
            loader
                .load_frame(saved.frame, saved.feature, saved.channel)
                .await?;
        }
        Ok(RestoreOutcome::Restored)
    }
}
