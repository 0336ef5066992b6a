pub mod actors;
pub mod config;
pub mod history;

pub use actors::{
    FrameLoader, ImageViewActor, ImageViewContext, LabelSelectActor, LabelSelection, ToolActor,
    ToolKind, ViewportActor, ViewportContext,
};
pub use config::{ConfigError, HistoryConfig};
pub use history::{
    ActorId, BackendSync, ChannelBackendSync, EditRequest, HistoryActor, HistoryError,
    RestoreOutcome, RoundBarrier, Snapshot, Supervisor, SupervisorState, SupervisorStatus,
    SyncTrigger, TrackerHandle, TrackerStats,
};
