pub mod actor;
pub mod barrier;
pub mod error;
pub mod mock;
pub mod relay;
pub mod snapshot;
pub mod supervisor;
pub mod tracker;

pub use actor::{ActorId, HistoryActor};
pub use barrier::RoundBarrier;
pub use error::HistoryError;
pub use relay::{BackendSync, ChannelBackendSync, SyncTrigger};
pub use snapshot::{RestoreOutcome, Snapshot};
pub use supervisor::{EditRequest, Supervisor, SupervisorState, SupervisorStatus};
pub use tracker::{TrackerHandle, TrackerStats};
