//! Component actors participating in history coordination.
//!
//! Each actor owns one facet of document state and implements the
//! [`HistoryActor`](crate::history::HistoryActor) save/restore contract.
//! Snapshots stay minimal: indices, offsets, and selections, never decoded
//! frames or pixel data.

pub mod image_view;
pub mod labels;
pub mod tool;
pub mod viewport;

pub use image_view::{FrameLoader, ImageViewActor, ImageViewContext};
pub use labels::{LabelSelectActor, LabelSelection};
pub use tool::{ToolActor, ToolKind};
pub use viewport::{ViewportActor, ViewportContext};
