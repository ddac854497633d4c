//! TRACESCOPE Index
//!
//! In-memory index over a recorded browser trace: captured resources, the
//! per-frame snapshot history, and one renderer per snapshot bound to the
//! resources known at the moment it was indexed.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod history;
pub mod renderer;
pub mod resource;
pub mod storage;
pub mod subscription;

pub use history::{FrameHistory, FrameSnapshotRecord, SnapshotHistory};
pub use renderer::Renderer;
pub use resource::{ResourceIndex, ResourceRecord, ResourceReference, ResourceView};
pub use storage::{StorageStats, TraceStorage};
pub use subscription::{SnapshotSubscription, SubscriptionId, Subscriptions};
