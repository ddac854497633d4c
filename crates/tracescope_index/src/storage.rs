//! Trace storage facade.
//!
//! Producers feed resources and frame snapshots in trace order; viewers
//! query them by id and name, and subscribe to renderers as they are built.
//! Mutation needs `&mut self`: there is exactly one writer.

use crate::history::{FrameHistory, FrameSnapshotRecord, SnapshotHistory};
use crate::renderer::Renderer;
use crate::resource::{ResourceIndex, ResourceRecord};
use crate::subscription::{SnapshotSubscription, SubscriptionId, Subscriptions};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tracescope_core::ContentHash;
use tracescope_storage::{BlobStore, MemoryBlobStore};

/// Index statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    /// Resource records, counting repeated ids
    pub resources: usize,
    /// Distinct resource URLs
    pub urls: usize,
    /// Frames with at least one snapshot
    pub frames: usize,
    /// Frame snapshots across all frames
    pub snapshots: usize,
}

/// Index over one recorded trace
pub struct TraceStorage {
    blobs: Arc<dyn BlobStore>,
    resources: ResourceIndex,
    history: SnapshotHistory,
    subscriptions: Subscriptions,
}

impl TraceStorage {
    /// Create an empty index reading content from `blobs`
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            blobs,
            resources: ResourceIndex::new(),
            history: SnapshotHistory::new(),
            subscriptions: Subscriptions::new(),
        }
    }

    /// Create an empty index over a fresh in-memory blob store
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBlobStore::new()))
    }

    /// Index a captured resource
    pub fn add_resource(&mut self, record: ResourceRecord) {
        self.resources.add(record);
    }

    /// Index a frame snapshot and notify subscribers.
    ///
    /// The returned renderer sees every resource added before this call.
    pub fn add_frame_snapshot(&mut self, record: FrameSnapshotRecord) -> Arc<Renderer> {
        let view = self.resources.freeze();
        let renderer = self.history.append(record, view);
        self.subscriptions.publish(&renderer);
        renderer
    }

    /// Reset to the empty state; subscriptions stay registered
    pub fn clear(&mut self) {
        self.resources.clear();
        self.history.clear();
        tracing::debug!("trace storage cleared");
    }

    /// Copy of all resources in insertion order
    #[must_use]
    pub fn resources(&self) -> Vec<ResourceRecord> {
        self.resources.records().to_vec()
    }

    /// Look up a resource by id
    #[must_use]
    pub fn resource_by_id(&self, resource_id: &str) -> Option<&ResourceRecord> {
        self.resources.get(resource_id)
    }

    /// Fetch resource bytes from the blob store
    ///
    /// # Errors
    ///
    /// Returns the blob store's I/O error, e.g. `NotFound` for a missing blob
    pub fn resource_content(&self, hash: &ContentHash) -> io::Result<Bytes> {
        self.blobs.read(hash)
    }

    /// First snapshot named `name` for a page or frame
    #[must_use]
    pub fn snapshot_by_name(&self, page_or_frame_id: &str, name: &str) -> Option<Arc<Renderer>> {
        self.history
            .snapshot_by_name(page_or_frame_id, name)
            .map(Arc::clone)
    }

    /// Snapshot history of a page or frame
    #[must_use]
    pub fn frame_history(&self, page_or_frame_id: &str) -> Option<&FrameHistory> {
        self.history.resolve(page_or_frame_id)
    }

    /// Renderers of a page or frame in append order
    #[must_use]
    pub fn renderers(&self, page_or_frame_id: &str) -> Option<&[Arc<Renderer>]> {
        self.frame_history(page_or_frame_id)
            .map(FrameHistory::renderers)
    }

    /// Receive every renderer built from now on
    ///
    /// Delivery goes through an unbounded per-subscriber queue: renderers
    /// the subscriber has not read yet stay queued (and keep their resource
    /// views alive) until it reads them, unsubscribes, or drops the
    /// subscription.
    pub fn subscribe(&mut self) -> SnapshotSubscription {
        self.subscriptions.subscribe()
    }

    /// Stop delivering to a subscription
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    /// Number of live subscriptions
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Current index statistics
    #[must_use]
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            resources: self.resources.len(),
            urls: self.resources.url_count(),
            frames: self.history.frame_count(),
            snapshots: self.history.snapshot_count(),
        }
    }
}

impl Default for TraceStorage {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for TraceStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceStorage")
            .field("stats", &self.stats())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}
