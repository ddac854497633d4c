//! Snapshot renderer handle.
//!
//! A renderer is bound to one frame snapshot and to the resource view that
//! was current when the snapshot was indexed. DOM reconstruction happens
//! elsewhere; this type only guarantees the inputs it is given.

use crate::history::FrameSnapshotRecord;
use crate::resource::{ResourceReference, ResourceView};
use std::sync::Arc;
use tracescope_core::{FrameId, PageId};

/// Query-ready state of one frame at one snapshot
#[derive(Debug, Clone)]
pub struct Renderer {
    resources: Arc<ResourceView>,
    snapshots: Vec<Arc<FrameSnapshotRecord>>,
    index: usize,
}

impl Renderer {
    /// Bind a renderer to `snapshots[index]`.
    ///
    /// Records after `index` are dropped; a renderer never sees the future
    /// of its frame.
    pub(crate) fn new(
        resources: Arc<ResourceView>,
        mut snapshots: Vec<Arc<FrameSnapshotRecord>>,
        index: usize,
    ) -> Self {
        debug_assert!(index < snapshots.len());
        snapshots.truncate(index + 1);
        Self {
            resources,
            snapshots,
            index,
        }
    }

    /// Position of this snapshot within its frame history
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The snapshot this renderer is bound to
    #[must_use]
    pub fn snapshot(&self) -> &FrameSnapshotRecord {
        &self.snapshots[self.index]
    }

    /// Frame history up to and including this snapshot
    #[must_use]
    pub fn snapshots(&self) -> &[Arc<FrameSnapshotRecord>] {
        &self.snapshots
    }

    /// Snapshot name, if the recorder assigned one
    #[must_use]
    pub fn snapshot_name(&self) -> Option<&str> {
        self.snapshot().snapshot_name.as_deref()
    }

    /// Frame the snapshot belongs to
    #[must_use]
    pub fn frame_id(&self) -> &FrameId {
        &self.snapshot().frame_id
    }

    /// Page owning the frame
    #[must_use]
    pub fn page_id(&self) -> &PageId {
        &self.snapshot().page_id
    }

    /// Resource view frozen when this snapshot was indexed
    #[must_use]
    pub fn resources(&self) -> &Arc<ResourceView> {
        &self.resources
    }

    /// Resolve `url` to the fetch that was current for this frame
    #[must_use]
    pub fn resource_by_url(&self, url: &str) -> Option<&ResourceReference> {
        self.resources.resolve(url, self.frame_id().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ResourceIndex, ResourceRecord};

    fn snap(name: &str) -> Arc<FrameSnapshotRecord> {
        Arc::new(FrameSnapshotRecord::new("f1", "p1", true, Some(name)))
    }

    #[test]
    fn test_renderer_binds_to_index() {
        let renderer = Renderer::new(
            Arc::new(ResourceView::default()),
            vec![snap("a"), snap("b"), snap("c")],
            1,
        );

        assert_eq!(renderer.index(), 1);
        assert_eq!(renderer.snapshot_name(), Some("b"));
        assert_eq!(renderer.snapshots().len(), 2);
        assert_eq!(renderer.frame_id().as_str(), "f1");
        assert_eq!(renderer.page_id().as_str(), "p1");
    }

    #[test]
    fn test_renderer_resource_by_url() {
        let mut index = ResourceIndex::new();
        index.add(ResourceRecord::new("r1", "f2", "http://x/a", "h1"));
        index.add(ResourceRecord::new("r2", "f1", "http://x/a", "h2"));
        index.add(ResourceRecord::new("r3", "f2", "http://x/a", "h3"));

        let renderer = Renderer::new(index.freeze(), vec![snap("s")], 0);
        let resolved = renderer.resource_by_url("http://x/a").unwrap();
        assert_eq!(resolved.resource_id.as_str(), "r2");
        assert!(renderer.resource_by_url("http://x/b").is_none());
    }
}
