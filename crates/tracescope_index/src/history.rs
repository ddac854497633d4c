//! Per-frame snapshot history.
//!
//! Every appended snapshot gets exactly one renderer, so for each frame
//! `snapshots()[i]` pairs with `renderers()[i]`. Main frames are also
//! reachable by page id through a secondary index.

use crate::renderer::Renderer;
use crate::resource::ResourceView;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracescope_core::{FrameId, PageId};

/// One point-in-time DOM capture of a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshotRecord {
    /// Captured frame
    pub frame_id: FrameId,
    /// Page owning the frame
    pub page_id: PageId,
    /// Whether the frame is the page's main frame
    #[serde(default)]
    pub is_main_frame: bool,
    /// Name assigned by the recorder; not unique
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_name: Option<String>,
    /// Rendering data, opaque to the index
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl FrameSnapshotRecord {
    /// Create a record with an empty payload
    #[must_use]
    pub fn new(
        frame_id: impl Into<FrameId>,
        page_id: impl Into<PageId>,
        is_main_frame: bool,
        snapshot_name: Option<&str>,
    ) -> Self {
        Self {
            frame_id: frame_id.into(),
            page_id: page_id.into(),
            is_main_frame,
            snapshot_name: snapshot_name.map(str::to_string),
            payload: Map::new(),
        }
    }
}

/// Snapshots and renderers of one frame
#[derive(Debug)]
pub struct FrameHistory {
    frame_id: FrameId,
    snapshots: Vec<Arc<FrameSnapshotRecord>>,
    renderers: Vec<Arc<Renderer>>,
}

impl FrameHistory {
    fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            snapshots: Vec::new(),
            renderers: Vec::new(),
        }
    }

    fn push(&mut self, record: FrameSnapshotRecord, resources: Arc<ResourceView>) -> Arc<Renderer> {
        self.snapshots.push(Arc::new(record));
        let index = self.snapshots.len() - 1;
        let renderer = Arc::new(Renderer::new(resources, self.snapshots.clone(), index));
        self.renderers.push(Arc::clone(&renderer));
        renderer
    }

    /// Frame this history belongs to
    #[must_use]
    pub fn frame_id(&self) -> &FrameId {
        &self.frame_id
    }

    /// Raw snapshots in append order
    #[must_use]
    pub fn snapshots(&self) -> &[Arc<FrameSnapshotRecord>] {
        &self.snapshots
    }

    /// Renderers, index-aligned with [`Self::snapshots`]
    #[must_use]
    pub fn renderers(&self) -> &[Arc<Renderer>] {
        &self.renderers
    }

    /// Number of snapshots
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// First renderer whose snapshot is named `name`
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Renderer>> {
        self.renderers
            .iter()
            .find(|r| r.snapshot_name() == Some(name))
    }
}

/// Snapshot histories of every frame in a trace
#[derive(Debug, Default)]
pub struct SnapshotHistory {
    frames: HashMap<FrameId, FrameHistory>,
    page_frames: HashMap<PageId, FrameId>,
    snapshot_count: usize,
}

impl SnapshotHistory {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot and build its renderer over `resources`
    pub fn append(
        &mut self,
        record: FrameSnapshotRecord,
        resources: Arc<ResourceView>,
    ) -> Arc<Renderer> {
        let history = match self.frames.entry(record.frame_id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                if record.is_main_frame {
                    tracing::debug!(
                        page_id = %record.page_id,
                        frame_id = %record.frame_id,
                        "main frame registered for page"
                    );
                    self.page_frames
                        .insert(record.page_id.clone(), record.frame_id.clone());
                }
                entry.insert(FrameHistory::new(record.frame_id.clone()))
            }
        };
        let renderer = history.push(record, resources);
        self.snapshot_count += 1;

        tracing::debug!(
            frame_id = %renderer.frame_id(),
            index = renderer.index(),
            name = renderer.snapshot_name().unwrap_or(""),
            "indexed frame snapshot"
        );
        renderer
    }

    /// Find a frame history by page id, then by frame id
    ///
    /// A page alias wins over a frame whose id happens to equal the page id.
    #[must_use]
    pub fn resolve(&self, page_or_frame_id: &str) -> Option<&FrameHistory> {
        self.page_frames
            .get(page_or_frame_id)
            .and_then(|frame_id| self.frames.get(frame_id))
            .or_else(|| self.frames.get(page_or_frame_id))
    }

    /// First renderer named `name` in the resolved frame history
    #[must_use]
    pub fn snapshot_by_name(&self, page_or_frame_id: &str, name: &str) -> Option<&Arc<Renderer>> {
        self.resolve(page_or_frame_id)?.find_by_name(name)
    }

    /// Number of frames with at least one snapshot
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total snapshots across all frames
    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.snapshot_count
    }

    /// Remove every frame and page alias
    pub fn clear(&mut self) {
        self.frames.clear();
        self.page_frames.clear();
        self.snapshot_count = 0;
    }
}
