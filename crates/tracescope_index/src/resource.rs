//! Resource index: captured network fetches and the per-URL reference
//! lists used to answer "which fetch of this URL was current".

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracescope_core::{ContentHash, FrameId, ResourceId};

/// One captured network fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Resource ID, unique within a trace
    pub resource_id: ResourceId,
    /// Frame that issued the request
    pub frame_id: FrameId,
    /// Request URL
    pub url: String,
    /// Hash naming the response body in the blob store
    pub content_hash: ContentHash,
    /// Remaining recorder fields (headers, timing, content type)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceRecord {
    /// Create a record with no extra fields
    #[must_use]
    pub fn new(
        resource_id: impl Into<ResourceId>,
        frame_id: impl Into<FrameId>,
        url: impl Into<String>,
        content_hash: impl Into<ContentHash>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            frame_id: frame_id.into(),
            url: url.into(),
            content_hash: content_hash.into(),
            extra: Map::new(),
        }
    }

    /// The reference this record contributes to its URL's list
    #[must_use]
    pub fn reference(&self) -> ResourceReference {
        ResourceReference {
            frame_id: self.frame_id.clone(),
            resource_id: self.resource_id.clone(),
        }
    }
}

/// A fetch of some URL by some frame, in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    /// Frame that fetched the URL
    pub frame_id: FrameId,
    /// Resource holding the response
    pub resource_id: ResourceId,
}

/// Frozen URL to reference-list map, as of one point in the trace.
///
/// Views never change after creation: appends made to the index later are
/// invisible, both for new URLs and for URLs already present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceView {
    by_url: IndexMap<String, Arc<Vec<ResourceReference>>>,
}

impl ResourceView {
    /// References recorded for `url`, oldest first
    #[must_use]
    pub fn references(&self, url: &str) -> &[ResourceReference] {
        self.by_url.get(url).map(|refs| refs.as_slice()).unwrap_or(&[])
    }

    /// Resolve the fetch of `url` that was current for `frame_id`.
    ///
    /// Prefers the latest fetch by the same frame, then the latest fetch by
    /// any frame (a memory-cached response shared across frames).
    #[must_use]
    pub fn resolve(&self, url: &str, frame_id: &str) -> Option<&ResourceReference> {
        let refs = self.references(url);
        refs.iter()
            .rev()
            .find(|r| r.frame_id.as_str() == frame_id)
            .or_else(|| refs.last())
    }

    /// URLs in first-seen order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.by_url.keys().map(String::as_str)
    }

    /// Number of distinct URLs
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    /// Check if no URL was known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }

    /// Check if any URL references `resource_id`
    #[must_use]
    pub fn contains_resource(&self, resource_id: &str) -> bool {
        self.by_url
            .values()
            .any(|refs| refs.iter().any(|r| r.resource_id.as_str() == resource_id))
    }
}

/// Append-only index of resources
#[derive(Debug, Default)]
pub struct ResourceIndex {
    records: Vec<ResourceRecord>,
    by_id: HashMap<ResourceId, usize>,
    by_url: IndexMap<String, Arc<Vec<ResourceReference>>>,
    // Reused by consecutive freezes with no resource added in between.
    frozen: Option<Arc<ResourceView>>,
}

impl ResourceIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource.
    ///
    /// A repeated resource id keeps both records in order; lookups by id
    /// return the later one.
    pub fn add(&mut self, record: ResourceRecord) {
        let position = self.records.len();
        if self.by_id.insert(record.resource_id.clone(), position).is_some() {
            tracing::warn!(resource_id = %record.resource_id, "duplicate resource id, later record wins");
        }

        // Copies the list only if a frozen view still shares it.
        let refs = self.by_url.entry(record.url.clone()).or_default();
        Arc::make_mut(refs).push(record.reference());

        tracing::debug!(
            resource_id = %record.resource_id,
            frame_id = %record.frame_id,
            url = %record.url,
            "indexed resource"
        );
        self.records.push(record);
        self.frozen = None;
    }

    /// All records in insertion order
    #[must_use]
    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    /// Look up a resource by id
    #[must_use]
    pub fn get(&self, resource_id: &str) -> Option<&ResourceRecord> {
        self.by_id.get(resource_id).map(|&i| &self.records[i])
    }

    /// Snapshot the URL reference map as it is right now
    pub fn freeze(&mut self) -> Arc<ResourceView> {
        if let Some(view) = &self.frozen {
            return Arc::clone(view);
        }
        let view = Arc::new(ResourceView {
            by_url: self.by_url.clone(),
        });
        self.frozen = Some(Arc::clone(&view));
        view
    }

    /// Number of records, counting repeated ids
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct URLs
    #[must_use]
    pub fn url_count(&self) -> usize {
        self.by_url.len()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_id.clear();
        self.by_url.clear();
        self.frozen = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: &str, frame: &str, url: &str) -> ResourceRecord {
        ResourceRecord::new(id, frame, url, format!("hash-{}", id))
    }

    #[test]
    fn test_add_and_lookup() {
        let mut index = ResourceIndex::new();
        index.add(record("r1", "f1", "http://x/a"));
        index.add(record("r2", "f1", "http://x/b"));

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("r1").unwrap().url, "http://x/a");
        assert_eq!(index.get("r2").unwrap().content_hash.as_str(), "hash-r2");
        assert!(index.get("r3").is_none());
    }

    #[test]
    fn test_duplicate_id_later_wins() {
        let mut index = ResourceIndex::new();
        index.add(record("r1", "f1", "http://x/a"));
        index.add(record("r1", "f1", "http://x/b"));

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("r1").unwrap().url, "http://x/b");
    }

    #[test]
    fn test_references_keep_arrival_order() {
        let mut index = ResourceIndex::new();
        index.add(record("r1", "f1", "http://x/a"));
        index.add(record("r2", "f2", "http://x/a"));
        index.add(record("r3", "f1", "http://x/a"));

        let view = index.freeze();
        let ids: Vec<_> = view
            .references("http://x/a")
            .iter()
            .map(|r| r.resource_id.as_str())
            .collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_frozen_view_does_not_grow() {
        let mut index = ResourceIndex::new();
        index.add(record("r1", "f1", "http://x/a"));
        let before = index.freeze();

        index.add(record("r2", "f1", "http://x/a"));
        index.add(record("r3", "f1", "http://x/new"));
        let after = index.freeze();

        assert_eq!(before.references("http://x/a").len(), 1);
        assert!(before.references("http://x/new").is_empty());
        assert_eq!(after.references("http://x/a").len(), 2);
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn test_freeze_reuses_view_when_unchanged() {
        let mut index = ResourceIndex::new();
        index.add(record("r1", "f1", "http://x/a"));
        let v1 = index.freeze();
        let v2 = index.freeze();
        assert!(Arc::ptr_eq(&v1, &v2));

        index.add(record("r2", "f1", "http://x/b"));
        let v3 = index.freeze();
        assert!(!Arc::ptr_eq(&v1, &v3));
    }

    #[test]
    fn test_resolve_prefers_same_frame() {
        let mut index = ResourceIndex::new();
        index.add(record("r1", "f1", "http://x/a"));
        index.add(record("r2", "f2", "http://x/a"));
        let view = index.freeze();

        assert_eq!(view.resolve("http://x/a", "f1").unwrap().resource_id.as_str(), "r1");
        assert_eq!(view.resolve("http://x/a", "f2").unwrap().resource_id.as_str(), "r2");
        // Falls back to the latest fetch from any frame.
        assert_eq!(view.resolve("http://x/a", "f3").unwrap().resource_id.as_str(), "r2");
        assert!(view.resolve("http://x/missing", "f1").is_none());
    }

    #[test]
    fn test_clear() {
        let mut index = ResourceIndex::new();
        index.add(record("r1", "f1", "http://x/a"));
        let _ = index.freeze();
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.url_count(), 0);
        assert!(index.get("r1").is_none());
        assert!(index.freeze().is_empty());
    }

    #[test]
    fn test_record_extra_fields_roundtrip() {
        let line = r#"{"resourceId":"r1","frameId":"f1","url":"http://x/a","contentHash":"h1","contentType":"text/css"}"#;
        let record: ResourceRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.resource_id.as_str(), "r1");
        assert_eq!(record.extra.get("contentType").and_then(Value::as_str), Some("text/css"));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["contentType"], "text/css");
        assert_eq!(back["contentHash"], "h1");
    }

    proptest! {
        #[test]
        fn prop_insertion_order_and_lookup(ids in proptest::collection::vec(0u8..8, 0..40)) {
            let mut index = ResourceIndex::new();
            let records: Vec<_> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| record(&format!("r{}", id), "f1", &format!("http://x/{}", i)))
                .collect();
            for r in &records {
                index.add(r.clone());
            }

            prop_assert_eq!(index.records(), records.as_slice());
            for r in &records {
                let last = records.iter().rev().find(|o| o.resource_id == r.resource_id);
                prop_assert_eq!(index.get(r.resource_id.as_str()), last);
            }
            prop_assert!(index.get("never-added").is_none());
        }
    }
}
