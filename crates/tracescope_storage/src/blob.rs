//! Blob store abstraction and the in-memory backing.

use bytes::Bytes;
use std::collections::HashMap;
use std::io;
use std::sync::{PoisonError, RwLock};
use tracescope_core::ContentHash;

/// Source of resource bodies keyed by content hash.
///
/// A missing blob is reported as an [`io::Error`] of kind
/// [`io::ErrorKind::NotFound`], the same way the filesystem reports it.
pub trait BlobStore: Send + Sync {
    /// Read the bytes stored under `hash`
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the blob cannot be read
    fn read(&self, hash: &ContentHash) -> io::Result<Bytes>;

    /// Check if a blob exists
    fn contains(&self, hash: &ContentHash) -> bool;
}

/// In-memory blob store, used by live capture and tests
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<ContentHash, Bytes>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes under their BLAKE3 hash and return it
    pub fn write(&self, data: impl Into<Bytes>) -> ContentHash {
        let data = data.into();
        let hash = ContentHash::of(&data);
        self.insert(hash.clone(), data);
        hash
    }

    /// Store bytes under a hash assigned by the recorder
    pub fn insert(&self, hash: ContentHash, data: impl Into<Bytes>) {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hash, data.into());
    }

    /// Number of stored blobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all blobs
    pub fn clear(&self) {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, hash: &ContentHash) -> io::Result<Bytes> {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(hash)
            .cloned()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("blob not found: {}", hash))
            })
    }

    fn contains(&self, hash: &ContentHash) -> bool {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_write_read() {
        let store = MemoryBlobStore::new();
        let hash = store.write(b"hello".to_vec());

        let data = store.read(&hash).unwrap();
        assert_eq!(&data[..], b"hello");
        assert!(store.contains(&hash));
    }

    #[test]
    fn test_memory_insert_recorded_hash() {
        let store = MemoryBlobStore::new();
        store.insert(ContentHash::from("h1"), Bytes::from_static(b"body"));

        assert_eq!(&store.read(&ContentHash::from("h1")).unwrap()[..], b"body");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_missing_is_not_found() {
        let store = MemoryBlobStore::new();
        let err = store.read(&ContentHash::from("absent")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_memory_write_duplicate() {
        let store = MemoryBlobStore::new();
        let h1 = store.write(b"same".to_vec());
        let h2 = store.write(b"same".to_vec());
        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_clear() {
        let store = MemoryBlobStore::new();
        store.write(b"x".to_vec());
        store.clear();
        assert!(store.is_empty());
    }
}
