//! Filesystem-backed blob store.
//!
//! Each blob lives in its own file inside one directory, named exactly by
//! its content hash. Reads are synchronous and go straight to disk.

use crate::blob::BlobStore;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracescope_core::ContentHash;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one file per blob
    pub blob_dir: PathBuf,
    /// Create the directory if it does not exist
    pub create_dir: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            blob_dir: PathBuf::from("resources"),
            create_dir: false,
        }
    }
}

/// Store error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Blob directory does not exist
    #[error("blob directory not found: {}", path.display())]
    MissingDirectory {
        /// Configured directory
        path: PathBuf,
    },

    /// Blob directory could not be created
    #[error("failed to create blob directory {}: {source}", path.display())]
    CreateDirectory {
        /// Configured directory
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

/// Blob store reading from a directory of hash-named files
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    /// Create a store over `dir` without touching the filesystem
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open a store from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the directory is missing and may not be created
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let dir = config.blob_dir.clone();
        if !dir.is_dir() {
            if !config.create_dir {
                return Err(StoreError::MissingDirectory { path: dir });
            }
            std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;
            tracing::debug!(dir = %dir.display(), "created blob directory");
        }
        Ok(Self { dir })
    }

    /// Directory this store reads from
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `hash`
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] if the hash is not a plain
    /// file name
    pub fn blob_path(&self, hash: &ContentHash) -> io::Result<PathBuf> {
        hash.validate()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        Ok(self.dir.join(hash.as_str()))
    }

}

impl BlobStore for FsBlobStore {
    fn read(&self, hash: &ContentHash) -> io::Result<Bytes> {
        let path = self.blob_path(hash)?;
        let data = std::fs::read(&path)?;
        tracing::trace!(hash = %hash, bytes = data.len(), "read blob");
        Ok(Bytes::from(data))
    }

    fn contains(&self, hash: &ContentHash) -> bool {
        self.blob_path(hash).map(|p| p.is_file()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default() {
        let config = StoreConfig::default();
        assert_eq!(config.blob_dir, PathBuf::from("resources"));
        assert!(!config.create_dir);
    }

    #[test]
    fn test_fs_read_recorded_hash() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("h1"), b"<html></html>").unwrap();

        let store = FsBlobStore::new(dir.path());
        let data = store.read(&ContentHash::from("h1")).unwrap();
        assert_eq!(&data[..], b"<html></html>");
        assert!(store.contains(&ContentHash::from("h1")));
    }

    #[test]
    fn test_fs_missing_blob_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let err = store.read(&ContentHash::from("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!store.contains(&ContentHash::from("missing")));
    }

    #[test]
    fn test_fs_rejects_path_escape() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let err = store.read(&ContentHash::from("../secret")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_fs_open_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            blob_dir: dir.path().join("nope"),
            create_dir: false,
        };
        assert!(matches!(
            FsBlobStore::open(&config),
            Err(StoreError::MissingDirectory { .. })
        ));
    }

    #[test]
    fn test_fs_open_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            blob_dir: dir.path().join("blobs"),
            create_dir: true,
        };
        let store = FsBlobStore::open(&config).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_store_config_serde() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"blob_dir":"/tmp/blobs","create_dir":true}"#).unwrap();
        assert_eq!(config.blob_dir, PathBuf::from("/tmp/blobs"));
        assert!(config.create_dir);
    }
}
