//! Trace loader.
//!
//! Replays `<prefix>-network.trace` fully, then `<prefix>-dom.trace`, so
//! every resource is indexed before the first snapshot regardless of the
//! original wall-clock interleaving.

use crate::error::LoadError;
use crate::trace::{TraceLog, parse_lines};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracescope_index::{FrameSnapshotRecord, ResourceRecord, TraceStorage};
use tracescope_storage::{FsBlobStore, StoreConfig};

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Appended to the prefix to name the network log
    pub network_suffix: String,
    /// Appended to the prefix to name the DOM log
    pub dom_suffix: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            network_suffix: "-network.trace".to_string(),
            dom_suffix: "-dom.trace".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Path of one log for a trace prefix
    #[must_use]
    pub fn log_path(&self, prefix: &Path, log: TraceLog) -> PathBuf {
        let suffix = match log {
            TraceLog::Network => &self.network_suffix,
            TraceLog::Dom => &self.dom_suffix,
        };
        let mut path = prefix.as_os_str().to_owned();
        path.push(suffix);
        PathBuf::from(path)
    }

    /// `<prefix><network_suffix>`
    #[must_use]
    pub fn network_path(&self, prefix: &Path) -> PathBuf {
        self.log_path(prefix, TraceLog::Network)
    }

    /// `<prefix><dom_suffix>`
    #[must_use]
    pub fn dom_path(&self, prefix: &Path) -> PathBuf {
        self.log_path(prefix, TraceLog::Dom)
    }
}

/// Counts of replayed records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Resources added from the network log
    pub resources: usize,
    /// Snapshots added from the DOM log
    pub snapshots: usize,
}

/// Replays persisted trace logs into a [`TraceStorage`]
#[derive(Debug, Clone, Default)]
pub struct TraceLoader {
    config: LoaderConfig,
}

impl TraceLoader {
    /// Create a loader with the default file naming
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    #[must_use]
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Loader configuration
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load both logs of the trace at `prefix` into `storage`.
    ///
    /// # Errors
    ///
    /// Returns error if a log cannot be read or holds a malformed line.
    /// Records replayed before the failure stay indexed.
    pub async fn load(
        &self,
        storage: &mut TraceStorage,
        prefix: impl AsRef<Path>,
    ) -> Result<LoadReport, LoadError> {
        let prefix = prefix.as_ref();
        let mut report = LoadReport::default();

        let network_path = self.config.network_path(prefix);
        let text = read_log(&network_path).await?;
        for record in parse_lines::<ResourceRecord>(&network_path, &text) {
            storage.add_resource(record?);
            report.resources += 1;
        }

        let dom_path = self.config.dom_path(prefix);
        let text = read_log(&dom_path).await?;
        for record in parse_lines::<FrameSnapshotRecord>(&dom_path, &text) {
            storage.add_frame_snapshot(record?);
            report.snapshots += 1;
        }

        tracing::info!(
            prefix = %prefix.display(),
            resources = report.resources,
            snapshots = report.snapshots,
            "trace loaded"
        );
        Ok(report)
    }
}

async fn read_log(path: &Path) -> Result<String, LoadError> {
    tracing::debug!(path = %path.display(), "reading trace log");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the trace at `prefix` into a new storage backed by a blob directory
///
/// # Errors
///
/// Returns error if the blob directory cannot be opened or the load fails
pub async fn load_trace(
    prefix: impl AsRef<Path>,
    store: &StoreConfig,
) -> Result<(TraceStorage, LoadReport), LoadError> {
    let blobs = FsBlobStore::open(store)?;
    let mut storage = TraceStorage::new(Arc::new(blobs));
    let report = TraceLoader::new().load(&mut storage, prefix).await?;
    Ok((storage, report))
}
