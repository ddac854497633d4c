//! TRACESCOPE Storage
//!
//! Blob stores holding captured resource bodies, keyed by content hash.
//! The index never caches content; every read goes to the backing store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blob;
pub mod store;

pub use blob::{BlobStore, MemoryBlobStore};
pub use store::{FsBlobStore, StoreConfig, StoreError};
