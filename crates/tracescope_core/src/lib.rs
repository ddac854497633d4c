//! TRACESCOPE Core Types
//!
//! Identifiers and content hashes shared by the index, the blob stores and
//! the trace loader. This crate performs no I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hash;
pub mod id;

// Re-exports
pub use error::{CoreError, CoreResult};
pub use hash::ContentHash;
pub use id::{FrameId, PageId, ResourceId};
