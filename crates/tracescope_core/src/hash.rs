//! Content hashes locating resource bytes in a blob store.
//!
//! Hashes recorded in a trace are produced by the recorder and treated as
//! opaque names. Locally computed hashes use BLAKE3, hex encoded.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of a blob of resource content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Create from a recorded hash string
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Compute the BLAKE3 hash of data
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        Self(hex::encode(blake3::hash(data).as_bytes()))
    }

    /// Check that the hash names exactly one file inside a directory
    ///
    /// # Errors
    ///
    /// Returns error if the hash could escape its directory
    pub fn validate(&self) -> CoreResult<()> {
        if self.0.is_empty() {
            return Err(CoreError::InvalidHash {
                reason: "hash is empty".to_string(),
            });
        }
        if self.0 == "." || self.0 == ".." {
            return Err(CoreError::InvalidHash {
                reason: format!("'{}' is not a file name", self.0),
            });
        }
        if self.0.contains(['/', '\\', '\0']) {
            return Err(CoreError::InvalidHash {
                reason: format!("'{}' contains a path separator", self.0),
            });
        }
        Ok(())
    }

    /// Get as string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ContentHash {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentHash {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ContentHash {
    fn from(value: String) -> Self {
        Self(value)
    }
}
