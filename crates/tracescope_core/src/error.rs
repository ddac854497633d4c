//! Core error types for TRACESCOPE.

use std::fmt;

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid content hash
    InvalidHash {
        /// Why the hash was rejected
        reason: String,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHash { reason } => write!(f, "Invalid content hash: {}", reason),
        }
    }
}

impl std::error::Error for CoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidHash {
            reason: "empty".to_string(),
        };
        assert_eq!(format!("{}", err), "Invalid content hash: empty");
    }
}
