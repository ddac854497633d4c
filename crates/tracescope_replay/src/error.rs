//! Trace loading errors.

use std::io;
use std::path::PathBuf;

/// Error aborting a trace load
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A trace log could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Log file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A line is not a valid record
    #[error("{}:{line}: invalid record: {source}", path.display())]
    Parse {
        /// Log file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Blob directory could not be opened
    #[error(transparent)]
    Store(#[from] tracescope_storage::StoreError),
}

impl LoadError {
    /// Line number of a parse failure
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let source = serde_json::from_str::<u32>("{").unwrap_err();
        let err = LoadError::Parse {
            path: PathBuf::from("t-network.trace"),
            line: 3,
            source,
        };
        let s = err.to_string();
        assert!(s.starts_with("t-network.trace:3: invalid record"));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_io_error_display() {
        let err = LoadError::Io {
            path: PathBuf::from("missing-dom.trace"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("missing-dom.trace"));
        assert_eq!(err.line(), None);
    }
}
