//! Newline-delimited trace logs.
//!
//! Each non-blank line holds one JSON record. Blank lines are skipped; any
//! other line that does not decode is an error for the whole log.

use crate::error::LoadError;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;

/// The two logs written per trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceLog {
    /// Captured resources, one `ResourceRecord` per line
    Network,
    /// Frame snapshots, one `FrameSnapshotRecord` per line
    Dom,
}

impl TraceLog {
    /// Get string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Dom => "dom",
        }
    }
}

impl fmt::Display for TraceLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode the records of one log lazily, in file order.
///
/// The iterator yields an error for the first malformed line; callers stop
/// there, leaving earlier records applied.
pub fn parse_lines<'a, T>(path: &'a Path, text: &'a str) -> impl Iterator<Item = Result<T, LoadError>> + 'a
where
    T: DeserializeOwned + 'a,
{
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(move |(i, line)| {
            serde_json::from_str(line).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracescope_index::{FrameSnapshotRecord, ResourceRecord};

    #[test]
    fn test_parse_lines_skip_blank_lines() {
        let text = concat!(
            r#"{"resourceId":"r1","frameId":"f1","url":"http://x/a","contentHash":"h1"}"#,
            "\n\n   \n",
            r#"{"resourceId":"r2","frameId":"f1","url":"http://x/b","contentHash":"h2"}"#,
            "\n",
        );
        let parsed: Vec<ResourceRecord> = parse_lines(Path::new("n"), text)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].resource_id.as_str(), "r2");
    }

    #[test]
    fn test_parse_lines_report_line_number() {
        let text = concat!(
            r#"{"frameId":"f1","pageId":"p1","isMainFrame":true,"snapshotName":"s1"}"#,
            "\n\n",
            "{not json}\n",
        );
        let mut iter = parse_lines::<FrameSnapshotRecord>(Path::new("d"), text);
        assert!(iter.next().unwrap().is_ok());
        let err = iter.next().unwrap().unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_parse_lines_reject_missing_fields() {
        let text = r#"{"resourceId":"r1","url":"http://x/a"}"#;
        let result: Result<Vec<ResourceRecord>, _> = parse_lines(Path::new("n"), text).collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_trace_log_display() {
        assert_eq!(TraceLog::Network.to_string(), "network");
        assert_eq!(TraceLog::Dom.as_str(), "dom");
    }
}
