//! Patch log reading.
//!
//! A patch log is JSON lines, one `{"path": ..., "data": ...}` object per
//! line. String data is the raw payload; any other value is rendered back
//! to JSON text. Blank lines and lines starting with `#` are skipped.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use treecache_codec::{CodecError, JsonCodec, PayloadCodec};
use treecache_core::Document;

/// Errors reading a patch log.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Log file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A line is not a patch object.
    #[error("line {line}: {source}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A payload could not be rendered.
    #[error("line {line}: {source}")]
    Render {
        /// One-based line number.
        line: usize,
        /// Underlying error.
        #[source]
        source: CodecError,
    },
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    path: String,
    #[serde(default)]
    data: Document,
}

/// One patch read from a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// One-based line number in the log.
    pub line: usize,
    /// Patch path.
    pub path: String,
    /// Raw payload text.
    pub payload: String,
}

/// Parses patch log text.
pub fn parse_log(text: &str) -> Result<Vec<LogEntry>, LogError> {
    let codec = JsonCodec::new();
    let mut entries = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry: RawEntry =
            serde_json::from_str(trimmed).map_err(|source| LogError::Parse { line, source })?;
        let payload = match entry.data {
            Document::String(text) => text,
            other => codec
                .render(&other)
                .map_err(|source| LogError::Render { line, source })?,
        };
        entries.push(LogEntry {
            line,
            path: entry.path,
            payload,
        });
    }
    Ok(entries)
}

/// Reads and parses a patch log file.
pub fn read_log(path: &Path) -> Result<Vec<LogEntry>, LogError> {
    let text = fs::read_to_string(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_log(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn string_and_structured_data() {
        let entries = parse_log(concat!(
            "# header\n",
            "{\"path\": \"a/b\", \"data\": \"raw text\"}\n",
            "\n",
            "{\"path\": \"a\", \"data\": {\"x\": [1, 2]}}\n",
            "{\"path\": \"a/b\"}\n",
        ))
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].payload, "raw text");
        assert_eq!(entries[1].payload, r#"{"x":[1,2]}"#);
        assert_eq!(entries[1].line, 4);
        assert_eq!(entries[2].payload, "null");
    }

    #[test]
    fn bad_line_is_reported() {
        let err = parse_log("{\"path\": \"a\"}\nnot json\n").unwrap_err();
        assert!(matches!(err, LogError::Parse { line: 2, .. }));
    }

    #[test]
    fn reads_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"path": "k", "data": 1}}"#).unwrap();
        let entries = read_log(file.path()).unwrap();
        assert_eq!(entries[0].payload, "1");

        let missing = file.path().with_extension("missing");
        assert!(matches!(read_log(&missing), Err(LogError::Io { .. })));
    }
}
