//! Replay command implementation.

use super::log::{read_log, LogEntry};
use super::PathOptions;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};
use treecache_core::{ChangeRecord, Document, TreeCache};

/// Output format for change records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `key = value` lines.
    Text,
    /// One JSON object per record.
    Json,
}

impl Format {
    /// Parses a format name; anything but `json` is text.
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Replay settings.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Path handling.
    pub paths: PathOptions,
    /// Snapshot file loaded before the log.
    pub seed: Option<std::path::PathBuf>,
    /// Print the final cache contents.
    pub dump: bool,
    /// Record output format.
    pub format: Format,
    /// Continue past rejected patches.
    pub keep_going: bool,
}

/// Line printed for one change record in JSON format.
#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    line: usize,
    #[serde(flatten)]
    record: &'a ChangeRecord<Document>,
}

/// Replay totals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Patches applied.
    pub applied: usize,
    /// Patches rejected.
    pub rejected: usize,
    /// Change records emitted.
    pub records: usize,
}

/// Runs the replay command.
pub fn run(log: &Path, options: &ReplayOptions) -> Result<(), Box<dyn std::error::Error>> {
    let entries = read_log(log)?;
    info!("Replaying {} patches from {:?}", entries.len(), log);

    let mut cache = options.paths.cache();
    if let Some(seed) = &options.seed {
        let count = cache.seed(&fs::read_to_string(seed)?)?;
        info!("Seeded {} entries from {:?}", count, seed);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = replay(&mut cache, &entries, options, &mut out)?;

    if options.dump {
        let snapshot: serde_json::Map<String, Document> = cache.into_entries().into_iter().collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
    }

    info!(
        "Applied {} patches, rejected {}, emitted {} records",
        summary.applied, summary.rejected, summary.records
    );
    Ok(())
}

/// Applies `entries` in order, writing each change record to `out`.
pub fn replay(
    cache: &mut TreeCache<Document>,
    entries: &[LogEntry],
    options: &ReplayOptions,
    out: &mut dyn Write,
) -> Result<ReplaySummary, Box<dyn std::error::Error>> {
    let mut summary = ReplaySummary::default();
    for entry in entries {
        let changes = match cache.apply_patch(&entry.path, &entry.payload) {
            Ok(changes) => changes,
            Err(e) if options.keep_going => {
                warn!("line {}: {}", entry.line, e);
                summary.rejected += 1;
                continue;
            }
            Err(e) => return Err(format!("line {}: {}", entry.line, e).into()),
        };
        summary.applied += 1;
        for record in changes {
            summary.records += 1;
            write_record(out, options.format, entry.line, &record)?;
        }
    }
    Ok(summary)
}

fn write_record(
    out: &mut dyn Write,
    format: Format,
    line: usize,
    record: &ChangeRecord<Document>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Json => {
            writeln!(out, "{}", serde_json::to_string(&RecordLine { line, record })?)?;
        }
        Format::Text => match record.value() {
            Some(value) => writeln!(out, "{} = {}", record.key(), value)?,
            None => writeln!(out, "{} removed", record.key())?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::log::parse_log;

    fn options(format: Format, keep_going: bool) -> ReplayOptions {
        ReplayOptions {
            paths: PathOptions {
                base_path: Some("zoo".into()),
                keep_empty_segments: false,
            },
            seed: None,
            dump: false,
            format,
            keep_going,
        }
    }

    const LOG: &str = r#"{"path": "/zoo/lion", "data": {"age": 4}}
{"path": "/zoo/lion/age/years", "data": 5}
{"path": "/zoo/lion/name", "data": "Leo"}
{"path": "/zoo/lion", "data": null}
"#;

    #[test]
    fn text_output() {
        let entries = parse_log(LOG).unwrap();
        let options = options(Format::Text, true);
        let mut cache = options.paths.cache();
        let mut out = Vec::new();

        let summary = replay(&mut cache, &entries, &options, &mut out).unwrap();
        assert_eq!(
            summary,
            ReplaySummary {
                applied: 3,
                rejected: 1,
                records: 3
            }
        );
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"lion = {"age":4}"#,
                r#"lion = {"age":4,"name":"Leo"}"#,
                "lion removed",
            ]
        );
    }

    #[test]
    fn json_output() {
        let entries = parse_log(LOG).unwrap();
        let options = options(Format::Json, true);
        let mut cache = options.paths.cache();
        let mut out = Vec::new();

        replay(&mut cache, &entries, &options, &mut out).unwrap();
        let first: serde_json::Value =
            serde_json::from_str(String::from_utf8(out).unwrap().lines().next().unwrap()).unwrap();
        assert_eq!(
            first,
            serde_json::json!({"line": 1, "key": "lion", "value": {"age": 4}})
        );
    }

    #[test]
    fn feed_objects_merge_and_strings_stay_unquoted() {
        let entries = parse_log(concat!(
            "{\"path\": \"/lion\", \"data\": {\"age\": 4}}\n",
            "{\"path\": \"/lion\", \"data\": {\"mane\": true}}\n",
            "{\"path\": \"/lion/name\", \"data\": \"Leo\"}\n",
            "{\"path\": \"/lion/age\", \"data\": null}\n",
        ))
        .unwrap();
        let mut options = options(Format::Text, false);
        options.paths.base_path = None;
        let mut cache = options.paths.cache();
        let mut out = Vec::new();

        let summary = replay(&mut cache, &entries, &options, &mut out).unwrap();
        assert_eq!(summary.applied, 4);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().last(),
            Some(r#"lion = {"mane":true,"name":"Leo"}"#)
        );
        assert_eq!(
            cache.get("lion"),
            Some(&serde_json::json!({"mane": true, "name": "Leo"}))
        );
    }

    #[test]
    fn stops_at_first_rejection() {
        let entries = parse_log(LOG).unwrap();
        let options = options(Format::Text, false);
        let mut cache = options.paths.cache();
        let mut out = Vec::new();

        let err = replay(&mut cache, &entries, &options, &mut out).unwrap_err();
        assert!(err.to_string().starts_with("line 2:"));
        assert!(cache.contains("lion"));
    }
}
