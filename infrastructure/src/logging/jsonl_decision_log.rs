//! JSONL audit log of voting decisions.
//!
//! Each [`DecisionEntry`] becomes one JSON line with `type` and `timestamp`, appended
//! to the file so the log survives restarts.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use votegate_application::{DecisionEntry, DecisionLog};

/// Append-only decision log. Thread-safe via `Mutex<BufWriter<File>>`.
pub struct JsonlDecisionLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlDecisionLog {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create decision log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open decision log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DecisionLog for JsonlDecisionLog {
    fn record(&self, entry: &DecisionEntry) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match serde_json::to_value(entry) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => return,
            Err(e) => {
                warn!("Could not serialize decision for row {}: {}", entry.row, e);
                return;
            }
        };
        record.insert(
            "type".to_string(),
            serde_json::Value::String("decision".to_string()),
        );
        record.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // One line per decision; flush so a crash never loses one
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlDecisionLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votegate_domain::{Decision, MessageId, RowId, Tally};

    fn entry(row: u64, decision: Decision, reported: bool) -> DecisionEntry {
        DecisionEntry {
            message_id: MessageId::new(format!("m{}", row)),
            row: RowId::new(row),
            decision,
            tally: Tally {
                approve: 5,
                deny: 1,
            },
            reported,
        }
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_decision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let log = JsonlDecisionLog::open(&path).unwrap();

        log.record(&entry(7, Decision::Accepted, true));
        log.record(&entry(8, Decision::Denied, false));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "decision");
        assert_eq!(lines[0]["row"], 7);
        assert_eq!(lines[0]["message_id"], "m7");
        assert_eq!(lines[0]["reported"], true);
        assert_eq!(lines[0]["tally"]["approve"], 5);
        assert!(lines[0]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(lines[1]["reported"], false);
    }

    #[test]
    fn test_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("decisions.jsonl");

        {
            let log = JsonlDecisionLog::open(&path).unwrap();
            log.record(&entry(1, Decision::Accepted, true));
        }
        let log = JsonlDecisionLog::open(&path).unwrap();
        log.record(&entry(2, Decision::Accepted, true));

        assert_eq!(log.path(), path.as_path());
        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_unopenable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file
        assert!(JsonlDecisionLog::open(dir.path()).is_none());
    }
}
