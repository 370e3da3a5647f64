//! JSONL (JSON Lines) log of style assignments
//!
//! Provides append-only logging of remembered styles to
//! `.stylecycle/assignments.jsonl`

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use crate::cycle::Style;
use crate::value::Value;

/// A single remembered style, as written to the log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyleAssignment {
    /// The key the style was assigned to (e.g. a data series name)
    pub name: String,
    /// Number of styles drawn from the cycle when this one was assigned
    /// (1-indexed, counts across wrap-arounds)
    pub draw: usize,
    /// The assigned style
    pub style: Style<String, Value>,
    /// ISO 8601 timestamp of the assignment
    pub timestamp: DateTime<Utc>,
}

/// JSONL logger for style assignments
///
/// Provides append-only logging to `.stylecycle/assignments.jsonl`.
/// Each line is a JSON object representing a single assignment.
pub struct AssignmentLog {
    log_path: PathBuf,
}

impl AssignmentLog {
    /// Create a new assignment log
    ///
    /// # Arguments
    /// * `log_dir` - Directory where assignments.jsonl will be stored (typically `.stylecycle`)
    ///
    /// # Errors
    /// Returns an error if the log directory cannot be created
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Result<Self> {
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("assignments.jsonl");

        Ok(Self { log_path })
    }

    /// Append an assignment to the log
    ///
    /// # Errors
    /// Returns an error if:
    /// - The log file cannot be opened or created
    /// - The assignment cannot be serialized to JSON
    /// - Writing to the file fails
    pub fn append(&self, assignment: &StyleAssignment) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open log file: {}", self.log_path.display()))?;

        let json = serde_json::to_string(assignment)
            .context("Failed to serialize style assignment to JSON")?;

        writeln!(file, "{json}").context("Failed to write to log file")?;

        Ok(())
    }

    /// Read all assignments from the log, in chronological order
    ///
    /// # Errors
    /// Returns an error if:
    /// - The log file cannot be read
    /// - Any line cannot be parsed as valid JSON
    pub fn read_all(&self) -> Result<Vec<StyleAssignment>> {
        // If log file doesn't exist yet, return empty vector
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.log_path)
            .with_context(|| format!("Failed to read log file: {}", self.log_path.display()))?;

        let mut assignments = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let assignment: StyleAssignment = serde_json::from_str(line)
                .with_context(|| format!("Failed to parse line {} as JSON", line_num + 1))?;

            assignments.push(assignment);
        }

        Ok(assignments)
    }

    /// Restore the key -> style cache and the number of styles drawn so far
    ///
    /// Later entries for the same name win.
    ///
    /// # Errors
    /// Returns an error if the log cannot be read (see [`Self::read_all`])
    pub fn restore(&self) -> Result<(BTreeMap<String, Style<String, Value>>, usize)> {
        let mut cache = BTreeMap::new();
        let mut drawn = 0;
        for assignment in self.read_all()? {
            drawn = drawn.max(assignment.draw);
            cache.insert(assignment.name, assignment.style);
        }
        Ok((cache, drawn))
    }

    /// Remove the log file, forgetting every assignment
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed
    pub fn clear(&self) -> Result<()> {
        if self.log_path.exists() {
            fs::remove_file(&self.log_path).with_context(|| {
                format!("Failed to remove log file: {}", self.log_path.display())
            })?;
        }
        Ok(())
    }

    /// Get the path to the log file
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn assignment(name: &str, draw: usize, color: &str) -> StyleAssignment {
        StyleAssignment {
            name: name.to_string(),
            draw,
            style: BTreeMap::from([("color".to_string(), Value::from(color))]),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_new_log_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join(".stylecycle");

        let log = AssignmentLog::new(&log_dir).unwrap();

        assert!(log_dir.exists());
        assert_eq!(log.log_path(), log_dir.join("assignments.jsonl"));
    }

    #[test]
    fn test_append_multiple_assignments() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();

        log.append(&assignment("cat", 1, "r")).unwrap();
        log.append(&assignment("dog", 2, "g")).unwrap();

        let content = fs::read_to_string(log.log_path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_read_all_empty_log() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();

        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_all_preserves_values() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();

        let mut original = assignment("cat", 1, "r");
        original.style.insert("lw".to_string(), Value::from(1.5));
        log.append(&original).unwrap();

        let results = log.read_all().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "cat");
        assert_eq!(results[0].style, original.style);
    }

    #[test]
    fn test_restore_rebuilds_cache_and_draw_count() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();

        log.append(&assignment("cat", 1, "r")).unwrap();
        log.append(&assignment("dog", 2, "g")).unwrap();

        let (cache, drawn) = log.restore().unwrap();
        assert_eq!(drawn, 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache["dog"]["color"], Value::from("g"));
    }

    #[test]
    fn test_corrupt_line_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();
        fs::write(log.log_path(), "{not json}\n").unwrap();

        let err = log.read_all().unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();
        log.append(&assignment("cat", 1, "r")).unwrap();

        log.clear().unwrap();
        assert!(!log.log_path().exists());
        log.clear().unwrap();
    }
}
