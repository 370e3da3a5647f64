//! Remembered styles that survive between runs
//!
//! Replays the assignment log into a [`RememberTheStyle`] cache, resumes the
//! style cursor where the previous run stopped and appends every new
//! assignment back to the log.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::cycle::{Cycle, Style};
use crate::log::jsonl::{AssignmentLog, StyleAssignment};
use crate::style::RememberTheStyle;
use crate::value::Value;

/// The outcome of looking up one name
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// The name that was looked up
    pub name: String,
    /// Its style
    pub style: Style<String, Value>,
    /// True when the style was drawn during this call rather than restored
    pub new: bool,
}

/// Look up a style for every name, persisting new assignments to `log`.
///
/// # Errors
/// Returns an error if the log cannot be read or written, if the log records
/// more draws than a non-looping cycle holds, or if the cycle runs out of
/// styles.
pub fn assign_styles(
    cycle: &Cycle<String, Value>,
    names: &[String],
    looping: bool,
    log: &AssignmentLog,
) -> Result<Vec<Assignment>> {
    let (cache, drawn) = log.restore()?;
    info!(restored = cache.len(), drawn, "replayed assignment log");

    let mut remembered = RememberTheStyle::with_cache(cycle, looping, cache);
    remembered.advance(drawn).with_context(|| {
        format!(
            "Assignment log records {drawn} styles drawn; rerun with --fresh to start over"
        )
    })?;

    let mut draws = drawn;
    let mut assignments = Vec::with_capacity(names.len());
    for name in names {
        let new = !remembered.contains(name);
        let style = remembered
            .lookup(name)
            .with_context(|| format!("Failed to assign a style to '{name}'"))?;

        if new {
            draws += 1;
            log.append(&StyleAssignment {
                name: name.clone(),
                draw: draws,
                style: style.clone(),
                timestamp: Utc::now(),
            })
            .context("Failed to write to assignment log")?;
        }

        assignments.push(Assignment {
            name: name.clone(),
            style,
            new,
        });
    }

    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::cycler;
    use tempfile::TempDir;

    fn colors() -> Cycle<String, Value> {
        cycler("color".to_string(), ["r", "g", "b"].map(Value::from))
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_assignments_survive_between_runs() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();

        let first = assign_styles(&colors(), &names(&["cat", "dog"]), false, &log).unwrap();
        assert!(first.iter().all(|a| a.new));

        let second = assign_styles(&colors(), &names(&["dog", "emu"]), false, &log).unwrap();
        assert_eq!(second[0].style, first[1].style);
        assert!(!second[0].new);
        assert!(second[1].new);
        assert_eq!(second[1].style["color"], Value::from("b"));

        assert_eq!(log.read_all().unwrap().len(), 3);
    }

    #[test]
    fn test_repeated_name_in_one_call_is_logged_once() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();

        let result = assign_styles(&colors(), &names(&["cat", "cat"]), false, &log).unwrap();
        assert!(result[0].new);
        assert!(!result[1].new);
        assert_eq!(log.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_exhaustion_is_an_error_without_loop() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();

        let err =
            assign_styles(&colors(), &names(&["a", "b", "c", "d"]), false, &log).unwrap_err();
        assert!(format!("{err:#}").contains("'d'"));
        // Assignments made before the failure stay logged
        assert_eq!(log.read_all().unwrap().len(), 3);
    }

    #[test]
    fn test_loop_resumes_after_wrap() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();

        assign_styles(&colors(), &names(&["a", "b", "c", "d"]), true, &log).unwrap();
        let next = assign_styles(&colors(), &names(&["e"]), true, &log).unwrap();
        assert_eq!(next[0].style["color"], Value::from("g"));
    }

    #[test]
    fn test_log_out_of_sync_with_shorter_cycle() {
        let temp_dir = TempDir::new().unwrap();
        let log = AssignmentLog::new(temp_dir.path()).unwrap();
        assign_styles(&colors(), &names(&["a", "b", "c"]), false, &log).unwrap();

        let shorter = colors().slice(..2_usize).unwrap();
        let err = assign_styles(&shorter, &names(&["z"]), false, &log).unwrap_err();
        assert!(err.to_string().contains("--fresh"));
    }
}
