//! Terminal display for cycles and style assignments
//!
//! Data (tables, styles, expressions) is formatted as plain text for stdout
//! so it can be piped. Headers and summaries are colored and go to stderr.

use std::fmt::Write as _;

use colored::Colorize;

use crate::cycle::{Cycle, Style};
use crate::log::Assignment;
use crate::value::Value;

/// Format a cycle as an aligned table: one column per key (sorted), one row
/// per style.
#[must_use]
pub fn format_table(cycle: &Cycle<String, Value>) -> String {
    let header: Vec<String> = cycle.keys().iter().cloned().collect();
    let rows: Vec<Vec<String>> = cycle
        .iter()
        .map(|style| style.values().map(|v| format!("{v:?}")).collect())
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(col, key)| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(key.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    push_row(&mut output, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut output, &rule, &widths);
    for row in &rows {
        push_row(&mut output, row, &widths);
    }
    output
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        let _ = write!(line, "{cell:<width$}  ");
    }
    output.push_str(line.trim_end());
    output.push('\n');
}

/// Format one style as `key=value` pairs, values in literal form.
#[must_use]
pub fn format_style(style: &Style<String, Value>) -> String {
    style
        .iter()
        .map(|(key, value)| format!("{key}={value:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format the per-key value lists, one `key: [..]` line per key.
#[must_use]
pub fn format_by_key(cycle: &Cycle<String, Value>) -> String {
    cycle
        .by_key()
        .iter()
        .fold(String::new(), |mut output, (key, values)| {
            let _ = writeln!(output, "{key}: {values:?}");
            output
        })
}

/// Format one assignment line: `name  key=value ...`
#[must_use]
pub fn format_assignment(assignment: &Assignment) -> String {
    format!("{}  {}", assignment.name, format_style(&assignment.style))
}

/// Print a section header to stderr
pub fn print_header(title: &str) {
    eprintln!("{} {}", "===".bold().cyan(), title.bold().cyan());
    eprintln!("{}", "─".repeat(50).dimmed());
}

/// Print a one-line summary of a cycle to stderr
pub fn print_cycle_summary(cycle: &Cycle<String, Value>) {
    let keys: Vec<&str> = cycle.keys().iter().map(String::as_str).collect();
    eprintln!(
        "  {} {} styles | keys: {}",
        "Cycle:".dimmed(),
        cycle.len(),
        keys.join(", ")
    );
}

/// Print the summary of an `assign` run to stderr
pub fn print_assignment_summary(assignments: &[Assignment]) {
    let new = assignments.iter().filter(|a| a.new).count();
    let kept = assignments.len() - new;
    eprintln!("{}", "─".repeat(50).dimmed());
    eprintln!(
        "  {} {} new | {} remembered",
        "Assigned:".dimmed(),
        new.to_string().green().bold(),
        kept.to_string().bold()
    );
}
