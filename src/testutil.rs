//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use crate::cycle::Style;
use crate::Value;

/// One string value per character, like iterating a Python string.
#[must_use]
pub fn chars(s: &str) -> Vec<Value> {
    s.chars().map(Value::from).collect()
}

/// Integer values.
#[must_use]
pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

/// Build an expected style from `(key, value)` pairs.
#[must_use]
pub fn styles(pairs: &[(&'static str, Value)]) -> Style<&'static str, Value> {
    pairs.iter().cloned().collect()
}
