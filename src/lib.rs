//! stylecycle - Composable style cycles
//!
//! A [`Cycle`] is a finite, ordered sequence of style dictionaries built from
//! single-key value lists and composed with `+` (zip) and `*` (outer
//! product). Cycles can be sliced, concatenated, repeated, rekeyed,
//! flattened and rendered; [`RememberTheStyle`] hands out one stable style
//! per key drawn from a cycle.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod config;
pub mod cycle;
pub mod error;
pub mod expr;
pub mod log;
pub mod style;
pub mod value;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use config::{PropertyConfig, RememberConfig, StyleConfig};
pub use cycle::{
    concat, cycler, Arg, Combinator, Cycle, CycleBuilder, IntoIter, Iter, Repeat, Slice, Source,
    Style,
};
pub use error::CycleError;
pub use expr::{evaluate, ExprError};
pub use log::{assign_styles, Assignment, AssignmentLog, StyleAssignment};
pub use style::{RememberTheStyle, StyleStore};
pub use value::Value;
