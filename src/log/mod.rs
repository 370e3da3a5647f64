//! Logging and persistence
//!
//! This module provides the JSONL log of remembered style assignments,
//! which lets a later run restore the same key -> style mapping.

pub mod jsonl;
pub mod session;

pub use jsonl::{AssignmentLog, StyleAssignment};
pub use session::{assign_styles, Assignment};
