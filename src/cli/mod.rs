//! CLI output formatting
//!
//! Provides human-readable terminal display for cycles and remembered
//! style assignments.

pub mod display;

pub use display::format_assignment;
pub use display::format_by_key;
pub use display::format_style;
pub use display::format_table;
