//! Remembered styles
//!
//! Assigns each key a style from a cycle the first time it is seen and
//! returns the same style ever after.

pub mod remember;
pub mod store;

pub use remember::RememberTheStyle;
pub use store::StyleStore;
