//! tsexpect_core: Core text utilities shared by every tsexpect crate.
//!
//! Provides text spans and the line index used to turn byte offsets coming
//! from a checker into the line numbers that assertions are bound to.

pub mod text;

// Re-export commonly used types
pub use text::{IndexError, LineAndColumn, LineIndex, TextPos, TextSpan};
