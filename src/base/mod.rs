//! Foundation types for the semantic core.
//!
//! - [`Position`], [`Range`], [`Location`], [`Uri`] — line/character
//!   coordinates used by the public data model
//! - [`LineIndex`] — byte-offset to line/character conversion
//!
//! This module has NO dependencies on other bsl-sema modules.

mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::{Location, Position, Range, Uri};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
