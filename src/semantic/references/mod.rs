//! Cross-reference collection, storage, and lookup
//!
//! The collector walks one parsed document and emits occurrences; the index
//! stores them workspace-wide under both a by-symbol and a by-file view; the
//! resolver answers "what is under this cursor position".

pub mod collector;
pub mod index;
pub mod resolver;

pub use collector::collect_references;
pub use index::ReferenceIndex;
pub use resolver::{enclosing_symbol, resolve_at};
