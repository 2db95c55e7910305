//! Shared infrastructure with no knowledge of the language being analyzed.
//!
//! - [`interner`]: identity interning of values behind `Arc`
//! - [`memo`]: clearable lazy cells for derived artifacts
//! - [`text_utils`]: word and dotted-path extraction around a cursor

pub mod interner;
pub mod memo;
pub mod text_utils;

pub use interner::Interner;
pub use memo::Memo;
