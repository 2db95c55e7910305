//! Diagnostics tests
//!
//! - Rule selection against the built-in registry
//! - The analysis pipeline through workspace configuration

pub mod tests_pipeline;
pub mod tests_selection;
