//! Semantic layer tests
//!
//! - Workspace lifecycle and reference index invariants
//! - Cross-file resolution
//! - Type reconstruction across documents
//! - Configuration discovery end to end

pub mod tests_inference;
pub mod tests_project;
pub mod tests_references;
pub mod tests_workspace;
