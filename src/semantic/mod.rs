//! # Semantic Analysis
//!
//! Turns parsed modules into a queryable model: symbol trees with parsed
//! descriptions, a cross-file reference index, complexity and metric
//! counters, and the workspace that owns documents and invalidates their
//! derived state.

pub mod complexity;
pub mod metrics;
pub mod model;
pub mod queries;
pub mod references;
pub mod scope;
pub mod suppression;
pub mod symbols;
pub mod workspace;

pub use model::{
    OccurrenceType, Reference, Symbol, SymbolInterner, SymbolKind, SymbolOccurrence, case_fold,
};
pub use references::ReferenceIndex;
pub use workspace::{DocumentContext, EventEmitter, Workspace, WorkspaceEvent};
