//! # bsl-sema
//!
//! Core library for BSL (1C:Enterprise) and OneScript source analysis:
//! parsing, symbol trees, cross-file references, type inference, and
//! configurable diagnostics.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project     → configuration source discovery
//!   ↓
//! diagnostics → rule registry, selection, per-document pipeline
//!   ↓
//! infer       → best-effort type reconstruction
//!   ↓
//! semantic    → workspace, symbols, reference index, metrics
//!   ↓
//! syntax      → Logos lexer, resilient parser, typed AST over rowan
//!   ↓
//! platform    → file and module kinds, compatibility, support states
//!   ↓
//! base        → primitives (Uri, Position, LineIndex)
//! ```

// ============================================================================
// MODULES (dependency order: base → platform → syntax → semantic → ...)
// ============================================================================

/// Foundation types: Uri, Position/Range, LineIndex
pub mod base;

/// Shared infrastructure: interning, memo cells, text utilities
pub mod core;

/// Platform model: file types, module kinds, compatibility, support
pub mod platform;

/// Syntax: Logos lexer, resilient parser, typed AST over rowan
pub mod syntax;

/// Semantic model: workspace, symbol trees, references, complexity
pub mod semantic;

/// Type inference from assignments, constructors, and descriptions
pub mod infer;

/// Diagnostics: rules, configuration, selection, the analysis pipeline
pub mod diagnostics;

/// Project loading: configuration source discovery
pub mod project;

// Re-export foundation types
pub use base::{LineIndex, Location, Position, Range, TextRange, TextSize, Uri};

// Re-export the entry points most callers start from
pub use diagnostics::{Diagnostic, DiagnosticsOptions, Severity};
pub use infer::TypeResolver;
pub use semantic::{DocumentContext, Workspace, WorkspaceEvent};
