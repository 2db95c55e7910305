//! # Diagnostics
//!
//! Rules, their metadata, workspace-level options and the engine that runs
//! them against documents.
//!
//! The pipeline per document: [`select_rules`] decides which rules apply from
//! the options, the registry and the document's platform facts; the engine
//! runs each selected rule in isolation, drops results inside suppression
//! ranges and returns the rest sorted by range. Everything is deterministic
//! for fixed inputs.

mod diagnostic;
pub(crate) mod engine;
mod metadata;
mod options;
mod registry;
pub mod rules;
mod selection;

pub use diagnostic::{Diagnostic, RuleId, Severity};
pub use metadata::{RuleMetadata, RuleScope};
pub use options::{DiagnosticsOptions, Mode, ParamValue, RuleSettings, SkipSupport};
pub use registry::{DiagnosticRule, RuleParams, RuleRegistry};
pub use selection::select_rules;
