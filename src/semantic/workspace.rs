//! # Workspace
//!
//! Manages the documents of a source tree with a shared occurrence index and
//! per-document derived state.
//!
//! Documents come in through [`Workspace::populate`] for bulk loads or
//! [`Workspace::add_document`] for editor-driven changes; both keep the
//! occurrence index current. Derived artifacts live on each
//! [`DocumentContext`] and are computed lazily.

mod core;
mod document;
mod events;
mod population;

pub use self::core::{Workspace, WorkspaceShared};
pub use document::DocumentContext;
pub use events::{EventEmitter, WorkspaceEvent};
