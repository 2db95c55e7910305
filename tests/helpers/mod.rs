//! Shared helpers for the integration suites.

pub mod fixtures;
pub mod workspace_helpers;
