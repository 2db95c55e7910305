//! Builders for in-memory workspaces used across the suites.

use std::sync::Arc;

use bsl_sema::Workspace;
use bsl_sema::base::Uri;
use once_cell::sync::Lazy;

use crate::helpers::fixtures::{MANAGER_CALLER, MANAGER_PATH, MATH_MODULE};

/// The math module and its catalog caller, built once and shared by tests
/// that only run queries against it.
pub static CROSS_MODULE: Lazy<Workspace> = Lazy::new(|| {
    workspace_of(&[
        (&common_module_path("Математика"), MATH_MODULE),
        (MANAGER_PATH, MANAGER_CALLER),
    ])
});

pub fn uri(path: &str) -> Uri {
    Arc::from(path)
}

/// Path of a common module in a conventional Designer export.
pub fn common_module_path(name: &str) -> String {
    format!("/conf/CommonModules/{name}/Ext/Module.bsl")
}

/// Workspace with one document per pair, added in order. Callee modules
/// must precede their callers for member calls to bind; bulk loads that
/// cannot honor an order go through `Workspace::populate` instead.
pub fn workspace_of(files: &[(&str, &str)]) -> Workspace {
    let workspace = Workspace::new();
    for (path, source) in files {
        workspace.add_document(uri(path), source);
    }
    workspace
}

/// Workspace holding one module at a plain path outside any recognized
/// configuration layout.
pub fn single_module(source: &str) -> (Workspace, Uri) {
    let workspace = Workspace::new();
    let path = uri("/Модуль.bsl");
    workspace.add_document(path.clone(), source);
    (workspace, path)
}
