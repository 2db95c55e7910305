//! Bulk loading and occurrence indexing

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use crate::base::Uri;
use crate::semantic::references::collect_references;
use crate::semantic::workspace::{DocumentContext, Workspace, WorkspaceShared};

impl Workspace {
    /// Load a whole source tree at once.
    ///
    /// Documents are registered first so cross-module calls bind regardless
    /// of processing order, then indexed in parallel. Each document's heavy
    /// state is dropped right after indexing; a populated workspace holds the
    /// occurrence index and document identities, not every syntax tree.
    /// Population emits no events.
    pub fn populate(&self, files: Vec<(Uri, String)>) {
        let started = Instant::now();
        let mut files = files;
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files.dedup_by(|a, b| a.0 == b.0);

        let documents: Vec<Arc<DocumentContext>> = files
            .into_iter()
            .map(|(uri, text)| self.insert_document(uri, &text))
            .collect();

        documents.par_iter().for_each(|document| {
            index_document(&self.shared, document);
            document.clear_heavy_state();
        });

        tracing::info!(
            "[POPULATE] indexed {} documents in {:?}",
            documents.len(),
            started.elapsed()
        );
    }
}

/// Reindex one document: drop everything previously recorded for its file,
/// collect occurrences from the current tree and record them.
pub(crate) fn index_document(shared: &Arc<WorkspaceShared>, document: &Arc<DocumentContext>) {
    shared.references.delete_by_file(document.uri());

    let source = document.source();
    let references = collect_references(
        document.uri(),
        &source.text,
        &source.line_index,
        &source.file(),
        document.mdo_ref(),
        document.module_type(),
        &shared.interner,
        |name| shared.lookup_common_module(name),
    );

    tracing::debug!("[INDEX] {}: {} occurrences", document.uri(), references.len());
    for reference in references {
        shared.references.record(reference.to_occurrence());
    }
}
