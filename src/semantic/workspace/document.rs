//! One document and its derived state
//!
//! A [`DocumentContext`] owns the current text of a module and every artifact
//! derived from it: the syntax tree, the symbol tree, complexity scores,
//! metrics, suppression ranges, embedded queries and diagnostics. Artifacts
//! are computed on first access and memoized until the text changes.
//!
//! The text/tree/index triple lives in one immutable [`DocumentSource`]
//! snapshot behind an `Arc`. A rebuild swaps the whole snapshot, so a reader
//! that grabbed the previous one keeps seeing a consistent document. After
//! [`DocumentContext::clear_heavy_state`] the snapshot is dropped entirely
//! and the next access re-reads the file from disk.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::base::{LineIndex, Uri};
use crate::core::Memo;
use crate::diagnostics::Diagnostic;
use crate::platform::{self, DocumentMeta, FileType, ModuleIdentity, ModuleType};
use crate::semantic::complexity::{ComplexityData, cognitive_complexity, cyclomatic_complexity};
use crate::semantic::metrics::{Metrics, compute_metrics};
use crate::semantic::queries::{QueryString, embedded_queries};
use crate::semantic::suppression::{SuppressionData, compute_suppressions};
use crate::semantic::symbols::{SymbolTree, build_symbol_tree};
use crate::semantic::workspace::WorkspaceShared;
use crate::syntax::ast::SourceFile;
use crate::syntax::{Parse, parse};

/// Immutable parsed snapshot of a document's text.
pub(crate) struct DocumentSource {
    pub(crate) text: Arc<str>,
    pub(crate) parse: Parse,
    pub(crate) line_index: LineIndex,
}

impl DocumentSource {
    fn new(text: &str) -> Self {
        Self {
            text: Arc::from(text),
            parse: parse(text),
            line_index: LineIndex::new(text),
        }
    }

    /// Typed root of the snapshot's tree. Red nodes are built per call; only
    /// the green tree is shared between threads.
    pub(crate) fn file(&self) -> SourceFile {
        self.parse.tree()
    }
}

pub struct DocumentContext {
    uri: Uri,
    file_type: FileType,
    identity: ModuleIdentity,
    shared: Weak<WorkspaceShared>,
    /// Serializes rebuilds of the same document
    rebuild_lock: Mutex<()>,
    /// `None` after heavy state was cleared; hydrated from disk on demand
    state: RwLock<Option<Arc<DocumentSource>>>,
    version: AtomicU32,
    symbol_tree: Memo<SymbolTree>,
    diagnostics: Memo<Vec<Diagnostic>>,
    cognitive: Memo<ComplexityData>,
    cyclomatic: Memo<ComplexityData>,
    metrics: Memo<Metrics>,
    suppressions: Memo<SuppressionData>,
    queries: Memo<Vec<QueryString>>,
}

impl DocumentContext {
    pub(crate) fn new(uri: Uri, text: &str, shared: Weak<WorkspaceShared>) -> Self {
        let file_type = FileType::from_path(&uri);
        let identity = platform::identify(&uri);
        Self {
            uri,
            file_type,
            identity,
            shared,
            rebuild_lock: Mutex::new(()),
            state: RwLock::new(Some(Arc::new(DocumentSource::new(text)))),
            version: AtomicU32::new(0),
            symbol_tree: Memo::new(),
            diagnostics: Memo::new(),
            cognitive: Memo::new(),
            cyclomatic: Memo::new(),
            metrics: Memo::new(),
            suppressions: Memo::new(),
            queries: Memo::new(),
        }
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn module_type(&self) -> ModuleType {
        self.identity.module_type
    }

    /// Metadata reference of the owning object. For documents outside a
    /// recognized configuration layout the URI stands in, so symbols from
    /// distinct files never collide.
    pub fn mdo_ref(&self) -> &str {
        match &self.identity.mdo_ref {
            Some(mdo_ref) => mdo_ref,
            None => &self.uri,
        }
    }

    /// Monotonic rebuild counter, starting at zero.
    pub fn version(&self) -> u32 {
        self.version.load(Ordering::SeqCst)
    }

    /// The facts rule selection needs about this document.
    pub fn meta(&self) -> DocumentMeta {
        let mut meta = DocumentMeta::new(self.file_type, self.identity.module_type);
        if let Some(shared) = self.shared.upgrade() {
            meta.compatibility = *shared.compatibility.read();
            meta.support = shared.support_of(&self.uri);
        }
        meta
    }

    pub fn text(&self) -> Arc<str> {
        Arc::clone(&self.source().text)
    }

    /// Replace the document text. Every memoized artifact is discarded; the
    /// occurrence index is the workspace's to update.
    pub fn rebuild(&self, text: &str) {
        let _guard = self.rebuild_lock.lock();
        *self.state.write() = Some(Arc::new(DocumentSource::new(text)));
        self.version.fetch_add(1, Ordering::SeqCst);
        self.clear_memos();
    }

    /// Drop the text, tree and every memoized artifact. The document stays
    /// registered and its occurrences stay indexed; the next artifact access
    /// re-reads the file from disk.
    pub fn clear_heavy_state(&self) {
        *self.state.write() = None;
        self.clear_memos();
    }

    pub(crate) fn clear_diagnostics(&self) {
        self.diagnostics.clear();
    }

    fn clear_memos(&self) {
        self.symbol_tree.clear();
        self.diagnostics.clear();
        self.cognitive.clear();
        self.cyclomatic.clear();
        self.metrics.clear();
        self.suppressions.clear();
        self.queries.clear();
    }

    /// The owning workspace state, `None` for a detached document.
    pub(crate) fn workspace(&self) -> Option<Arc<WorkspaceShared>> {
        self.shared.upgrade()
    }

    /// Current snapshot, hydrating from disk if heavy state was cleared.
    pub(crate) fn source(&self) -> Arc<DocumentSource> {
        if let Some(source) = self.state.read().as_ref() {
            return Arc::clone(source);
        }
        let mut slot = self.state.write();
        // Another thread may have hydrated while we waited for the lock.
        if let Some(source) = slot.as_ref() {
            return Arc::clone(source);
        }
        let source = Arc::new(DocumentSource::new(&self.read_from_disk()));
        *slot = Some(Arc::clone(&source));
        source
    }

    fn read_from_disk(&self) -> String {
        match std::fs::read(self.uri.as_ref()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(error) => {
                tracing::warn!("[DOCUMENT] cannot rehydrate {}: {error}", self.uri);
                String::new()
            }
        }
    }

    pub fn symbol_tree(&self) -> Arc<SymbolTree> {
        self.symbol_tree.get_or_compute(|| {
            let source = self.source();
            build_symbol_tree(&source.file(), &source.text, &source.line_index)
        })
    }

    /// Diagnostics of the document under the workspace's current options,
    /// sorted by range. Empty for a document detached from its workspace.
    pub fn diagnostics(&self) -> Arc<Vec<Diagnostic>> {
        self.diagnostics.get_or_compute(|| match self.shared.upgrade() {
            Some(shared) => crate::diagnostics::engine::run_for_document(self, &shared),
            None => Vec::new(),
        })
    }

    /// Cognitive complexity of the document.
    pub fn complexity(&self) -> Arc<ComplexityData> {
        self.cognitive
            .get_or_compute(|| cognitive_complexity(&self.source().file()))
    }

    /// Cyclomatic complexity of the document.
    pub fn cyclomatic_complexity(&self) -> Arc<ComplexityData> {
        self.cyclomatic
            .get_or_compute(|| cyclomatic_complexity(&self.source().file()))
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.get_or_compute(|| {
            let source = self.source();
            compute_metrics(&source.file(), &source.text, &source.line_index)
        })
    }

    /// Suppression ranges declared by comment markers in the text.
    pub fn suppressions(&self) -> Arc<SuppressionData> {
        self.suppressions.get_or_compute(|| {
            let source = self.source();
            compute_suppressions(&source.file(), &source.text, &source.line_index)
        })
    }

    /// String literals recognized as query language text.
    pub fn queries(&self) -> Arc<Vec<QueryString>> {
        self.queries.get_or_compute(|| {
            let source = self.source();
            embedded_queries(&source.file(), &source.text, &source.line_index)
        })
    }
}
