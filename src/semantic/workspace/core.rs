//! The workspace: documents, indexes and shared analysis state

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{Position, Uri};
use crate::diagnostics::{DiagnosticsOptions, RuleRegistry};
use crate::platform::{CompatibilityMode, ModuleType, SupportVariant};
use crate::semantic::model::{Reference, SymbolInterner, case_fold};
use crate::semantic::references::{ReferenceIndex, enclosing_symbol, resolve_at};
use crate::semantic::workspace::events::{EventEmitter, WorkspaceEvent};
use crate::semantic::workspace::{DocumentContext, population};

/// State shared between the workspace and its documents.
///
/// Documents hold a `Weak` back-reference, so dropping the workspace drops
/// the whole graph even if callers still hold document handles.
pub struct WorkspaceShared {
    pub(crate) documents: DashMap<Uri, Arc<DocumentContext>>,
    pub(crate) references: ReferenceIndex,
    pub(crate) interner: SymbolInterner,
    pub(crate) registry: RuleRegistry,
    pub(crate) options: RwLock<Arc<DiagnosticsOptions>>,
    /// mdo ref -> module type -> uri
    pub(crate) mdo_index: DashMap<SmolStr, FxHashMap<ModuleType, Uri>>,
    /// Case-folded common module name -> mdo ref, for receiver lookup
    pub(crate) common_modules: DashMap<SmolStr, SmolStr>,
    pub(crate) compatibility: RwLock<CompatibilityMode>,
    pub(crate) support: DashMap<Uri, SupportVariant>,
}

impl WorkspaceShared {
    fn new(registry: RuleRegistry) -> Self {
        Self {
            documents: DashMap::new(),
            references: ReferenceIndex::new(),
            interner: SymbolInterner::new(),
            registry,
            options: RwLock::new(Arc::new(DiagnosticsOptions::default())),
            mdo_index: DashMap::new(),
            common_modules: DashMap::new(),
            compatibility: RwLock::new(CompatibilityMode::default()),
            support: DashMap::new(),
        }
    }

    pub(crate) fn support_of(&self, uri: &Uri) -> SupportVariant {
        self.support.get(uri).map(|entry| *entry.value()).unwrap_or_default()
    }

    /// Metadata reference of the common module with the given name, if the
    /// workspace knows one.
    pub(crate) fn lookup_common_module(&self, name: &str) -> Option<SmolStr> {
        self.common_modules
            .get(&case_fold(name))
            .map(|entry| entry.value().clone())
    }

    fn register_identity(&self, document: &Arc<DocumentContext>) {
        let mdo_ref = SmolStr::new(document.mdo_ref());
        self.mdo_index
            .entry(mdo_ref.clone())
            .or_default()
            .insert(document.module_type(), document.uri().clone());
        if document.module_type() == ModuleType::CommonModule {
            if let Some(name) = mdo_ref.rsplit('.').next() {
                self.common_modules.insert(case_fold(name), mdo_ref);
            }
        }
    }

    fn forget_identity(&self, document: &DocumentContext) {
        let mdo_ref = document.mdo_ref();
        let mut now_empty = false;
        if let Some(mut entry) = self.mdo_index.get_mut(mdo_ref) {
            entry.remove(&document.module_type());
            now_empty = entry.is_empty();
        }
        if now_empty {
            self.mdo_index.remove_if(mdo_ref, |_, map| map.is_empty());
        }
        if document.module_type() == ModuleType::CommonModule {
            if let Some(name) = mdo_ref.rsplit('.').next() {
                self.common_modules.remove(&case_fold(name));
            }
        }
    }
}

/// All open documents of one source tree plus everything derived from them.
///
/// Every method takes `&self`; interior locks keep the workspace usable from
/// worker threads during population and diagnostics runs.
pub struct Workspace {
    pub(crate) shared: Arc<WorkspaceShared>,
    events: RwLock<EventEmitter>,
}

impl Workspace {
    /// An empty workspace with every shipped rule registered.
    pub fn new() -> Self {
        Self::with_registry(RuleRegistry::with_builtin_rules())
    }

    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self {
            shared: Arc::new(WorkspaceShared::new(registry)),
            events: RwLock::new(EventEmitter::default()),
        }
    }

    /// Add a document or replace the text of an existing one. The document is
    /// reindexed either way.
    pub fn add_document(&self, uri: Uri, text: &str) -> Arc<DocumentContext> {
        let document = self.insert_document(uri.clone(), text);
        population::index_document(&self.shared, &document);
        self.publish(WorkspaceEvent::DocumentChanged { uri });
        document
    }

    /// Create or rebuild a document without reindexing or notifying.
    pub(crate) fn insert_document(&self, uri: Uri, text: &str) -> Arc<DocumentContext> {
        if let Some(existing) = self.shared.documents.get(&uri).map(|e| e.value().clone()) {
            existing.rebuild(text);
            return existing;
        }
        let document = Arc::new(DocumentContext::new(
            uri.clone(),
            text,
            Arc::downgrade(&self.shared),
        ));
        self.shared.documents.insert(uri, Arc::clone(&document));
        self.shared.register_identity(&document);
        document
    }

    pub fn get_document(&self, uri: &Uri) -> Option<Arc<DocumentContext>> {
        self.shared.documents.get(uri).map(|entry| entry.value().clone())
    }

    /// The document backing a metadata object's module of the given type.
    pub fn get_document_by_mdo_ref(
        &self,
        mdo_ref: &str,
        module_type: ModuleType,
    ) -> Option<Arc<DocumentContext>> {
        let uri = self
            .shared
            .mdo_index
            .get(mdo_ref)
            .and_then(|entry| entry.value().get(&module_type).cloned())?;
        self.get_document(&uri)
    }

    /// Drop a document and every trace of it: its occurrences, its identity
    /// registrations and its support variant.
    pub fn remove_document(&self, uri: &Uri) -> bool {
        let Some((_, document)) = self.shared.documents.remove(uri) else {
            return false;
        };
        self.shared.references.delete_by_file(uri);
        self.shared.forget_identity(&document);
        self.shared.support.remove(uri);
        self.publish(WorkspaceEvent::DocumentChanged { uri: uri.clone() });
        true
    }

    pub fn document_count(&self) -> usize {
        self.shared.documents.len()
    }

    /// Snapshot of all documents, in no particular order.
    pub fn documents(&self) -> Vec<Arc<DocumentContext>> {
        self.shared
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn references(&self) -> &ReferenceIndex {
        &self.shared.references
    }

    pub fn interner(&self) -> &SymbolInterner {
        &self.shared.interner
    }

    pub fn options(&self) -> Arc<DiagnosticsOptions> {
        Arc::clone(&self.shared.options.read())
    }

    /// Replace the diagnostics options. Cached diagnostics are discarded;
    /// other artifacts are unaffected.
    pub fn configure(&self, options: DiagnosticsOptions) {
        *self.shared.options.write() = Arc::new(options);
        for entry in self.shared.documents.iter() {
            entry.value().clear_diagnostics();
        }
        self.publish(WorkspaceEvent::ConfigurationChanged);
    }

    pub fn compatibility(&self) -> CompatibilityMode {
        *self.shared.compatibility.read()
    }

    /// Set the platform compatibility mode. Selection depends on it, so
    /// cached diagnostics are discarded.
    pub fn set_compatibility(&self, mode: CompatibilityMode) {
        *self.shared.compatibility.write() = mode;
        for entry in self.shared.documents.iter() {
            entry.value().clear_diagnostics();
        }
        self.publish(WorkspaceEvent::ConfigurationChanged);
    }

    /// Set the vendor support variant of one document.
    pub fn set_support_variant(&self, uri: &Uri, support: SupportVariant) {
        self.shared.support.insert(uri.clone(), support);
        if let Some(document) = self.get_document(uri) {
            document.clear_diagnostics();
        }
    }

    /// Resolve the symbol under a cursor position to a rich reference.
    ///
    /// `None` for positions over whitespace, keywords or names no occurrence
    /// covers; an unknown document also yields `None`.
    pub fn resolve_at(&self, uri: &Uri, position: Position) -> Option<Reference> {
        let document = self.get_document(uri)?;
        let occurrences = self.shared.references.occurrences_in(uri);
        let tree = document.symbol_tree();
        let from = enclosing_symbol(
            &tree,
            document.mdo_ref(),
            document.module_type(),
            &self.shared.interner,
            position,
        );
        resolve_at(&occurrences, position, from)
    }

    pub fn subscribe(&self, handler: impl Fn(&WorkspaceEvent, &Workspace) + Send + Sync + 'static) {
        self.events.write().subscribe(Box::new(handler));
    }

    /// Dispatch an event with the emitter taken out of its slot, so handlers
    /// can call back into the workspace, including subscribing.
    pub(crate) fn publish(&self, event: WorkspaceEvent) {
        let emitter = std::mem::take(&mut *self.events.write());
        emitter.emit(&event, self);
        let mut slot = self.events.write();
        let added_during_emit = std::mem::take(&mut *slot);
        *slot = emitter;
        slot.absorb(added_during_emit);
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn uri(path: &str) -> Uri {
        Arc::from(path)
    }

    #[test]
    fn test_add_get_remove_document() {
        let workspace = Workspace::new();
        let file = uri("/proj/CommonModules/Общий/Ext/Module.bsl");

        workspace.add_document(file.clone(), "Процедура Раз()\nКонецПроцедуры");
        assert_eq!(workspace.document_count(), 1);

        let document = workspace.get_document(&file).unwrap();
        assert_eq!(document.mdo_ref(), "CommonModule.Общий");
        assert!(!workspace.references().occurrences_in(&file).is_empty());

        assert!(workspace.remove_document(&file));
        assert!(workspace.get_document(&file).is_none());
        assert!(workspace.references().occurrences_in(&file).is_empty());
        assert!(!workspace.remove_document(&file));
    }

    #[test]
    fn test_adding_same_uri_replaces_in_place() {
        let workspace = Workspace::new();
        let file = uri("/m.bsl");

        let first = workspace.add_document(file.clone(), "Процедура Раз()\nКонецПроцедуры");
        let second = workspace.add_document(
            file.clone(),
            "Процедура Раз()\nКонецПроцедуры\nПроцедура Два()\nКонецПроцедуры",
        );

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(workspace.document_count(), 1);
        assert_eq!(second.version(), 1);
        assert_eq!(second.symbol_tree().methods.len(), 2);
    }

    #[test]
    fn test_lookup_by_mdo_ref() {
        let workspace = Workspace::new();
        workspace.add_document(
            uri("/proj/Catalogs/Товары/Ext/ManagerModule.bsl"),
            "Процедура Раз()\nКонецПроцедуры",
        );
        workspace.add_document(
            uri("/proj/Catalogs/Товары/Ext/ObjectModule.bsl"),
            "Процедура Два()\nКонецПроцедуры",
        );

        let manager = workspace
            .get_document_by_mdo_ref("Catalog.Товары", ModuleType::ManagerModule)
            .unwrap();
        assert!(manager.symbol_tree().method_named("Раз").is_some());

        assert!(
            workspace
                .get_document_by_mdo_ref("Catalog.Товары", ModuleType::FormModule)
                .is_none()
        );
        assert!(
            workspace
                .get_document_by_mdo_ref("Catalog.Нет", ModuleType::ObjectModule)
                .is_none()
        );
    }

    #[test]
    fn test_document_changed_events() {
        let workspace = Workspace::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_handler = Arc::clone(&seen);
        workspace.subscribe(move |event, _| {
            if matches!(event, WorkspaceEvent::DocumentChanged { .. }) {
                seen_in_handler.fetch_add(1, Ordering::SeqCst);
            }
        });

        let file = uri("/m.bsl");
        workspace.add_document(file.clone(), "Перем Х;");
        workspace.add_document(file.clone(), "Перем Х;\nПерем У;");
        workspace.remove_document(&file);

        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_handler_may_subscribe_during_dispatch() {
        let workspace = Workspace::new();
        let late_calls = Arc::new(AtomicUsize::new(0));
        let late_calls_outer = Arc::clone(&late_calls);
        workspace.subscribe(move |_, workspace| {
            let late_calls = Arc::clone(&late_calls_outer);
            workspace.subscribe(move |_, _| {
                late_calls.fetch_add(1, Ordering::SeqCst);
            });
        });

        workspace.add_document(uri("/a.bsl"), "Перем Х;");
        // The handler added during the first dispatch sees the second event,
        // and each dispatch of the outer handler adds one more.
        workspace.add_document(uri("/b.bsl"), "Перем Х;");
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_configure_discards_cached_diagnostics() {
        let workspace = Workspace::new();
        let file = uri("/m.bsl");
        workspace.add_document(file.clone(), "Перем Х;");

        let document = workspace.get_document(&file).unwrap();
        let before = document.diagnostics();

        let mut options = DiagnosticsOptions::default();
        options.mode = crate::diagnostics::Mode::Off;
        workspace.configure(options);

        let after = document.diagnostics();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(after.is_empty());
    }

    #[test]
    fn test_support_variant_feeds_document_meta() {
        let workspace = Workspace::new();
        let file = uri("/m.bsl");
        workspace.add_document(file.clone(), "Перем Х;");

        workspace.set_support_variant(&file, SupportVariant::NotEditable);

        let document = workspace.get_document(&file).unwrap();
        assert_eq!(document.meta().support, SupportVariant::NotEditable);
    }
}
