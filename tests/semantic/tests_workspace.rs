//! Workspace lifecycle and reference index invariants.

use std::sync::{Arc, Mutex};

use bsl_sema::base::{Location, Position, Range, Uri};
use bsl_sema::platform::ModuleType;
use bsl_sema::semantic::{Symbol, SymbolOccurrence};
use bsl_sema::{Workspace, WorkspaceEvent};

use crate::helpers::fixtures::{MANAGER_CALLER, MATH_MODULE};
use crate::helpers::workspace_helpers::{common_module_path, uri, workspace_of};

#[test]
fn test_equal_symbol_tuples_intern_to_one_instance() {
    let math_path = common_module_path("Математика");
    let workspace = workspace_of(&[
        (&math_path, MATH_MODULE),
        ("/conf/Catalogs/Товары/Ext/ManagerModule.bsl", MANAGER_CALLER),
    ]);

    let symbol = Symbol::method(
        "CommonModule.Математика",
        ModuleType::CommonModule,
        "Сложить",
    );
    let occurrences = workspace.references().occurrences_of(&symbol);

    // Declaration in one document, call in another, one shared instance
    assert_eq!(occurrences.len(), 2);
    assert!(Arc::ptr_eq(&occurrences[0].symbol, &occurrences[1].symbol));

    let interned = workspace.interner().intern(symbol);
    assert!(Arc::ptr_eq(&interned, &occurrences[0].symbol));
}

#[test]
fn test_rebuilding_a_document_purges_stale_occurrences() {
    let workspace = Workspace::new();
    let file = uri("/Сервис.bsl");
    workspace.add_document(file.clone(), "Процедура Старая()\nКонецПроцедуры");
    workspace.add_document(file.clone(), "Процедура Новая()\nКонецПроцедуры");

    let old = Symbol::method("/Сервис.bsl", ModuleType::Unknown, "Старая");
    let new = Symbol::method("/Сервис.bsl", ModuleType::Unknown, "Новая");

    assert!(workspace.references().occurrences_of(&old).is_empty());
    assert_eq!(workspace.references().occurrences_of(&new).len(), 1);
    assert_eq!(workspace.document_count(), 1);
}

#[test]
fn test_recording_an_occurrence_twice_is_idempotent() {
    let workspace = Workspace::new();
    let symbol = workspace.interner().intern(Symbol::method(
        "CommonModule.Обмен",
        ModuleType::CommonModule,
        "Выгрузить",
    ));
    let occurrence = SymbolOccurrence::definition(
        symbol,
        Location::new(
            uri("/обмен.bsl"),
            Range::new(Position::new(0, 0), Position::new(0, 9)),
        ),
    );

    workspace.references().record(occurrence.clone());
    let occurrences_before = workspace.references().occurrence_count();
    workspace.references().record(occurrence);

    assert_eq!(workspace.references().occurrence_count(), occurrences_before);
    assert_eq!(workspace.references().symbol_count(), 1);
}

#[test]
fn test_removing_a_document_clears_its_occurrences() {
    let workspace = Workspace::new();
    let file = uri("/Обработка.bsl");
    workspace.add_document(file.clone(), "Процедура П()\nКонецПроцедуры");
    assert!(workspace.references().occurrence_count() > 0);

    assert!(workspace.remove_document(&file));

    assert_eq!(workspace.references().occurrence_count(), 0);
    assert_eq!(workspace.document_count(), 0);
    assert!(!workspace.remove_document(&file), "second removal is a no-op");
}

#[test]
fn test_document_changed_event_carries_the_uri() {
    let workspace = Workspace::new();
    let seen: Arc<Mutex<Vec<Uri>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    workspace.subscribe(move |event, _| {
        if let WorkspaceEvent::DocumentChanged { uri } = event {
            sink.lock().unwrap().push(uri.clone());
        }
    });

    workspace.add_document(uri("/м.bsl"), "Перем А;");

    assert_eq!(seen.lock().unwrap().as_slice(), &[uri("/м.bsl")]);
}
