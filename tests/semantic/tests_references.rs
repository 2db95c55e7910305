//! Cross-file resolution through the reference index.

use bsl_sema::Workspace;
use bsl_sema::base::Position;
use bsl_sema::semantic::SymbolKind;

use crate::helpers::fixtures::{MANAGER_PATH, MATH_MODULE};
use crate::helpers::workspace_helpers::{
    CROSS_MODULE, common_module_path, single_module, uri, workspace_of,
};

#[test]
fn test_resolving_at_a_definition_round_trips_through_the_index() {
    let math_path = common_module_path("Математика");
    let workspace = workspace_of(&[(&math_path, MATH_MODULE)]);
    let file = uri(&math_path);

    let hit = workspace
        .resolve_at(&file, Position::new(4, 10))
        .expect("cursor on the declaration name resolves");
    assert!(hit.is_definition());

    let occurrences = workspace.references().occurrences_of(&hit.symbol);
    assert!(
        occurrences.iter().any(|occurrence| {
            occurrence.is_definition()
                && occurrence.location.uri == file
                && occurrence.location.range == hit.selection_range
        }),
        "the index lists the occurrence the cursor resolved through"
    );
}

#[test]
fn test_cross_module_call_binds_to_the_exporting_module() {
    let hit = CROSS_MODULE
        .resolve_at(&uri(MANAGER_PATH), Position::new(1, 25))
        .expect("member call binds to the common module");

    assert_eq!(hit.symbol.kind, SymbolKind::Method);
    assert_eq!(hit.symbol.mdo_ref, "CommonModule.Математика");
    assert!(!hit.is_definition());
    // The enclosing symbol is the calling method, not the whole module
    assert_eq!(hit.from.kind, SymbolKind::Method);
}

#[test]
fn test_calls_bind_before_the_declaration() {
    let (workspace, file) = single_module(
        "Процедура Запуск()\n    Подготовить();\nКонецПроцедуры\n\nПроцедура Подготовить()\nКонецПроцедуры",
    );

    let hit = workspace
        .resolve_at(&file, Position::new(1, 6))
        .expect("forward call resolves");

    assert_eq!(hit.symbol.kind, SymbolKind::Method);
    assert!(!hit.is_definition());
}

#[test]
fn test_dynamic_dispatch_resolves_to_no_symbol() {
    let (workspace, file) = single_module(
        "Процедура Обработать()\n    Объект = ПолучитьСсылку();\n    Объект.Выполнить();\nКонецПроцедуры",
    );

    // The receiver is an ordinary variable, so the called method has no
    // statically known declaration
    assert!(workspace.resolve_at(&file, Position::new(2, 13)).is_none());

    let receiver = workspace
        .resolve_at(&file, Position::new(2, 5))
        .expect("the receiver variable itself still resolves");
    assert_eq!(receiver.symbol.kind, SymbolKind::Variable);
}

#[test]
fn test_positions_outside_any_occurrence_resolve_to_nothing() {
    let (workspace, file) = single_module("Процедура П()\nКонецПроцедуры");

    assert!(workspace.resolve_at(&file, Position::new(0, 0)).is_none());
    assert!(workspace.resolve_at(&file, Position::new(40, 0)).is_none());
    assert!(
        Workspace::new()
            .resolve_at(&file, Position::new(0, 0))
            .is_none(),
        "unknown documents resolve to nothing"
    );
}
