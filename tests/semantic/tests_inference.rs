//! Type reconstruction across documents.

use bsl_sema::TypeResolver;
use bsl_sema::base::Position;
use smol_str::SmolStr;

use crate::helpers::fixtures::MANAGER_PATH;
use crate::helpers::workspace_helpers::{CROSS_MODULE, single_module, uri};

#[test]
fn test_resolved_call_reports_the_callees_return_types() {
    let types = TypeResolver::new(&CROSS_MODULE)
        .find_types_at(&uri(MANAGER_PATH), Position::new(1, 25));

    assert_eq!(types, vec![SmolStr::new("Число")]);
}

#[test]
fn test_only_the_declaring_assignment_types_an_implicit_variable() {
    let (workspace, file) = single_module(
        "Процедура П()\n    Кэш = Новый Соответствие;\n    Кэш = Новый Структура;\nКонецПроцедуры",
    );

    // The first assignment declares the variable; later assignments are
    // plain references and do not widen the type set
    let types = TypeResolver::new(&workspace).find_types_at(&file, Position::new(1, 4));

    assert_eq!(types, vec![SmolStr::new("Соответствие")]);
}

#[test]
fn test_variables_assigned_from_local_calls_get_the_return_types() {
    let (workspace, file) = single_module(
        "// Читает настройку.\n//\n// Возвращаемое значение:\n//  Строка - значение\nФункция Настройка()\n    Возврат \"\";\nКонецФункции\n\nПроцедура П()\n    Значение = Настройка();\nКонецПроцедуры",
    );

    let types = TypeResolver::new(&workspace).find_types_at(&file, Position::new(9, 4));

    assert_eq!(types, vec![SmolStr::new("Строка")]);
}
