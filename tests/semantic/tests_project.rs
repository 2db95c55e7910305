//! Configuration discovery feeding the workspace, end to end.

use std::fs;
use std::sync::Arc;

use bsl_sema::base::Uri;
use bsl_sema::project::discover;
use bsl_sema::{Position, TypeResolver, Workspace};

use crate::helpers::fixtures::{MANAGER_CALLER, MATH_MODULE};

#[test]
fn test_discovered_configuration_binds_across_modules() {
    let dir = tempfile::tempdir().unwrap();
    let math_dir = dir.path().join("CommonModules/Математика/Ext");
    let manager_dir = dir.path().join("Catalogs/Товары/Ext");
    fs::create_dir_all(&math_dir).unwrap();
    fs::create_dir_all(&manager_dir).unwrap();
    fs::write(math_dir.join("Module.bsl"), MATH_MODULE).unwrap();
    fs::write(manager_dir.join("ManagerModule.bsl"), MANAGER_CALLER).unwrap();

    let files = discover(dir.path()).unwrap();
    assert_eq!(files.len(), 2);

    let workspace = Workspace::new();
    workspace.populate(files);
    assert_eq!(workspace.document_count(), 2);

    let manager_uri: Uri = Arc::from(
        manager_dir
            .join("ManagerModule.bsl")
            .to_string_lossy()
            .as_ref(),
    );
    let hit = workspace
        .resolve_at(&manager_uri, Position::new(1, 25))
        .expect("call binds regardless of load order");
    assert_eq!(hit.symbol.mdo_ref, "CommonModule.Математика");

    let types =
        TypeResolver::new(&workspace).find_types_at(&manager_uri, Position::new(1, 25));
    assert_eq!(types.len(), 1);
    assert_eq!(types[0], "Число");
}

#[test]
fn test_populated_documents_rehydrate_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("CommonModules/Сервис/Ext")).unwrap();
    let path = dir.path().join("CommonModules/Сервис/Ext/Module.bsl");
    fs::write(&path, "Процедура Запустить() Экспорт\nКонецПроцедуры").unwrap();

    let workspace = Workspace::new();
    workspace.populate(discover(dir.path()).unwrap());

    let module_uri: Uri = Arc::from(path.to_string_lossy().as_ref());
    let document = workspace
        .get_document(&module_uri)
        .expect("document registered under its path");

    // Bulk loading drops parsed state after indexing; the first artifact
    // access reads the file back
    assert_eq!(
        document.text().as_ref(),
        "Процедура Запустить() Экспорт\nКонецПроцедуры"
    );
    assert_eq!(document.symbol_tree().methods.len(), 1);
}
