//! Flags export methods of reusable modules that carry no description.

use crate::diagnostics::diagnostic::{Diagnostic, Severity};
use crate::diagnostics::metadata::RuleMetadata;
use crate::diagnostics::registry::{DiagnosticRule, RuleParams};
use crate::platform::ModuleType;
use crate::semantic::workspace::DocumentContext;

pub struct ExportMethodDescription {
    metadata: RuleMetadata,
}

impl ExportMethodDescription {
    pub fn new() -> Self {
        Self {
            metadata: RuleMetadata::new("ExportMethodDescription", Severity::Information)
                .activated_by_default(false)
                .modules(vec![ModuleType::CommonModule, ModuleType::ManagerModule]),
        }
    }
}

impl Default for ExportMethodDescription {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRule for ExportMethodDescription {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, document: &DocumentContext, _params: &RuleParams) -> Vec<Diagnostic> {
        let tree = document.symbol_tree();
        let mut diagnostics = Vec::new();
        for method in tree.export_methods() {
            let documented = method
                .description
                .as_ref()
                .is_some_and(|d| !d.purpose.trim().is_empty());
            if !documented {
                diagnostics.push(Diagnostic::new(
                    self.metadata.id.clone(),
                    self.metadata.severity,
                    format!("Export method {} has no description", method.name),
                    method.selection_range,
                ));
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::diagnostics::diagnostic::RuleId;
    use crate::diagnostics::options::{DiagnosticsOptions, RuleSettings};
    use crate::semantic::workspace::Workspace;

    fn options_with_rule_on() -> DiagnosticsOptions {
        let mut options = DiagnosticsOptions::default();
        options.rules.insert(
            RuleId::new("ExportMethodDescription"),
            RuleSettings::Enabled(true),
        );
        options
    }

    #[test]
    fn test_undocumented_export_method_is_flagged() {
        let workspace = Workspace::new();
        workspace.configure(options_with_rule_on());

        let text = "// Возвращает сумму двух чисел.\nФункция Сложить(А, Б) Экспорт\n    Возврат А + Б;\nКонецФункции\n\nФункция Вычесть(А, Б) Экспорт\n    Возврат А - Б;\nКонецФункции";
        let document = workspace.add_document(
            Arc::from("/proj/CommonModules/Математика/Ext/Module.bsl"),
            text,
        );

        let hits: Vec<_> = document
            .diagnostics()
            .iter()
            .filter(|d| d.code == RuleId::new("ExportMethodDescription"))
            .cloned()
            .collect();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].message.contains("Вычесть"));
    }

    #[test]
    fn test_stays_quiet_without_explicit_enablement() {
        let workspace = Workspace::new();
        let document = workspace.add_document(
            Arc::from("/proj/CommonModules/Математика/Ext/Module.bsl"),
            "Функция Вычесть(А, Б) Экспорт\n    Возврат А - Б;\nКонецФункции",
        );
        assert!(
            !document
                .diagnostics()
                .iter()
                .any(|d| d.code == RuleId::new("ExportMethodDescription"))
        );
    }

    #[test]
    fn test_module_restriction_excludes_form_modules() {
        let workspace = Workspace::new();
        workspace.configure(options_with_rule_on());

        let document = workspace.add_document(
            Arc::from("/proj/Catalogs/Товары/Forms/Форма/Ext/Form/Module.bsl"),
            "Процедура ПриОткрытии() Экспорт\nКонецПроцедуры",
        );
        assert!(
            !document
                .diagnostics()
                .iter()
                .any(|d| d.code == RuleId::new("ExportMethodDescription"))
        );
    }
}
