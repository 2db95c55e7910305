//! Flags non-export methods that are never called.

use crate::diagnostics::diagnostic::{Diagnostic, Severity};
use crate::diagnostics::metadata::{RuleMetadata, RuleScope};
use crate::diagnostics::registry::{DiagnosticRule, RuleParams};
use crate::semantic::model::Symbol;
use crate::semantic::workspace::DocumentContext;

pub struct UnusedLocalMethod {
    metadata: RuleMetadata,
}

impl UnusedLocalMethod {
    pub fn new() -> Self {
        Self {
            metadata: RuleMetadata::new("UnusedLocalMethod", Severity::Warning)
                .scope(RuleScope::Bsl),
        }
    }
}

impl Default for UnusedLocalMethod {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRule for UnusedLocalMethod {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, document: &DocumentContext, _params: &RuleParams) -> Vec<Diagnostic> {
        let Some(shared) = document.workspace() else {
            return Vec::new();
        };

        let tree = document.symbol_tree();
        let mut diagnostics = Vec::new();
        for method in tree.methods.iter().filter(|m| !m.is_export) {
            let symbol = Symbol::method(document.mdo_ref(), document.module_type(), &method.name);
            let used = shared
                .references
                .occurrences_of(&symbol)
                .iter()
                .any(|occurrence| !occurrence.is_definition());
            if !used {
                diagnostics.push(Diagnostic::new(
                    self.metadata.id.clone(),
                    self.metadata.severity,
                    format!("Method {} is never called", method.name),
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

    use super::*;
    use crate::diagnostics::diagnostic::RuleId;
    use crate::semantic::workspace::Workspace;

    fn unused_hits(document: &DocumentContext) -> Vec<Diagnostic> {
        document
            .diagnostics()
            .iter()
            .filter(|d| d.code == RuleId::new("UnusedLocalMethod"))
            .cloned()
            .collect()
    }

    #[test]
    fn test_called_and_export_methods_are_not_flagged() {
        let workspace = Workspace::new();
        let text = "Процедура Используемая()\nКонецПроцедуры\n\nПроцедура Наружу() Экспорт\nКонецПроцедуры\n\nПроцедура Брошенная()\nКонецПроцедуры\n\nПроцедура Главная() Экспорт\n    Используемая();\nКонецПроцедуры";
        let document = workspace.add_document(Arc::from("/m.bsl"), text);

        let hits = unused_hits(&document);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].message.contains("Брошенная"));
        assert_eq!(hits[0].range.start.line, 6);
    }

    #[test]
    fn test_rebuild_adding_a_caller_clears_the_diagnostic() {
        let workspace = Workspace::new();
        workspace.add_document(
            Arc::from("/proj/CommonModules/Сервис/Ext/Module.bsl"),
            "Процедура Внутренняя()\nКонецПроцедуры",
        );
        // The rebuilt text adds a caller, so the occurrence set gains a
        // reference and the diagnostic goes away.
        let serviced = workspace.add_document(
            Arc::from("/proj/CommonModules/Сервис/Ext/Module.bsl"),
            "Процедура Внутренняя()\nКонецПроцедуры\n\nПроцедура Зовущая() Экспорт\n    Внутренняя();\nКонецПроцедуры",
        );

        assert!(unused_hits(&serviced).is_empty());
    }
}
