//! Flags calls to the deprecated global `Найти` / `Find`.
//!
//! `СтрНайти` / `StrFind` replaced it in platform 8.3.6, so the rule only
//! applies from that compatibility mode on.

use crate::diagnostics::diagnostic::{Diagnostic, Severity};
use crate::diagnostics::metadata::RuleMetadata;
use crate::diagnostics::registry::{DiagnosticRule, RuleParams};
use crate::platform::CompatibilityMode;
use crate::semantic::model::case_fold;
use crate::semantic::workspace::DocumentContext;
use crate::syntax::ast::{AstNode, CallExpr};

pub struct DeprecatedFind {
    metadata: RuleMetadata,
}

impl DeprecatedFind {
    pub fn new() -> Self {
        Self {
            metadata: RuleMetadata::new("DeprecatedFind", Severity::Warning)
                .min_compatibility(CompatibilityMode::new(3, 6)),
        }
    }
}

impl Default for DeprecatedFind {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRule for DeprecatedFind {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, document: &DocumentContext, _params: &RuleParams) -> Vec<Diagnostic> {
        let source = document.source();
        let file = source.file();

        let mut diagnostics = Vec::new();
        for call in file.descendants::<CallExpr>() {
            let Some(name) = call.name_token() else {
                continue;
            };
            let folded = case_fold(name.text());
            if folded == "найти" || folded == "find" {
                diagnostics.push(Diagnostic::new(
                    self.metadata.id.clone(),
                    self.metadata.severity,
                    "Найти() is deprecated, use СтрНайти() / StrFind()",
                    source.line_index.range(&source.text, name.text_range()),
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

    fn find_hits(document: &DocumentContext) -> Vec<Diagnostic> {
        document
            .diagnostics()
            .iter()
            .filter(|d| d.code == RuleId::new("DeprecatedFind"))
            .cloned()
            .collect()
    }

    #[test]
    fn test_bare_find_call_is_flagged() {
        let workspace = Workspace::new();
        let document = workspace.add_document(
            Arc::from("/m.bsl"),
            "Процедура Р()\n    Позиция = Найти(Строка, \"а\");\nКонецПроцедуры",
        );

        let hits = find_hits(&document);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].range.start.line, 1);
    }

    #[test]
    fn test_member_find_calls_are_left_alone() {
        let workspace = Workspace::new();
        let document = workspace.add_document(
            Arc::from("/m.bsl"),
            "Процедура Р()\n    Элемент = Справочник.Найти(Код);\n    Позиция = СтрНайти(Строка, \"а\");\nКонецПроцедуры",
        );
        assert!(find_hits(&document).is_empty());
    }

    #[test]
    fn test_old_compatibility_mode_disables_the_rule() {
        let workspace = Workspace::new();
        workspace.set_compatibility(CompatibilityMode::new(3, 3));
        let document = workspace.add_document(
            Arc::from("/m.bsl"),
            "Процедура Р()\n    Позиция = Найти(Строка, \"а\");\nКонецПроцедуры",
        );
        assert!(find_hits(&document).is_empty());
    }
}
