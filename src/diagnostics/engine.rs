//! Diagnostics run for one document
//!
//! Selects the applicable rules, runs each in isolation, drops suppressed
//! results and returns the rest sorted by range. A panicking rule is logged
//! and contributes nothing; the run itself never fails.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::diagnostics::diagnostic::Diagnostic;
use crate::diagnostics::registry::RuleParams;
use crate::diagnostics::selection::select_rules;
use crate::semantic::workspace::{DocumentContext, WorkspaceShared};

pub(crate) fn run_for_document(
    document: &DocumentContext,
    shared: &Arc<WorkspaceShared>,
) -> Vec<Diagnostic> {
    let options = Arc::clone(&shared.options.read());
    let selected = select_rules(&options, &shared.registry, &document.meta());

    let mut diagnostics = Vec::new();
    for id in &selected {
        let Some(rule) = shared.registry.get(id) else {
            continue;
        };
        let params = RuleParams::resolve(rule.metadata(), options.rule_settings(id));
        match panic::catch_unwind(AssertUnwindSafe(|| rule.check(document, &params))) {
            Ok(found) => diagnostics.extend(found),
            Err(_) => {
                tracing::warn!("[DIAGNOSTICS] rule {id} panicked on {}", document.uri());
            }
        }
    }

    let suppressions = document.suppressions();
    if !suppressions.is_empty() {
        diagnostics
            .retain(|d| !suppressions.is_suppressed(d.code.as_str(), d.range.start.line));
    }

    diagnostics.sort_by(|a, b| a.range.cmp(&b.range).then_with(|| a.code.cmp(&b.code)));
    diagnostics
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::base::{Range, Uri};
    use crate::diagnostics::diagnostic::{RuleId, Severity};
    use crate::diagnostics::metadata::RuleMetadata;
    use crate::diagnostics::registry::{DiagnosticRule, RuleRegistry};
    use crate::semantic::workspace::Workspace;

    struct Panicking(RuleMetadata);

    impl DiagnosticRule for Panicking {
        fn metadata(&self) -> &RuleMetadata {
            &self.0
        }

        fn check(&self, _document: &DocumentContext, _params: &RuleParams) -> Vec<Diagnostic> {
            panic!("boom");
        }
    }

    struct EmitsAt(RuleMetadata, Vec<Range>);

    impl DiagnosticRule for EmitsAt {
        fn metadata(&self) -> &RuleMetadata {
            &self.0
        }

        fn check(&self, _document: &DocumentContext, _params: &RuleParams) -> Vec<Diagnostic> {
            self.1
                .iter()
                .map(|range| {
                    Diagnostic::new(self.0.id.clone(), self.0.severity, "found", *range)
                })
                .collect()
        }
    }

    fn uri(path: &str) -> Uri {
        Arc::from(path)
    }

    #[test]
    fn test_panicking_rule_is_isolated() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(Panicking(RuleMetadata::new(
            "Сбойное",
            Severity::Warning,
        ))));
        registry.register(Box::new(EmitsAt(
            RuleMetadata::new("Рабочее", Severity::Warning),
            vec![Range::from_coords(0, 0, 0, 5)],
        )));

        let workspace = Workspace::with_registry(registry);
        let document = workspace.add_document(uri("/m.bsl"), "Перем Х;");

        let diagnostics = document.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, RuleId::new("Рабочее"));
    }

    #[test]
    fn test_results_come_back_range_sorted() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(EmitsAt(
            RuleMetadata::new("Позднее", Severity::Warning),
            vec![Range::from_coords(3, 0, 3, 5), Range::from_coords(0, 2, 0, 6)],
        )));
        registry.register(Box::new(EmitsAt(
            RuleMetadata::new("Раннее", Severity::Warning),
            vec![Range::from_coords(0, 0, 0, 5)],
        )));

        let workspace = Workspace::with_registry(registry);
        let document = workspace.add_document(uri("/m.bsl"), "Перем Х;\n\n\nПерем У;");

        let starts: Vec<(u32, u32)> = document
            .diagnostics()
            .iter()
            .map(|d| (d.range.start.line, d.range.start.character))
            .collect();
        assert_eq!(starts, vec![(0, 0), (0, 2), (3, 0)]);
    }

    #[test]
    fn test_suppressed_results_are_dropped() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(EmitsAt(
            RuleMetadata::new("Шумное", Severity::Warning),
            vec![Range::from_coords(1, 0, 1, 5), Range::from_coords(4, 0, 4, 5)],
        )));

        let workspace = Workspace::with_registry(registry);
        let text = "// sema:off Шумное\nПерем Х;\n// sema:on Шумное\n\nПерем У;";
        let document = workspace.add_document(uri("/m.bsl"), text);

        let diagnostics = document.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start.line, 4);
    }
}
