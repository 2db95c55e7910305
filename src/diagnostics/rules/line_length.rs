//! Flags source lines longer than the configured limit.

use crate::base::{Position, Range};
use crate::diagnostics::diagnostic::{Diagnostic, Severity};
use crate::diagnostics::metadata::RuleMetadata;
use crate::diagnostics::options::ParamValue;
use crate::diagnostics::registry::{DiagnosticRule, RuleParams};
use crate::semantic::workspace::DocumentContext;

const DEFAULT_MAX_LINE_LENGTH: i64 = 120;

pub struct LineLength {
    metadata: RuleMetadata,
}

impl LineLength {
    pub fn new() -> Self {
        Self {
            metadata: RuleMetadata::new("LineLength", Severity::Information).parameter(
                "maxLineLength",
                ParamValue::Int(DEFAULT_MAX_LINE_LENGTH),
            ),
        }
    }
}

impl Default for LineLength {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRule for LineLength {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, document: &DocumentContext, params: &RuleParams) -> Vec<Diagnostic> {
        let max = params
            .int("maxLineLength")
            .unwrap_or(DEFAULT_MAX_LINE_LENGTH)
            .max(1) as u32;

        let text = document.text();
        let mut diagnostics = Vec::new();
        for (line, content) in text.lines().enumerate() {
            let length = content.trim_end_matches('\r').chars().count() as u32;
            if length > max {
                diagnostics.push(Diagnostic::new(
                    self.metadata.id.clone(),
                    self.metadata.severity,
                    format!("Line is {length} characters long, {max} allowed"),
                    Range::new(
                        Position::new(line as u32, 0),
                        Position::new(line as u32, length),
                    ),
                ));
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rustc_hash::FxHashMap;
    use smol_str::SmolStr;

    use super::*;
    use crate::diagnostics::diagnostic::RuleId;
    use crate::diagnostics::options::{DiagnosticsOptions, RuleSettings};
    use crate::semantic::workspace::Workspace;

    #[test]
    fn test_long_lines_are_reported_with_their_length() {
        let workspace = Workspace::new();
        let long = format!("Перем {};", "Д".repeat(130));
        let text = format!("Перем Короткая;\n{long}");
        let document = workspace.add_document(Arc::from("/m.bsl"), &text);

        let hits: Vec<_> = document
            .diagnostics()
            .iter()
            .filter(|d| d.code == RuleId::new("LineLength"))
            .cloned()
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].range.start.line, 1);
        assert_eq!(hits[0].range.end.character, 137);
    }

    #[test]
    fn test_limit_is_configurable() {
        let workspace = Workspace::new();
        let mut parameters = FxHashMap::default();
        parameters.insert(SmolStr::new("maxLineLength"), ParamValue::Int(10));
        let mut options = DiagnosticsOptions::default();
        options.rules.insert(
            RuleId::new("LineLength"),
            RuleSettings::Parameters(parameters),
        );
        workspace.configure(options);

        let document = workspace.add_document(Arc::from("/m.bsl"), "Перем ОченьДлинноеИмя;");
        assert!(
            document
                .diagnostics()
                .iter()
                .any(|d| d.code == RuleId::new("LineLength"))
        );
    }
}
