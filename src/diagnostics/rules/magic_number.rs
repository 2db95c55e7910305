//! Flags number literals that are not on the allowed list.

use crate::diagnostics::diagnostic::{Diagnostic, Severity};
use crate::diagnostics::metadata::RuleMetadata;
use crate::diagnostics::options::ParamValue;
use crate::diagnostics::registry::{DiagnosticRule, RuleParams};
use crate::semantic::workspace::DocumentContext;
use crate::syntax::SyntaxKind;
use crate::syntax::ast::AstNode;

const DEFAULT_ALLOWED_NUMBERS: &str = "-1,0,1";

pub struct MagicNumber {
    metadata: RuleMetadata,
}

impl MagicNumber {
    pub fn new() -> Self {
        Self {
            metadata: RuleMetadata::new("MagicNumber", Severity::Information).parameter(
                "allowedNumbers",
                ParamValue::Str(DEFAULT_ALLOWED_NUMBERS.into()),
            ),
        }
    }
}

impl Default for MagicNumber {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a comma-separated list of numbers. Signs are ignored: the lexer
/// splits `-5` into a minus and a literal, so allowing `5` allows both.
/// `None` when any entry is not a number.
fn parse_allowed(raw: &str) -> Option<Vec<f64>> {
    let mut allowed = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim().trim_start_matches('-');
        allowed.push(entry.parse::<f64>().ok()?);
    }
    Some(allowed)
}

impl DiagnosticRule for MagicNumber {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, document: &DocumentContext, params: &RuleParams) -> Vec<Diagnostic> {
        let raw = params.str("allowedNumbers").unwrap_or(DEFAULT_ALLOWED_NUMBERS);
        let allowed = match parse_allowed(raw) {
            Some(allowed) => allowed,
            None => {
                tracing::warn!(
                    "[DIAGNOSTICS] MagicNumber: unusable allowed list {raw:?}, falling back to {DEFAULT_ALLOWED_NUMBERS:?}"
                );
                parse_allowed(DEFAULT_ALLOWED_NUMBERS).unwrap_or_default()
            }
        };

        let source = document.source();
        let mut diagnostics = Vec::new();
        for element in source.file().syntax().descendants_with_tokens() {
            let Some(token) = element.into_token() else {
                continue;
            };
            if token.kind() != SyntaxKind::NUMBER {
                continue;
            }
            // Parameter defaults are declarations, not magic usage.
            if token.parent_ancestors().any(|n| n.kind() == SyntaxKind::PARAM) {
                continue;
            }
            let Ok(value) = token.text().parse::<f64>() else {
                continue;
            };
            if allowed.iter().any(|a| *a == value) {
                continue;
            }
            diagnostics.push(Diagnostic::new(
                self.metadata.id.clone(),
                self.metadata.severity,
                format!("Magic number {}; name it or allow it explicitly", token.text()),
                source.line_index.range(&source.text, token.text_range()),
            ));
        }
        diagnostics
    }
}
