//! Flags methods whose cognitive complexity exceeds the threshold.

use crate::diagnostics::diagnostic::{Diagnostic, Severity};
use crate::diagnostics::metadata::RuleMetadata;
use crate::diagnostics::options::ParamValue;
use crate::diagnostics::registry::{DiagnosticRule, RuleParams};
use crate::semantic::model::case_fold;
use crate::semantic::workspace::DocumentContext;

const DEFAULT_COMPLEXITY_THRESHOLD: i64 = 15;

pub struct CognitiveComplexity {
    metadata: RuleMetadata,
}

impl CognitiveComplexity {
    pub fn new() -> Self {
        Self {
            metadata: RuleMetadata::new("CognitiveComplexity", Severity::Warning).parameter(
                "complexityThreshold",
                ParamValue::Int(DEFAULT_COMPLEXITY_THRESHOLD),
            ),
        }
    }
}

impl Default for CognitiveComplexity {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRule for CognitiveComplexity {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, document: &DocumentContext, params: &RuleParams) -> Vec<Diagnostic> {
        let threshold = params
            .int("complexityThreshold")
            .unwrap_or(DEFAULT_COMPLEXITY_THRESHOLD)
            .max(0) as u32;

        let complexity = document.complexity();
        let tree = document.symbol_tree();
        let mut diagnostics = Vec::new();
        for method in &tree.methods {
            let Some(score) = complexity.methods.get(&case_fold(&method.name)) else {
                continue;
            };
            if *score > threshold {
                diagnostics.push(Diagnostic::new(
                    self.metadata.id.clone(),
                    self.metadata.severity,
                    format!(
                        "Cognitive complexity of {} is {score}, {threshold} allowed",
                        method.name
                    ),
                    method.selection_range,
                ));
            }
        }
        diagnostics
    }
}
