//! Rule trait and registry

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::diagnostics::diagnostic::{Diagnostic, RuleId};
use crate::diagnostics::metadata::RuleMetadata;
use crate::diagnostics::options::{ParamValue, RuleSettings};
use crate::semantic::workspace::DocumentContext;

/// A single diagnostic rule.
///
/// Implementations are stateless; per-run configuration arrives through
/// [`RuleParams`]. A rule may panic on unexpected input; the engine isolates
/// each run so one failure cannot take down the whole pass.
pub trait DiagnosticRule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    fn check(&self, document: &DocumentContext, params: &RuleParams) -> Vec<Diagnostic>;
}

/// Effective parameter values for one rule run: metadata defaults overlaid
/// with the configured entries. Names the metadata does not declare are
/// ignored.
#[derive(Debug, Clone)]
pub struct RuleParams {
    values: IndexMap<SmolStr, ParamValue>,
}

impl RuleParams {
    pub fn resolve(metadata: &RuleMetadata, settings: Option<&RuleSettings>) -> Self {
        let mut values = metadata.default_parameters.clone();
        if let Some(RuleSettings::Parameters(overrides)) = settings {
            for (name, value) in overrides {
                if values.contains_key(name) {
                    values.insert(name.clone(), value.clone());
                }
            }
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_int)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }
}

/// All known rules in registration order.
///
/// Registration order is the tiebreak-free iteration order everywhere:
/// selection results and engine runs follow it, which keeps diagnostics
/// deterministic across runs.
#[derive(Default)]
pub struct RuleRegistry {
    rules: IndexMap<RuleId, Box<dyn DiagnosticRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every shipped rule.
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        crate::diagnostics::rules::register_builtin(&mut registry);
        registry
    }

    pub fn register(&mut self, rule: Box<dyn DiagnosticRule>) {
        let id = rule.metadata().id.clone();
        self.rules.insert(id, rule);
    }

    pub fn get(&self, id: &RuleId) -> Option<&dyn DiagnosticRule> {
        self.rules.get(id).map(Box::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DiagnosticRule> {
        self.rules.values().map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::diagnostic::Severity;
    use rustc_hash::FxHashMap;

    struct Dummy(RuleMetadata);

    impl DiagnosticRule for Dummy {
        fn metadata(&self) -> &RuleMetadata {
            &self.0
        }

        fn check(&self, _document: &DocumentContext, _params: &RuleParams) -> Vec<Diagnostic> {
            Vec::new()
        }
    }

    fn dummy(id: &str) -> Box<dyn DiagnosticRule> {
        Box::new(Dummy(RuleMetadata::new(id, Severity::Warning)))
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let mut registry = RuleRegistry::new();
        registry.register(dummy("Second"));
        registry.register(dummy("First"));

        let ids: Vec<&str> = registry.iter().map(|r| r.metadata().id.as_str()).collect();
        assert_eq!(ids, ["Second", "First"]);
        assert!(registry.get(&RuleId::new("First")).is_some());
        assert!(registry.get(&RuleId::new("Missing")).is_none());
    }

    #[test]
    fn test_params_overlay_known_names_only() {
        let metadata = RuleMetadata::new("R", Severity::Warning)
            .parameter("maxLineLength", ParamValue::Int(120));

        let mut configured = FxHashMap::default();
        configured.insert(SmolStr::new("maxLineLength"), ParamValue::Int(100));
        configured.insert(SmolStr::new("unknownKnob"), ParamValue::Bool(true));
        let settings = RuleSettings::Parameters(configured);

        let params = RuleParams::resolve(&metadata, Some(&settings));
        assert_eq!(params.int("maxLineLength"), Some(100));
        assert!(params.get("unknownKnob").is_none());
    }

    #[test]
    fn test_params_fall_back_to_defaults() {
        let metadata = RuleMetadata::new("R", Severity::Warning)
            .parameter("maxLineLength", ParamValue::Int(120));

        let params = RuleParams::resolve(&metadata, Some(&RuleSettings::Enabled(true)));
        assert_eq!(params.int("maxLineLength"), Some(120));
    }
}
