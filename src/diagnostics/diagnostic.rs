//! Diagnostic results and rule identity

use std::fmt;

use smol_str::SmolStr;

use crate::base::Range;

/// Identifier of a diagnostic rule, e.g. `LineLength`.
///
/// Also the key under which per-rule settings are looked up and the code
/// attached to produced diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(SmolStr);

impl RuleId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

/// One finding produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: RuleId,
    pub severity: Severity,
    pub message: String,
    pub range: Range,
}

impl Diagnostic {
    pub fn new(code: RuleId, severity: Severity, message: impl Into<String>, range: Range) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_id_display_and_settings_key() {
        let id = RuleId::new("LineLength");
        assert_eq!(id.to_string(), "LineLength");
        assert_eq!(id, RuleId::from("LineLength"));
    }
}
