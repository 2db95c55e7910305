//! Static rule metadata
//!
//! Every rule declares, once, where it applies and how it is activated. The
//! selection engine consults this data; rule bodies never re-check it.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::diagnostics::diagnostic::{RuleId, Severity};
use crate::diagnostics::options::ParamValue;
use crate::platform::{CompatibilityMode, FileType, ModuleType};

/// Which file types a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleScope {
    #[default]
    All,
    Bsl,
    Os,
}

impl RuleScope {
    pub fn includes(self, file_type: FileType) -> bool {
        match self {
            Self::All => true,
            Self::Bsl => file_type == FileType::Bsl,
            Self::Os => file_type == FileType::Os,
        }
    }
}

/// Declarative description of one rule.
#[derive(Debug, Clone)]
pub struct RuleMetadata {
    pub id: RuleId,
    pub severity: Severity,
    /// Whether the rule runs in `On` mode without an explicit settings entry
    pub activated_by_default: bool,
    pub scope: RuleScope,
    /// Module types the rule is restricted to; empty means unrestricted
    pub modules: Vec<ModuleType>,
    /// Minimum platform version the rule's subject exists in
    pub min_compatibility: Option<CompatibilityMode>,
    /// Parameter defaults, also the set of recognized parameter names
    pub default_parameters: IndexMap<SmolStr, ParamValue>,
}

impl RuleMetadata {
    pub fn new(id: impl Into<RuleId>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            severity,
            activated_by_default: true,
            scope: RuleScope::All,
            modules: Vec::new(),
            min_compatibility: None,
            default_parameters: IndexMap::new(),
        }
    }

    pub fn activated_by_default(mut self, activated: bool) -> Self {
        self.activated_by_default = activated;
        self
    }

    pub fn scope(mut self, scope: RuleScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn modules(mut self, modules: impl IntoIterator<Item = ModuleType>) -> Self {
        self.modules = modules.into_iter().collect();
        self
    }

    pub fn min_compatibility(mut self, mode: CompatibilityMode) -> Self {
        self.min_compatibility = Some(mode);
        self
    }

    pub fn parameter(mut self, name: impl Into<SmolStr>, default: ParamValue) -> Self {
        self.default_parameters.insert(name.into(), default);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_declarations() {
        let metadata = RuleMetadata::new("ExportMethodDescription", Severity::Information)
            .activated_by_default(false)
            .modules([ModuleType::CommonModule, ModuleType::ManagerModule])
            .parameter("checkAllRegions", ParamValue::Bool(false));

        assert_eq!(metadata.id.as_str(), "ExportMethodDescription");
        assert!(!metadata.activated_by_default);
        assert_eq!(metadata.modules.len(), 2);
        assert!(metadata.default_parameters.contains_key("checkAllRegions"));
    }

    #[test]
    fn test_scope_inclusion() {
        assert!(RuleScope::All.includes(FileType::Os));
        assert!(RuleScope::Bsl.includes(FileType::Bsl));
        assert!(!RuleScope::Bsl.includes(FileType::Os));
    }
}
