//! Diagnostics configuration
//!
//! Options arrive from the host (editor settings, CLI flags) and are held by
//! the workspace as one immutable snapshot; reconfiguration swaps the whole
//! snapshot so concurrent readers never see a half-applied state.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::diagnostics::diagnostic::RuleId;

/// Global activation policy for the rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// No rules run
    Off,
    /// Rules activated by default plus explicitly configured ones
    #[default]
    On,
    /// Every rule passing the document filters
    All,
    /// Only rules with an explicit settings entry
    Only,
    /// All except rules that are configured or directly disabled
    Except,
}

/// When to skip analysis of vendor-supported modules entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipSupport {
    #[default]
    Never,
    /// Skip modules locked by vendor support
    WithSupportLocked,
    /// Skip any module on vendor support, locked or editable
    WithSupport,
}

/// A configured parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Str(SmolStr),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Per-rule settings entry.
///
/// Supplying parameters implies the rule is wanted; there is no way to
/// configure a rule and keep it off in `Only` mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSettings {
    Enabled(bool),
    Parameters(FxHashMap<SmolStr, ParamValue>),
}

/// One immutable configuration snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticsOptions {
    pub mode: Mode,
    pub skip_support: SkipSupport,
    pub rules: FxHashMap<RuleId, RuleSettings>,
}

impl DiagnosticsOptions {
    /// Settings entry for a rule, if the configuration names it
    pub fn rule_settings(&self, id: &RuleId) -> Option<&RuleSettings> {
        self.rules.get(id)
    }
}
