//! Per-document symbol hierarchy
//!
//! module root
//!   ├── module variables
//!   └── methods
//!         └── method variables and parameters
//!
//! All name lookups are case-insensitive by construction; the tree stores
//! display names and compares through [`case_fold`].

use smol_str::SmolStr;

use crate::base::{Position, Range};
use crate::semantic::model::case_fold;
use crate::semantic::symbols::description::MethodDescription;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Procedure,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// `Перем` at module level
    ModuleVariable,
    /// `Перем` inside a method or an implicit first assignment
    LocalVariable,
    Parameter,
}

/// A declared method with everything the analyzers ask about
#[derive(Debug, Clone)]
pub struct MethodSymbol {
    /// Display name as written in source
    pub name: SmolStr,
    pub kind: MethodKind,
    pub is_export: bool,
    /// Whole declaration, keyword to end keyword
    pub range: Range,
    /// The name token only
    pub selection_range: Range,
    pub params: Vec<ParameterSymbol>,
    pub variables: Vec<VariableSymbol>,
    pub description: Option<MethodDescription>,
}

impl MethodSymbol {
    pub fn is_deprecated(&self) -> bool {
        self.description
            .as_ref()
            .map(|d| d.deprecated)
            .unwrap_or(false)
    }

    pub fn variable_named(&self, name: &str) -> Option<&VariableSymbol> {
        let key = case_fold(name);
        self.variables.iter().find(|v| case_fold(&v.name) == key)
    }
}

#[derive(Debug, Clone)]
pub struct ParameterSymbol {
    pub name: SmolStr,
    pub by_value: bool,
    pub has_default: bool,
    pub selection_range: Range,
}

#[derive(Debug, Clone)]
pub struct VariableSymbol {
    pub name: SmolStr,
    pub kind: VariableKind,
    /// Meaningful for module variables only
    pub is_export: bool,
    pub selection_range: Range,
    /// Comment block above an explicit declaration
    pub description: Option<String>,
}

/// The symbol tree of one document
#[derive(Debug, Clone, Default)]
pub struct SymbolTree {
    pub module_variables: Vec<VariableSymbol>,
    pub methods: Vec<MethodSymbol>,
}

impl SymbolTree {
    /// The method whose declaration range contains the position
    pub fn method_at(&self, position: Position) -> Option<&MethodSymbol> {
        self.methods
            .iter()
            .find(|m| m.range.contains(position))
    }

    pub fn method_named(&self, name: &str) -> Option<&MethodSymbol> {
        let key = case_fold(name);
        self.methods.iter().find(|m| case_fold(&m.name) == key)
    }

    /// Resolve a variable name the way the language does: the method scope
    /// first when given, then module level.
    pub fn variable_named(&self, method: Option<&str>, name: &str) -> Option<&VariableSymbol> {
        if let Some(method_name) = method {
            if let Some(found) = self
                .method_named(method_name)
                .and_then(|m| m.variable_named(name))
            {
                return Some(found);
            }
        }
        let key = case_fold(name);
        self.module_variables
            .iter()
            .find(|v| case_fold(&v.name) == key)
    }

    pub fn export_methods(&self) -> impl Iterator<Item = &MethodSymbol> {
        self.methods.iter().filter(|m| m.is_export)
    }
}
