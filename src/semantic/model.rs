//! Symbol data model
//!
//! A [`Symbol`] is the canonical, file-independent identity of a named
//! program entity. Two mentions of the same method anywhere in the workspace
//! intern to the same `Arc<Symbol>`, so identity checks are pointer
//! comparisons and the occurrence indices can key on the symbol directly.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{Location, Range, Uri};
use crate::core::Interner;
use crate::platform::ModuleType;

/// Thread-safe get-or-insert set of symbols
pub type SymbolInterner = Interner<Symbol>;

/// What a symbol names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolKind {
    /// A module as a whole
    Module,
    /// A procedure or function
    Method,
    /// A module variable, method variable or parameter
    Variable,
}

/// Canonical identity of a named entity.
///
/// Names are case-folded at construction because BSL is case-insensitive:
/// `ПолучитьДанные` and `получитьданные` name the same method. The ordering
/// is lexicographic over the fields in declaration order, which groups
/// occurrences by module, then by scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    /// Metadata-object reference of the owning module. For modules outside a
    /// recognized configuration layout the document URI stands in, so symbols
    /// from distinct files never collide.
    pub mdo_ref: SmolStr,
    pub module_type: ModuleType,
    /// Containing method for locals and parameters, `None` at module level
    pub scope_name: Option<SmolStr>,
    pub kind: SymbolKind,
    /// Case-folded entity name; empty for the module symbol itself
    pub name: SmolStr,
}

impl Symbol {
    pub fn module(mdo_ref: impl Into<SmolStr>, module_type: ModuleType) -> Self {
        Self {
            mdo_ref: mdo_ref.into(),
            module_type,
            scope_name: None,
            kind: SymbolKind::Module,
            name: SmolStr::default(),
        }
    }

    pub fn method(mdo_ref: impl Into<SmolStr>, module_type: ModuleType, name: &str) -> Self {
        Self {
            mdo_ref: mdo_ref.into(),
            module_type,
            scope_name: None,
            kind: SymbolKind::Method,
            name: case_fold(name),
        }
    }

    /// A module-level variable
    pub fn module_variable(
        mdo_ref: impl Into<SmolStr>,
        module_type: ModuleType,
        name: &str,
    ) -> Self {
        Self {
            mdo_ref: mdo_ref.into(),
            module_type,
            scope_name: None,
            kind: SymbolKind::Variable,
            name: case_fold(name),
        }
    }

    /// A variable or parameter scoped to a method
    pub fn local_variable(
        mdo_ref: impl Into<SmolStr>,
        module_type: ModuleType,
        method_name: &str,
        name: &str,
    ) -> Self {
        Self {
            mdo_ref: mdo_ref.into(),
            module_type,
            scope_name: Some(case_fold(method_name)),
            kind: SymbolKind::Variable,
            name: case_fold(name),
        }
    }
}

/// Case-fold a BSL name for identity comparison
pub fn case_fold(name: &str) -> SmolStr {
    if name.chars().all(|c| c.is_lowercase() || !c.is_alphabetic()) {
        SmolStr::new(name)
    } else {
        SmolStr::new(name.to_lowercase())
    }
}

/// Whether an occurrence declares the entity or merely uses it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OccurrenceType {
    Definition,
    Reference,
}

/// A concrete textual appearance of a symbol.
///
/// The derived ordering is (location, occurrence_type, symbol); iterating a
/// sorted set of occurrences walks a file top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolOccurrence {
    pub location: Location,
    pub occurrence_type: OccurrenceType,
    pub symbol: Arc<Symbol>,
}

impl SymbolOccurrence {
    pub fn definition(symbol: Arc<Symbol>, location: Location) -> Self {
        Self {
            location,
            occurrence_type: OccurrenceType::Definition,
            symbol,
        }
    }

    pub fn reference(symbol: Arc<Symbol>, location: Location) -> Self {
        Self {
            location,
            occurrence_type: OccurrenceType::Reference,
            symbol,
        }
    }

    pub fn is_definition(&self) -> bool {
        self.occurrence_type == OccurrenceType::Definition
    }
}

/// A resolved reference, richer than the stored occurrence.
///
/// Produced by resolution walks; `from` is the innermost source symbol
/// enclosing the reference position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The symbol whose body contains the reference
    pub from: Arc<Symbol>,
    /// The referenced symbol
    pub symbol: Arc<Symbol>,
    pub uri: Uri,
    /// Range of the name token itself
    pub selection_range: Range,
    pub occurrence_type: OccurrenceType,
}

impl Reference {
    pub fn is_definition(&self) -> bool {
        self.occurrence_type == OccurrenceType::Definition
    }

    pub fn to_occurrence(&self) -> SymbolOccurrence {
        SymbolOccurrence {
            location: Location::new(self.uri.clone(), self.selection_range),
            occurrence_type: self.occurrence_type,
            symbol: self.symbol.clone(),
        }
    }
}
