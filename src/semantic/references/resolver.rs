//! Position-based lookup over collected occurrences

use std::sync::Arc;

use crate::base::Position;
use crate::platform::ModuleType;
use crate::semantic::model::{Reference, Symbol, SymbolInterner, SymbolOccurrence};
use crate::semantic::symbols::SymbolTree;

/// Resolve the symbol under a cursor position.
///
/// Occurrences cover single name tokens and never overlap, so the first hit
/// is the only hit. A position over whitespace, a keyword or an unresolved
/// name returns `None`.
pub fn resolve_at(
    occurrences: &[SymbolOccurrence],
    position: Position,
    from: Arc<Symbol>,
) -> Option<Reference> {
    occurrences
        .iter()
        .find(|occurrence| occurrence.location.range.contains(position))
        .map(|occurrence| Reference {
            from,
            symbol: occurrence.symbol.clone(),
            uri: occurrence.location.uri.clone(),
            selection_range: occurrence.location.range,
            occurrence_type: occurrence.occurrence_type,
        })
}

/// The innermost symbol whose body contains `position`: the enclosing method
/// if there is one, the module itself otherwise.
pub fn enclosing_symbol(
    tree: &SymbolTree,
    mdo_ref: &str,
    module_type: ModuleType,
    interner: &SymbolInterner,
    position: Position,
) -> Arc<Symbol> {
    match tree.method_at(position) {
        Some(method) => interner.intern(Symbol::method(mdo_ref, module_type, &method.name)),
        None => interner.intern(Symbol::module(mdo_ref, module_type)),
    }
}
