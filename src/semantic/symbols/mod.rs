//! Per-document symbol hierarchy and method descriptions

pub mod builder;
pub mod description;
pub mod tree;

pub use builder::build_symbol_tree;
pub use description::{MethodDescription, ParameterDescription, parse_description};
pub use tree::{
    MethodKind, MethodSymbol, ParameterSymbol, SymbolTree, VariableKind, VariableSymbol,
};
