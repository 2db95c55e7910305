//! # Type inference
//!
//! Best-effort reconstruction of the platform type names a symbol can hold.
//! Nothing here executes code; types come from three sources, tried in
//! order for variables:
//!
//! 1. the variable's declaration description, whose first word names the
//!    type by convention;
//! 2. the right-hand side of the assignment at each definition site, when
//!    that expression has a single operand the resolver understands
//!    (`Новый` constructors, bare calls with documented return types,
//!    literals).
//!
//! Method symbols answer with the return types of their description. An
//! unknown type is an empty list, never an error.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{Position, Uri};
use crate::semantic::model::{Symbol, SymbolKind};
use crate::semantic::workspace::{DocumentContext, Workspace};
use crate::syntax::SyntaxKind;
use crate::syntax::ast::{Assignment, AstNode, CallExpr, Expression, Literal, NewExpr};

pub struct TypeResolver<'a> {
    workspace: &'a Workspace,
}

impl<'a> TypeResolver<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self { workspace }
    }

    /// All type names the symbol is known to carry, in discovery order,
    /// without duplicates.
    pub fn find_types(&self, symbol: &Arc<Symbol>) -> Vec<SmolStr> {
        match symbol.kind {
            SymbolKind::Module => Vec::new(),
            SymbolKind::Method => self.method_return_types(symbol),
            SymbolKind::Variable => self.variable_types(symbol),
        }
    }

    /// Types of the symbol under a cursor position.
    pub fn find_types_at(&self, uri: &Uri, position: Position) -> Vec<SmolStr> {
        match self.workspace.resolve_at(uri, position) {
            Some(reference) => self.find_types(&reference.symbol),
            None => Vec::new(),
        }
    }

    fn method_return_types(&self, symbol: &Symbol) -> Vec<SmolStr> {
        let Some(document) = self
            .workspace
            .get_document_by_mdo_ref(&symbol.mdo_ref, symbol.module_type)
        else {
            return Vec::new();
        };
        let tree = document.symbol_tree();
        tree.method_named(&symbol.name)
            .and_then(|method| method.description.as_ref())
            .map(|description| description.return_types.clone())
            .unwrap_or_default()
    }

    fn variable_types(&self, symbol: &Arc<Symbol>) -> Vec<SmolStr> {
        if let Some(described) = self.described_variable_type(symbol) {
            return vec![described];
        }

        let mut types = Vec::new();
        for occurrence in self.workspace.references().occurrences_of(symbol) {
            if !occurrence.is_definition() {
                continue;
            }
            let Some(document) = self.workspace.get_document(&occurrence.location.uri) else {
                continue;
            };
            for found in self.assigned_types(&document, occurrence.location.range.start) {
                if !types.contains(&found) {
                    types.push(found);
                }
            }
        }
        types
    }

    /// The type named by the first word of the variable's description.
    fn described_variable_type(&self, symbol: &Symbol) -> Option<SmolStr> {
        let document = self
            .workspace
            .get_document_by_mdo_ref(&symbol.mdo_ref, symbol.module_type)?;
        let tree = document.symbol_tree();
        let variable = tree.variable_named(symbol.scope_name.as_deref(), &symbol.name)?;
        let description = variable.description.as_ref()?;
        description.split_whitespace().next().map(SmolStr::new)
    }

    /// Types flowing into a definition site through its enclosing assignment.
    /// Definitions without one, such as loop variables, contribute nothing.
    fn assigned_types(&self, document: &DocumentContext, position: Position) -> Vec<SmolStr> {
        let source = document.source();
        let offset = source.line_index.offset(&source.text, position);
        let Some(token) = source.file().syntax().token_at_offset(offset).right_biased() else {
            return Vec::new();
        };
        let Some(assignment) = token.parent_ancestors().find_map(Assignment::cast) else {
            return Vec::new();
        };
        let Some(value) = assignment.value() else {
            return Vec::new();
        };
        self.expression_types(document, &value)
    }

    /// Types of a single-operand expression. Anything with operators mixes
    /// values and is left untyped.
    fn expression_types(&self, document: &DocumentContext, expression: &Expression) -> Vec<SmolStr> {
        let has_operator_tokens = expression
            .syntax()
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .any(|token| !token.kind().is_trivia());
        let mut operands = expression.syntax().children();
        let (Some(operand), None) = (operands.next(), operands.next()) else {
            return Vec::new();
        };
        if has_operator_tokens {
            return Vec::new();
        }

        match operand.kind() {
            SyntaxKind::NEW_EXPR => NewExpr::cast(operand)
                .and_then(|new_expr| constructed_type(&new_expr))
                .into_iter()
                .collect(),
            SyntaxKind::CALL_EXPR => match CallExpr::cast(operand) {
                Some(call) => self.call_return_types(document, &call),
                None => Vec::new(),
            },
            SyntaxKind::LITERAL => Literal::cast(operand)
                .and_then(|literal| literal_type(&literal))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Return types of the method a bare call is bound to.
    fn call_return_types(&self, document: &DocumentContext, call: &CallExpr) -> Vec<SmolStr> {
        let Some(name) = call.name_token() else {
            return Vec::new();
        };
        let source = document.source();
        let position = source.line_index.position(&source.text, name.text_range().start());
        let Some(occurrence) = self
            .workspace
            .references()
            .occurrence_at(document.uri(), position)
        else {
            return Vec::new();
        };
        if occurrence.symbol.kind != SymbolKind::Method {
            return Vec::new();
        }
        self.method_return_types(&occurrence.symbol)
    }
}

/// The type a `Новый` expression constructs: the type name token in the
/// keyword form, the first string argument in the functional form.
fn constructed_type(new_expr: &NewExpr) -> Option<SmolStr> {
    if let Some(token) = new_expr.type_name_token() {
        return Some(SmolStr::new(token.text()));
    }
    let args = new_expr.args()?;
    let first_string = args
        .syntax()
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == SyntaxKind::STRING)?;
    Some(SmolStr::new(first_string.text().trim_matches('"')))
}

fn literal_type(literal: &Literal) -> Option<SmolStr> {
    let name = match literal.token()?.kind() {
        SyntaxKind::DATE => "Дата",
        SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => "Булево",
        SyntaxKind::NUMBER => "Число",
        SyntaxKind::STRING => "Строка",
        SyntaxKind::UNDEFINED_KW => "Неопределено",
        SyntaxKind::NULL_KW => "Null",
        _ => return None,
    };
    Some(SmolStr::new_static(name))
}
