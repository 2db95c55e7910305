//! Per-document reference collection
//!
//! Walks a parsed module and produces every occurrence the index stores: a
//! `Definition` at each declaration site and a `Reference` at every other
//! textual use. Methods are declared in a pre-pass because BSL allows calls
//! before the declaration. Calls that cannot be statically bound (unknown
//! receiver, built-in, undeclared name) yield no occurrence; that is the
//! normal outcome for dynamic dispatch, not an error.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{LineIndex, Uri};
use crate::platform::ModuleType;
use crate::semantic::model::{OccurrenceType, Reference, Symbol, SymbolInterner, case_fold};
use crate::semantic::scope::ScopeStack;
use crate::syntax::ast::{Assignment, AstNode, CallExpr, MemberExpr, NameRef, SourceFile, VarDecl};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Collect all occurrences of one document.
///
/// `lookup_module` maps a receiver name to the metadata reference of a known
/// common module; it is how cross-module calls bind.
pub fn collect_references<F>(
    uri: &Uri,
    text: &str,
    index: &LineIndex,
    file: &SourceFile,
    mdo_ref: &str,
    module_type: ModuleType,
    interner: &SymbolInterner,
    lookup_module: F,
) -> Vec<Reference>
where
    F: Fn(&str) -> Option<SmolStr>,
{
    let module_symbol = interner.intern(Symbol::module(mdo_ref, module_type));
    let mut collector = Collector {
        uri,
        text,
        index,
        mdo_ref,
        module_type,
        interner,
        lookup_module,
        scopes: ScopeStack::new(),
        local_methods: FxHashMap::default(),
        current_method: None,
        current_from: module_symbol.clone(),
        module_symbol,
        references: Vec::new(),
    };
    collector.run(file);
    collector.references
}

struct Collector<'a, F> {
    uri: &'a Uri,
    text: &'a str,
    index: &'a LineIndex,
    mdo_ref: &'a str,
    module_type: ModuleType,
    interner: &'a SymbolInterner,
    lookup_module: F,
    scopes: ScopeStack,
    /// Case-folded method name to its interned symbol
    local_methods: FxHashMap<SmolStr, Arc<Symbol>>,
    /// Display name of the method currently being walked
    current_method: Option<SmolStr>,
    current_from: Arc<Symbol>,
    module_symbol: Arc<Symbol>,
    references: Vec<Reference>,
}

impl<F> Collector<'_, F>
where
    F: Fn(&str) -> Option<SmolStr>,
{
    fn run(&mut self, file: &SourceFile) {
        // Module variables first; they are visible everywhere
        for decl in file.var_decls() {
            for name in decl.names() {
                let symbol = self.intern_variable(name.text());
                self.scopes.declare(name.text(), symbol.clone());
                self.emit(symbol, &name, OccurrenceType::Definition);
            }
        }

        // Method pre-pass so calls bind regardless of declaration order
        for method in file.methods() {
            if let Some(token) = method.name_token() {
                let symbol = self
                    .interner
                    .intern(Symbol::method(self.mdo_ref, self.module_type, token.text()));
                self.local_methods
                    .insert(case_fold(token.text()), symbol.clone());
                self.current_from = symbol.clone();
                self.emit(symbol, &token, OccurrenceType::Definition);
            }
        }

        for method in file.methods() {
            let Some(name_token) = method.name_token() else {
                continue;
            };
            let Some(method_symbol) = self.local_methods.get(&case_fold(name_token.text())).cloned()
            else {
                continue;
            };

            self.current_method = Some(SmolStr::new(name_token.text()));
            self.current_from = method_symbol;
            self.scopes.push();

            for param in method.params() {
                if let Some(token) = param.name_token() {
                    let symbol = self.intern_variable(token.text());
                    self.scopes.declare(token.text(), symbol.clone());
                    self.emit(symbol, &token, OccurrenceType::Definition);
                }
            }

            if let Some(body) = method.body() {
                self.walk(body.syntax());
            }

            self.scopes.pop();
            self.current_method = None;
        }

        // Statements in the module body, outside any method
        self.current_from = self.module_symbol.clone();
        let statement_roots: Vec<SyntaxNode> = file
            .syntax()
            .children()
            .filter(|n| {
                !matches!(
                    n.kind(),
                    SyntaxKind::VAR_DECL
                        | SyntaxKind::PROCEDURE
                        | SyntaxKind::FUNCTION
                        | SyntaxKind::ANNOTATION
                        | SyntaxKind::ERROR
                )
            })
            .collect();
        for root in statement_roots {
            self.walk(&root);
        }
    }

    fn walk(&mut self, root: &SyntaxNode) {
        for node in root.descendants() {
            match node.kind() {
                SyntaxKind::VAR_DECL => self.handle_var_decl(&node),
                SyntaxKind::ASSIGNMENT => self.handle_assignment_target(&node),
                SyntaxKind::FOR_STATEMENT | SyntaxKind::FOR_EACH_STATEMENT => {
                    self.handle_loop_variable(&node)
                }
                SyntaxKind::NAME_REF => self.handle_name_ref(&node),
                SyntaxKind::CALL_EXPR => self.handle_call(&node),
                SyntaxKind::MEMBER_EXPR => self.handle_member(&node),
                _ => {}
            }
        }
    }

    fn handle_var_decl(&mut self, node: &SyntaxNode) {
        let Some(decl) = VarDecl::cast(node.clone()) else {
            return;
        };
        for name in decl.names() {
            if let Some(existing) = self.scopes.lookup(name.text()).cloned() {
                // A repeated declaration refers back to the first one
                self.emit(existing, &name, OccurrenceType::Reference);
            } else {
                let symbol = self.intern_variable(name.text());
                self.scopes.declare(name.text(), symbol.clone());
                self.emit(symbol, &name, OccurrenceType::Definition);
            }
        }
    }

    fn handle_assignment_target(&mut self, node: &SyntaxNode) {
        let target = Assignment::cast(node.clone())
            .and_then(|a| a.target())
            .filter(|t| t.kind() == SyntaxKind::NAME_REF)
            .and_then(NameRef::cast)
            .and_then(|r| r.name_token());
        if let Some(token) = target {
            self.use_or_declare(&token);
        }
    }

    fn handle_loop_variable(&mut self, node: &SyntaxNode) {
        let token = node
            .children()
            .find(|n| n.kind() == SyntaxKind::NAME_REF)
            .and_then(NameRef::cast)
            .and_then(|r| r.name_token());
        if let Some(token) = token {
            self.use_or_declare(&token);
        }
    }

    /// Bare names count as uses only where the grammar puts operands; the
    /// wrappers direct children of assignments and loops are handled at
    /// their statement instead.
    fn handle_name_ref(&mut self, node: &SyntaxNode) {
        let in_operand_position = node
            .parent()
            .map(|p| matches!(p.kind(), SyntaxKind::EXPRESSION | SyntaxKind::CALL_STATEMENT))
            .unwrap_or(false);
        if !in_operand_position {
            return;
        }
        let Some(token) = NameRef::cast(node.clone()).and_then(|r| r.name_token()) else {
            return;
        };
        if let Some(symbol) = self.scopes.lookup(token.text()).cloned() {
            self.emit(symbol, &token, OccurrenceType::Reference);
        }
    }

    fn handle_call(&mut self, node: &SyntaxNode) {
        let Some(token) = CallExpr::cast(node.clone()).and_then(|c| c.name_token()) else {
            return;
        };
        if let Some(symbol) = self.local_methods.get(&case_fold(token.text())).cloned() {
            self.emit(symbol, &token, OccurrenceType::Reference);
        }
    }

    fn handle_member(&mut self, node: &SyntaxNode) {
        let Some(member) = MemberExpr::cast(node.clone()) else {
            return;
        };

        if let Some((receiver, method)) = member.two_part_call() {
            if let Some(target_ref) = (self.lookup_module)(receiver.text()) {
                let symbol = self.interner.intern(Symbol::method(
                    target_ref,
                    ModuleType::CommonModule,
                    method.text(),
                ));
                self.emit(symbol, &method, OccurrenceType::Reference);
                return;
            }
        }

        // The chain starts from a plain name; count it as a variable use
        if let Some(receiver) = member.receiver_token() {
            if let Some(symbol) = self.scopes.lookup(receiver.text()).cloned() {
                self.emit(symbol, &receiver, OccurrenceType::Reference);
            }
        }
    }

    /// An assignment target either uses an existing binding or declares a
    /// new variable in the current scope.
    fn use_or_declare(&mut self, token: &SyntaxToken) {
        if let Some(existing) = self.scopes.lookup(token.text()).cloned() {
            self.emit(existing, token, OccurrenceType::Reference);
        } else {
            let symbol = self.intern_variable(token.text());
            self.scopes.declare(token.text(), symbol.clone());
            self.emit(symbol, token, OccurrenceType::Definition);
        }
    }

    fn intern_variable(&self, name: &str) -> Arc<Symbol> {
        let symbol = match &self.current_method {
            Some(method) => {
                Symbol::local_variable(self.mdo_ref, self.module_type, method, name)
            }
            None => Symbol::module_variable(self.mdo_ref, self.module_type, name),
        };
        self.interner.intern(symbol)
    }

    fn emit(&mut self, symbol: Arc<Symbol>, token: &SyntaxToken, occurrence_type: OccurrenceType) {
        self.references.push(Reference {
            from: self.current_from.clone(),
            symbol,
            uri: self.uri.clone(),
            selection_range: self.index.range(self.text, token.text_range()),
            occurrence_type,
        });
    }
}
