//! Cognitive and cyclomatic complexity
//!
//! Cognitive complexity follows the SonarSource model: structural constructs
//! cost one point plus the current nesting depth and open a nesting level,
//! `ElsIf`/`Else` cost a flat point, and each alternation in a run of boolean
//! operators costs a point. Cyclomatic complexity is the classic decision
//! count: one per method plus one per branch point and boolean operator.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::semantic::model::case_fold;
use crate::syntax::ast::{AstNode, CallExpr, SourceFile};
use crate::syntax::{SyntaxElement, SyntaxKind, SyntaxNode};

/// Complexity totals for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexityData {
    /// Sum over all methods and module-level code
    pub file_complexity: u32,
    /// Module-level code outside any method
    pub file_code_block_complexity: u32,
    /// Per-method totals keyed by case-folded method name
    pub methods: FxHashMap<SmolStr, u32>,
}

pub fn cognitive_complexity(file: &SourceFile) -> ComplexityData {
    let mut data = ComplexityData::default();
    let mut walker = CognitiveWalker::default();

    for method in file.methods() {
        let Some(name) = method.name() else { continue };
        walker.reset(Some(case_fold(&name)));
        if let Some(body) = method.body() {
            walker.walk(body.syntax());
        }
        data.file_complexity += walker.complexity;
        data.methods.insert(case_fold(&name), walker.complexity);
    }

    walker.reset(None);
    for root in module_statement_roots(file) {
        walker.walk(&root);
    }
    data.file_code_block_complexity = walker.complexity;
    data.file_complexity += walker.complexity;

    data
}

pub fn cyclomatic_complexity(file: &SourceFile) -> ComplexityData {
    let mut data = ComplexityData::default();
    let mut walker = CyclomaticWalker::default();

    for method in file.methods() {
        let Some(name) = method.name() else { continue };
        walker.reset(Some(case_fold(&name)));
        // The method entry point itself is one path
        walker.complexity = 1;
        if let Some(body) = method.body() {
            walker.walk(body.syntax());
        }
        data.file_complexity += walker.complexity;
        data.methods.insert(case_fold(&name), walker.complexity);
    }

    walker.reset(None);
    for root in module_statement_roots(file) {
        walker.walk(&root);
    }
    data.file_code_block_complexity = walker.complexity;
    data.file_complexity += walker.complexity;

    data
}

/// Top-level statements outside declarations
fn module_statement_roots(file: &SourceFile) -> Vec<SyntaxNode> {
    file.syntax()
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
        .collect()
}

/// One boolean operand stream entry. `Splitter` marks the boundary of a
/// negated parenthesized group; it never scores but breaks operator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoolToken {
    And,
    Or,
    Splitter,
}

#[derive(Default)]
struct CognitiveWalker {
    complexity: u32,
    nesting: u32,
    current_method: Option<SmolStr>,
    /// Expressions already folded into an enclosing alternation stream
    ignored: FxHashSet<SyntaxNode>,
}

impl CognitiveWalker {
    fn reset(&mut self, current_method: Option<SmolStr>) {
        self.complexity = 0;
        self.nesting = 0;
        self.current_method = current_method;
        self.ignored.clear();
    }

    fn walk(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::IF_STATEMENT => self.walk_if(node),
            SyntaxKind::WHILE_STATEMENT
            | SyntaxKind::FOR_STATEMENT
            | SyntaxKind::FOR_EACH_STATEMENT
            | SyntaxKind::TERNARY_EXPR => {
                self.structural_increment();
                self.walk_children(node);
                self.nesting -= 1;
            }
            SyntaxKind::TRY_STATEMENT => self.walk_try(node),
            SyntaxKind::CALL_EXPR => {
                self.recursion_increment(node);
                self.walk_children(node);
            }
            SyntaxKind::EXPRESSION => {
                self.alternation_increments(node);
                self.walk_children(node);
            }
            _ => self.walk_children(node),
        }
    }

    fn walk_children(&mut self, node: &SyntaxNode) {
        for child in node.children() {
            self.walk(&child);
        }
    }

    fn walk_if(&mut self, node: &SyntaxNode) {
        self.structural_increment();
        for child in node.children() {
            match child.kind() {
                SyntaxKind::ELSIF_BRANCH | SyntaxKind::ELSE_BRANCH => {
                    // Close the previous branch, open this one at flat cost
                    self.nesting -= 1;
                    self.hybrid_increment();
                    self.walk_children(&child);
                }
                _ => self.walk(&child),
            }
        }
        self.nesting -= 1;
    }

    fn walk_try(&mut self, node: &SyntaxNode) {
        let mut blocks = node.children().filter(|c| c.kind() == SyntaxKind::BLOCK);
        if let Some(body) = blocks.next() {
            self.walk_children(&body);
        }
        // Only the handler costs; the protected block is plain control flow
        if let Some(handler) = blocks.next() {
            self.structural_increment();
            self.walk_children(&handler);
            self.nesting -= 1;
        }
    }

    /// A call of the enclosing method is indirect control flow
    fn recursion_increment(&mut self, node: &SyntaxNode) {
        let Some(current) = &self.current_method else {
            return;
        };
        if let Some(token) = CallExpr::cast(node.clone()).and_then(|c| c.name_token()) {
            if case_fold(token.text()) == *current {
                self.complexity += 1;
            }
        }
    }

    /// Score one point per run of equal boolean operators. `А И Б И В` is
    /// one point, `А И Б Или В` is two.
    fn alternation_increments(&mut self, node: &SyntaxNode) {
        if self.ignored.contains(node) {
            return;
        }
        let mut stream = Vec::new();
        self.flatten_expression(node, &mut stream);

        let mut last = None;
        for token in stream {
            if last != Some(token) {
                last = Some(token);
                if token != BoolToken::Splitter {
                    self.complexity += 1;
                }
            }
        }
    }

    /// Collect boolean operators of this expression and of parenthesized
    /// sub-expressions into one stream, the way a reader scans the line.
    /// Negated groups are fenced with splitters so their operators do not
    /// merge with the surrounding run.
    fn flatten_expression(&mut self, node: &SyntaxNode, out: &mut Vec<BoolToken>) {
        let mut pending_not = false;
        for element in node.children_with_tokens() {
            match element {
                SyntaxElement::Token(token) => match token.kind() {
                    SyntaxKind::AND_KW => {
                        pending_not = false;
                        out.push(BoolToken::And);
                    }
                    SyntaxKind::OR_KW => {
                        pending_not = false;
                        out.push(BoolToken::Or);
                    }
                    SyntaxKind::NOT_KW => pending_not = true,
                    _ => {}
                },
                SyntaxElement::Node(child) => {
                    if child.kind() == SyntaxKind::PAREN_EXPR {
                        if let Some(inner) =
                            child.children().find(|n| n.kind() == SyntaxKind::EXPRESSION)
                        {
                            self.ignored.insert(inner.clone());
                            let mut nested = Vec::new();
                            self.flatten_expression(&inner, &mut nested);
                            if pending_not && !nested.is_empty() {
                                out.push(BoolToken::Splitter);
                                out.extend(nested);
                                out.push(BoolToken::Splitter);
                            } else {
                                out.extend(nested);
                            }
                        }
                    }
                    pending_not = false;
                }
            }
        }
    }

    fn structural_increment(&mut self) {
        self.complexity += 1 + self.nesting;
        self.nesting += 1;
    }

    fn hybrid_increment(&mut self) {
        self.complexity += 1;
        self.nesting += 1;
    }
}

#[derive(Default)]
struct CyclomaticWalker {
    complexity: u32,
    current_method: Option<SmolStr>,
}

impl CyclomaticWalker {
    fn reset(&mut self, current_method: Option<SmolStr>) {
        self.complexity = 0;
        self.current_method = current_method;
    }

    fn walk(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::IF_STATEMENT
            | SyntaxKind::ELSIF_BRANCH
            | SyntaxKind::ELSE_BRANCH
            | SyntaxKind::WHILE_STATEMENT
            | SyntaxKind::FOR_STATEMENT
            | SyntaxKind::FOR_EACH_STATEMENT
            | SyntaxKind::TERNARY_EXPR
            | SyntaxKind::TRY_STATEMENT => {
                self.complexity += 1;
                self.walk_children(node);
            }
            SyntaxKind::CALL_EXPR => {
                if let (Some(current), Some(token)) = (
                    self.current_method.as_ref(),
                    CallExpr::cast(node.clone()).and_then(|c| c.name_token()),
                ) {
                    if case_fold(token.text()) == *current {
                        self.complexity += 1;
                    }
                }
                self.walk_children(node);
            }
            SyntaxKind::EXPRESSION => {
                let operators = node
                    .children_with_tokens()
                    .filter_map(SyntaxElement::into_token)
                    .filter(|t| matches!(t.kind(), SyntaxKind::AND_KW | SyntaxKind::OR_KW))
                    .count();
                self.complexity += operators as u32;
                self.walk_children(node);
            }
            _ => self.walk_children(node),
        }
    }

    fn walk_children(&mut self, node: &SyntaxNode) {
        for child in node.children() {
            self.walk(&child);
        }
    }
}
