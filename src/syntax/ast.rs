//! Typed AST layer over the raw syntax tree
//!
//! Thin wrappers around [`SyntaxNode`] that provide structured access to
//! module declarations, statements and expressions. Casting is free; the
//! wrappers hold the node and nothing else.

use super::kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Common interface for all AST nodes
pub trait AstNode: Sized {
    /// Check if a syntax node kind can be cast to this AST node type
    fn can_cast(kind: SyntaxKind) -> bool;

    /// Try to cast a syntax node to this AST node type
    fn cast(syntax: SyntaxNode) -> Option<Self>;

    /// Get the underlying syntax node
    fn syntax(&self) -> &SyntaxNode;

    /// Iterate over all descendants of this node that can be cast to T
    fn descendants<T: AstNode>(&self) -> impl Iterator<Item = T> {
        self.syntax().descendants().filter_map(T::cast)
    }

    /// Extract the comment block directly above this node, if any
    fn doc_comment(&self) -> Option<String> {
        extract_doc_comment(self.syntax())
    }
}

/// Extract the documentation comment above a node.
///
/// Collects contiguous `//` lines immediately preceding the node. Annotation
/// nodes sit between a method and its description, so they are stepped over.
/// A comment trailing other code on the same line is not a description.
pub(crate) fn extract_doc_comment(node: &SyntaxNode) -> Option<String> {
    let mut lines = Vec::new();
    let mut current = node.prev_sibling_or_token();

    while let Some(element) = current {
        match element.kind() {
            SyntaxKind::WHITESPACE | SyntaxKind::ANNOTATION => {
                current = element.prev_sibling_or_token();
            }
            SyntaxKind::LINE_COMMENT => {
                let before = element.prev_sibling_or_token();
                let own_line = match &before {
                    None => true,
                    Some(prev) => {
                        prev.kind() == SyntaxKind::ANNOTATION
                            || (prev.kind() == SyntaxKind::WHITESPACE
                                && prev
                                    .as_token()
                                    .map(|t| t.text().contains('\n'))
                                    .unwrap_or(false))
                    }
                };
                if !own_line {
                    break;
                }
                if let Some(token) = element.as_token() {
                    let text = token.text();
                    let stripped = text.strip_prefix("//").unwrap_or(text);
                    let stripped = stripped.strip_prefix(' ').unwrap_or(stripped);
                    lines.push(stripped.to_string());
                }
                current = before;
            }
            _ => break,
        }
    }

    if lines.is_empty() {
        None
    } else {
        lines.reverse();
        Some(lines.join("\n"))
    }
}

/// Check if a node directly contains a token of the given kind
pub(crate) fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == kind)
}

/// Find the first identifier token directly inside a node
pub(crate) fn find_name_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::IDENT)
}

/// All identifier tokens directly inside a node, in source order
fn ident_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::IDENT)
}

macro_rules! ast_node {
    ($(#[$attr:meta])* $name:ident, $kind:expr) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == $kind
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                if Self::can_cast(syntax.kind()) {
                    Some(Self { syntax })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(
    /// The root of a parsed module
    SourceFile,
    SyntaxKind::SOURCE_FILE
);

impl SourceFile {
    /// Module-level variable declarations
    pub fn var_decls(&self) -> impl Iterator<Item = VarDecl> {
        self.syntax.children().filter_map(VarDecl::cast)
    }

    /// Procedures and functions declared in the module
    pub fn methods(&self) -> impl Iterator<Item = Method> {
        self.syntax.children().filter_map(Method::cast)
    }
}

ast_node!(
    /// A compiler annotation such as `&НаСервере`
    Annotation,
    SyntaxKind::ANNOTATION
);

impl Annotation {
    pub fn name(&self) -> Option<String> {
        find_name_token(&self.syntax).map(|t| t.text().to_string())
    }
}

ast_node!(
    /// `Перем Имя1, Имя2 Экспорт;`
    VarDecl,
    SyntaxKind::VAR_DECL
);

impl VarDecl {
    /// Declared variable name tokens, one per variable
    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> {
        ident_tokens(&self.syntax)
    }

    pub fn is_export(&self) -> bool {
        has_token(&self.syntax, SyntaxKind::EXPORT_KW)
    }
}

/// A procedure or function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    syntax: SyntaxNode,
}

impl AstNode for Method {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::PROCEDURE | SyntaxKind::FUNCTION)
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if Self::can_cast(syntax.kind()) {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Method {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        find_name_token(&self.syntax)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn is_function(&self) -> bool {
        self.syntax.kind() == SyntaxKind::FUNCTION
    }

    pub fn is_export(&self) -> bool {
        has_token(&self.syntax, SyntaxKind::EXPORT_KW)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        self.syntax.children().find_map(ParamList::cast)
    }

    pub fn params(&self) -> impl Iterator<Item = Param> {
        self.param_list()
            .into_iter()
            .flat_map(|list| list.params().collect::<Vec<_>>())
    }

    pub fn body(&self) -> Option<Block> {
        self.syntax.children().find_map(Block::cast)
    }

    /// Annotations directly above the declaration
    pub fn annotations(&self) -> Vec<Annotation> {
        let mut found = Vec::new();
        let mut current = self.syntax.prev_sibling_or_token();
        while let Some(element) = current {
            match element.kind() {
                SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT => {
                    current = element.prev_sibling_or_token();
                }
                SyntaxKind::ANNOTATION => {
                    if let Some(node) = element.as_node() {
                        if let Some(annotation) = Annotation::cast(node.clone()) {
                            found.push(annotation);
                        }
                    }
                    current = element.prev_sibling_or_token();
                }
                _ => break,
            }
        }
        found.reverse();
        found
    }
}

ast_node!(ParamList, SyntaxKind::PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> {
        self.syntax.children().filter_map(Param::cast)
    }
}

ast_node!(
    /// A single parameter: `Знач Имя = Умолчание`
    Param,
    SyntaxKind::PARAM
);

impl Param {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        find_name_token(&self.syntax)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn is_by_value(&self) -> bool {
        has_token(&self.syntax, SyntaxKind::VAL_KW)
    }

    pub fn default_value(&self) -> Option<Literal> {
        self.syntax.children().find_map(Literal::cast)
    }
}

ast_node!(Block, SyntaxKind::BLOCK);

impl Block {
    /// Direct child statements of this block
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children()
    }
}

ast_node!(
    /// `Цель = Выражение;`
    Assignment,
    SyntaxKind::ASSIGNMENT
);

impl Assignment {
    /// The assignment target node, before the `=`
    pub fn target(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| {
            matches!(
                n.kind(),
                SyntaxKind::NAME_REF | SyntaxKind::MEMBER_EXPR | SyntaxKind::CALL_EXPR
            )
        })
    }

    /// The assigned expression, after the `=`
    pub fn value(&self) -> Option<Expression> {
        self.syntax.children().find_map(Expression::cast)
    }
}

ast_node!(CallStatement, SyntaxKind::CALL_STATEMENT);

impl CallStatement {
    /// The call or member chain making up the statement
    pub fn call(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| {
            matches!(
                n.kind(),
                SyntaxKind::CALL_EXPR | SyntaxKind::MEMBER_EXPR | SyntaxKind::NAME_REF
            )
        })
    }
}

ast_node!(IfStatement, SyntaxKind::IF_STATEMENT);
ast_node!(WhileStatement, SyntaxKind::WHILE_STATEMENT);

ast_node!(ForStatement, SyntaxKind::FOR_STATEMENT);

impl ForStatement {
    /// The counter variable, a declaration site
    pub fn loop_variable(&self) -> Option<SyntaxToken> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::NAME_REF)
            .and_then(|n| find_name_token(&n))
    }
}

ast_node!(ForEachStatement, SyntaxKind::FOR_EACH_STATEMENT);

impl ForEachStatement {
    /// The iteration variable, a declaration site
    pub fn loop_variable(&self) -> Option<SyntaxToken> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::NAME_REF)
            .and_then(|n| find_name_token(&n))
    }
}

ast_node!(ReturnStatement, SyntaxKind::RETURN_STATEMENT);

impl ReturnStatement {
    pub fn value(&self) -> Option<Expression> {
        self.syntax.children().find_map(Expression::cast)
    }
}

ast_node!(TryStatement, SyntaxKind::TRY_STATEMENT);
ast_node!(RaiseStatement, SyntaxKind::RAISE_STATEMENT);

ast_node!(
    /// A flat expression; operators are inline tokens, operands are child nodes
    Expression,
    SyntaxKind::EXPRESSION
);

ast_node!(
    /// A bare name usage
    NameRef,
    SyntaxKind::NAME_REF
);

impl NameRef {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        find_name_token(&self.syntax)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }
}

ast_node!(
    /// `Имя(Аргументы)` with no receiver
    CallExpr,
    SyntaxKind::CALL_EXPR
);

impl CallExpr {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        find_name_token(&self.syntax)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn args(&self) -> Option<ArgList> {
        self.syntax.children().find_map(ArgList::cast)
    }
}

ast_node!(
    /// A dotted or indexed access chain starting from a name
    MemberExpr,
    SyntaxKind::MEMBER_EXPR
);

impl MemberExpr {
    /// The leading name the chain starts from
    pub fn receiver_token(&self) -> Option<SyntaxToken> {
        find_name_token(&self.syntax)
    }

    /// Match the exact shape `Получатель.Метод(...)` with nothing after the
    /// call. Longer or indexed chains go through runtime values and cannot be
    /// resolved statically.
    pub fn two_part_call(&self) -> Option<(SyntaxToken, SyntaxToken)> {
        let mut elements = self
            .syntax
            .children_with_tokens()
            .filter(|e| !e.kind().is_trivia());

        let receiver = elements.next()?.into_token().filter(|t| t.kind() == SyntaxKind::IDENT)?;
        let dot = elements.next()?;
        if dot.kind() != SyntaxKind::DOT {
            return None;
        }
        let method = elements.next()?.into_token().filter(|t| t.kind() == SyntaxKind::IDENT)?;
        let args = elements.next()?;
        if args.kind() != SyntaxKind::ARG_LIST {
            return None;
        }
        if elements.next().is_some() {
            return None;
        }
        Some((receiver, method))
    }

    pub fn arg_lists(&self) -> impl Iterator<Item = ArgList> {
        self.syntax.children().filter_map(ArgList::cast)
    }
}

ast_node!(
    /// `Новый Тип(Аргументы)`
    NewExpr,
    SyntaxKind::NEW_EXPR
);

impl NewExpr {
    /// The constructed type name, absent in the `Новый(Тип)` form
    pub fn type_name_token(&self) -> Option<SyntaxToken> {
        find_name_token(&self.syntax)
    }

    pub fn type_name(&self) -> Option<String> {
        self.type_name_token().map(|t| t.text().to_string())
    }

    pub fn args(&self) -> Option<ArgList> {
        self.syntax.children().find_map(ArgList::cast)
    }
}

ast_node!(Literal, SyntaxKind::LITERAL);

impl Literal {
    /// The literal token itself, skipping a sign if present
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_literal())
    }
}

ast_node!(TernaryExpr, SyntaxKind::TERNARY_EXPR);

impl TernaryExpr {
    pub fn args(&self) -> Option<ArgList> {
        self.syntax.children().find_map(ArgList::cast)
    }
}

ast_node!(ArgList, SyntaxKind::ARG_LIST);

impl ArgList {
    pub fn expressions(&self) -> impl Iterator<Item = Expression> {
        self.syntax.children().filter_map(Expression::cast)
    }
}
