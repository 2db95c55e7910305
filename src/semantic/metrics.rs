//! Per-document size metrics

use rustc_hash::FxHashSet;

use crate::base::LineIndex;
use crate::syntax::ast::{AstNode, SourceFile};
use crate::syntax::{SyntaxElement, SyntaxKind};

/// Size counters for one document.
///
/// Line counters are distinct-line counts: a line holding both code and a
/// trailing comment is counted in both `code_lines` and `comment_lines`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub total_lines: u32,
    pub code_lines: u32,
    pub comment_lines: u32,
    pub statements: u32,
    pub methods: u32,
}

pub fn compute_metrics(file: &SourceFile, text: &str, index: &LineIndex) -> Metrics {
    let mut code_lines: FxHashSet<u32> = FxHashSet::default();
    let mut comment_lines: FxHashSet<u32> = FxHashSet::default();
    let mut statements = 0;
    let mut methods = 0;

    for element in file.syntax().descendants_with_tokens() {
        match element {
            SyntaxElement::Node(node) => match node.kind() {
                SyntaxKind::PROCEDURE | SyntaxKind::FUNCTION => methods += 1,
                SyntaxKind::ASSIGNMENT
                | SyntaxKind::CALL_STATEMENT
                | SyntaxKind::IF_STATEMENT
                | SyntaxKind::WHILE_STATEMENT
                | SyntaxKind::FOR_STATEMENT
                | SyntaxKind::FOR_EACH_STATEMENT
                | SyntaxKind::RETURN_STATEMENT
                | SyntaxKind::TRY_STATEMENT
                | SyntaxKind::RAISE_STATEMENT
                | SyntaxKind::BREAK_STATEMENT
                | SyntaxKind::CONTINUE_STATEMENT => statements += 1,
                _ => {}
            },
            SyntaxElement::Token(token) => {
                let start = index.position(text, token.text_range().start()).line;
                if token.kind() == SyntaxKind::LINE_COMMENT {
                    comment_lines.insert(start);
                } else if !token.kind().is_trivia() {
                    let end = index.position(text, token.text_range().end()).line;
                    // Multiline strings contribute every covered line
                    for line in start..=end {
                        code_lines.insert(line);
                    }
                }
            }
        }
    }

    Metrics {
        total_lines: text.lines().count() as u32,
        code_lines: code_lines.len() as u32,
        comment_lines: comment_lines.len() as u32,
        statements,
        methods,
    }
}
