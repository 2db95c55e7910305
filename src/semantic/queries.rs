//! Embedded query extraction
//!
//! 1C queries travel through source code as string literals. A literal is a
//! query when any of its `;`-separated batch segments opens with the query
//! language's select keyword. Line continuations (`|`) and surrounding
//! whitespace are skipped before the first word is read.

use smol_str::SmolStr;

use crate::base::{LineIndex, Range};
use crate::core::text_utils::is_word_character;
use crate::syntax::ast::{AstNode, SourceFile};
use crate::syntax::SyntaxKind;

/// A string literal recognized as a query, with its raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryString {
    pub range: Range,
    pub text: SmolStr,
}

/// Find every query literal in a document, in source order.
pub fn embedded_queries(file: &SourceFile, text: &str, index: &LineIndex) -> Vec<QueryString> {
    file.syntax()
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind() == SyntaxKind::STRING && is_query_text(token.text()))
        .map(|token| QueryString {
            range: index.range(text, token.text_range()),
            text: SmolStr::new(token.text()),
        })
        .collect()
}

fn is_query_text(raw: &str) -> bool {
    raw.split(';').any(|segment| {
        let word: String = segment
            .chars()
            .skip_while(|c| c.is_whitespace() || *c == '"' || *c == '|')
            .take_while(|c| is_word_character(*c))
            .collect();
        word.eq_ignore_ascii_case("select") || word.to_lowercase() == "выбрать"
    })
}
