//! BSL syntax tree construction
//!
//! The pipeline runs in three stages:
//!
//! ```text
//! source text --(lexer)--> tokens --(parser)--> green tree --(ast)--> typed nodes
//! ```
//!
//! The tree is lossless: every byte of the input, including whitespace,
//! comments and preprocessor lines, appears in it. Parsing never fails;
//! malformed input produces ERROR nodes and a list of [`SyntaxError`]s
//! alongside a usable tree.

pub mod ast;
pub mod kind;
pub mod lexer;
pub mod parser;

pub use ast::AstNode;
pub use kind::{BslLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
