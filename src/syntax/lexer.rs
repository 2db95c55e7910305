//! Logos-based lexer for BSL
//!
//! Fast tokenization using the logos crate. Keywords are not matched by the
//! regex layer: BSL is case-insensitive and every keyword has a Russian and
//! an English spelling, so identifiers are classified against the keyword
//! table after lexing.

use logos::Logos;
use rowan::TextSize;

use super::kind::SyntaxKind;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(LogosToken::Ident) => keyword_kind(text).unwrap_or(SyntaxKind::IDENT),
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Classify an identifier as a keyword, in either language, ignoring case.
pub fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    let lower = text.to_lowercase();
    let kind = match lower.as_str() {
        "процедура" | "procedure" => SyntaxKind::PROCEDURE_KW,
        "конецпроцедуры" | "endprocedure" => SyntaxKind::END_PROCEDURE_KW,
        "функция" | "function" => SyntaxKind::FUNCTION_KW,
        "конецфункции" | "endfunction" => SyntaxKind::END_FUNCTION_KW,
        "перем" | "var" => SyntaxKind::VAR_KW,
        "экспорт" | "export" => SyntaxKind::EXPORT_KW,
        "знач" | "val" => SyntaxKind::VAL_KW,
        "если" | "if" => SyntaxKind::IF_KW,
        "тогда" | "then" => SyntaxKind::THEN_KW,
        "иначеесли" | "elsif" => SyntaxKind::ELSIF_KW,
        "иначе" | "else" => SyntaxKind::ELSE_KW,
        "конецесли" | "endif" => SyntaxKind::END_IF_KW,
        "для" | "for" => SyntaxKind::FOR_KW,
        "каждого" | "each" => SyntaxKind::EACH_KW,
        "из" | "in" => SyntaxKind::IN_KW,
        "по" | "to" => SyntaxKind::TO_KW,
        "пока" | "while" => SyntaxKind::WHILE_KW,
        "цикл" | "do" => SyntaxKind::DO_KW,
        "конеццикла" | "enddo" => SyntaxKind::END_DO_KW,
        "возврат" | "return" => SyntaxKind::RETURN_KW,
        "прервать" | "break" => SyntaxKind::BREAK_KW,
        "продолжить" | "continue" => SyntaxKind::CONTINUE_KW,
        "попытка" | "try" => SyntaxKind::TRY_KW,
        "исключение" | "except" => SyntaxKind::EXCEPT_KW,
        "конецпопытки" | "endtry" => SyntaxKind::END_TRY_KW,
        "вызватьисключение" | "raise" => SyntaxKind::RAISE_KW,
        "новый" | "new" => SyntaxKind::NEW_KW,
        "не" | "not" => SyntaxKind::NOT_KW,
        "и" | "and" => SyntaxKind::AND_KW,
        "или" | "or" => SyntaxKind::OR_KW,
        "истина" | "true" => SyntaxKind::TRUE_KW,
        "ложь" | "false" => SyntaxKind::FALSE_KW,
        "неопределено" | "undefined" => SyntaxKind::UNDEFINED_KW,
        "null" => SyntaxKind::NULL_KW,
        _ => return None,
    };
    Some(kind)
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    // \u{feff}: 1C tooling writes a BOM at the start of module files
    #[regex(r"[ \t\r\n\u{feff}]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"#[^\n]*")]
    Preproc,

    // =========================================================================
    // LITERALS AND NAMES
    // =========================================================================
    #[regex(r"[a-zA-Zа-яА-ЯёЁ_][a-zA-Z0-9а-яА-ЯёЁ_]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    // Doubled quotes escape; the content may span lines (multiline strings
    // continue with a leading |, which is just content here)
    #[regex(r#""([^"]|"")*""#)]
    String,

    #[regex(r"'[^'\n]*'")]
    Date,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("<>")]
    LtGt,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            Preproc => SyntaxKind::PREPROC,

            // Literals and names
            Ident => SyntaxKind::IDENT,
            Number => SyntaxKind::NUMBER,
            String => SyntaxKind::STRING,
            Date => SyntaxKind::DATE,

            // Multi-char punctuation
            LtGt => SyntaxKind::LT_GT,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,

            // Single-char punctuation
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            Dot => SyntaxKind::DOT,
            Comma => SyntaxKind::COMMA,
            Semicolon => SyntaxKind::SEMICOLON,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Question => SyntaxKind::QUESTION,
            Amp => SyntaxKind::AMP,
        }
    }
}
