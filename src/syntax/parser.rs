//! Recursive descent parser for BSL
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.

use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::kind::SyntaxKind;
use super::lexer::{Lexer, Token};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Get the typed root. The root node is always `SOURCE_FILE`, even for
    /// empty or unparseable input.
    pub fn tree(&self) -> super::ast::SourceFile {
        use super::ast::AstNode;
        super::ast::SourceFile::cast(self.syntax()).unwrap()
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse BSL source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Keywords that terminate any open statement block. A block never consumes
/// past a method boundary, so a missing `КонецЕсли` cannot swallow the rest
/// of the module.
const HARD_BLOCK_ENDS: &[SyntaxKind] = &[
    SyntaxKind::END_PROCEDURE_KW,
    SyntaxKind::END_FUNCTION_KW,
    SyntaxKind::PROCEDURE_KW,
    SyntaxKind::FUNCTION_KW,
];

const STMT_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::SEMICOLON,
    SyntaxKind::VAR_KW,
    SyntaxKind::IF_KW,
    SyntaxKind::ELSIF_KW,
    SyntaxKind::ELSE_KW,
    SyntaxKind::END_IF_KW,
    SyntaxKind::WHILE_KW,
    SyntaxKind::FOR_KW,
    SyntaxKind::END_DO_KW,
    SyntaxKind::RETURN_KW,
    SyntaxKind::TRY_KW,
    SyntaxKind::EXCEPT_KW,
    SyntaxKind::END_TRY_KW,
    SyntaxKind::RAISE_KW,
    SyntaxKind::BREAK_KW,
    SyntaxKind::CONTINUE_KW,
    SyntaxKind::PROCEDURE_KW,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::END_PROCEDURE_KW,
    SyntaxKind::END_FUNCTION_KW,
];

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        // Look ahead, skipping trivia
        let mut idx = self.pos;
        let mut count = 0;
        while idx < self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return self.tokens[idx].kind;
                }
                count += 1;
            }
            idx += 1;
        }
        SyntaxKind::ERROR
    }

    /// Scan ahead for a top-level `=` before the statement ends. This is how
    /// an `IDENT`-started statement is split into assignment vs call: the
    /// target of an assignment contains no keyword, so any keyword before the
    /// `=` rules it out.
    fn assignment_ahead(&self) -> bool {
        let mut depth = 0u32;
        let mut idx = self.pos;
        while idx < self.tokens.len() {
            let kind = self.tokens[idx].kind;
            match kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET => depth = depth.saturating_sub(1),
                SyntaxKind::EQ if depth == 0 => return true,
                SyntaxKind::SEMICOLON => return false,
                k if k.is_keyword() => return false,
                _ => {}
            }
            idx += 1;
        }
        false
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump_any(&mut self) {
        self.bump();
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {kind:?}"));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump_any();
            consumed = true;
        }
        // If we didn't consume anything and we're not at EOF, consume one token
        // to prevent infinite loops
        if !consumed && !self.at_eof() {
            self.bump_any();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = (Annotation | VarDecl | Procedure | Function | Statement)*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            match self.current_kind() {
                SyntaxKind::AMP => self.parse_annotation(),
                SyntaxKind::VAR_KW => self.parse_var_decl(),
                SyntaxKind::PROCEDURE_KW | SyntaxKind::FUNCTION_KW => self.parse_method(),
                // A module may end with a statement body
                _ => self.parse_statement(),
            }
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump_any();
            }
        }

        self.finish_node();
    }

    /// Annotation = '&' Name ArgList?
    fn parse_annotation(&mut self) {
        self.start_node(SyntaxKind::ANNOTATION);

        self.expect(SyntaxKind::AMP);
        if self.at(SyntaxKind::IDENT) {
            self.bump();
        } else {
            self.error("expected annotation name");
        }
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_arg_list();
        }

        self.finish_node();
    }

    /// VarDecl = 'Перем' Name (',' Name)* 'Экспорт'? ';'?
    fn parse_var_decl(&mut self) {
        self.start_node(SyntaxKind::VAR_DECL);

        self.expect(SyntaxKind::VAR_KW);
        self.skip_trivia();
        loop {
            if self.at(SyntaxKind::IDENT) {
                self.bump();
            } else {
                self.error("expected variable name");
                break;
            }
            self.skip_trivia();
            if self.eat(SyntaxKind::COMMA) {
                self.skip_trivia();
            } else {
                break;
            }
        }
        self.eat(SyntaxKind::EXPORT_KW);
        self.skip_trivia();
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// Procedure = 'Процедура' Name ParamList 'Экспорт'? Block 'КонецПроцедуры'
    /// Function likewise with its own end keyword.
    fn parse_method(&mut self) {
        let is_function = self.at(SyntaxKind::FUNCTION_KW);
        self.start_node(if is_function {
            SyntaxKind::FUNCTION
        } else {
            SyntaxKind::PROCEDURE
        });

        self.bump(); // Процедура / Функция
        self.skip_trivia();
        if self.at(SyntaxKind::IDENT) {
            self.bump();
        } else {
            self.error("expected method name");
        }
        self.skip_trivia();
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_param_list();
        } else {
            self.error("expected parameter list");
        }
        self.skip_trivia();
        self.eat(SyntaxKind::EXPORT_KW);

        self.parse_block(&[]);

        if is_function {
            self.expect(SyntaxKind::END_FUNCTION_KW);
        } else {
            self.expect(SyntaxKind::END_PROCEDURE_KW);
        }

        self.finish_node();
    }

    /// ParamList = '(' (Param (',' Param)*)? ')'
    fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);

        self.expect(SyntaxKind::L_PAREN);
        self.skip_trivia();
        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
            self.parse_param();
            self.skip_trivia();
            if self.eat(SyntaxKind::COMMA) {
                self.skip_trivia();
            } else {
                break;
            }
        }
        self.expect(SyntaxKind::R_PAREN);

        self.finish_node();
    }

    /// Param = 'Знач'? Name ('=' Literal)?
    fn parse_param(&mut self) {
        self.start_node(SyntaxKind::PARAM);

        if self.eat(SyntaxKind::VAL_KW) {
            self.skip_trivia();
        }
        if self.at(SyntaxKind::IDENT) {
            self.bump();
        } else {
            self.error("expected parameter name");
        }
        self.skip_trivia();
        if self.eat(SyntaxKind::EQ) {
            self.skip_trivia();
            self.parse_default_value();
        }

        self.finish_node();
    }

    /// Default values are literals, optionally signed.
    fn parse_default_value(&mut self) {
        self.start_node(SyntaxKind::LITERAL);
        if self.at(SyntaxKind::MINUS) || self.at(SyntaxKind::PLUS) {
            self.bump();
            self.skip_trivia();
        }
        if self.current_kind().is_literal() {
            self.bump();
        } else {
            self.error("expected literal default value");
        }
        self.finish_node();
    }

    /// Block = Statement*
    ///
    /// Stops at any of `terminators`, at a method boundary, or at EOF. The
    /// terminating token is left for the caller.
    fn parse_block(&mut self, terminators: &[SyntaxKind]) {
        self.start_node(SyntaxKind::BLOCK);

        loop {
            let pos_before = self.pos;
            self.skip_trivia();
            if self.at_eof() || self.at_any(terminators) || self.at_any(HARD_BLOCK_ENDS) {
                break;
            }
            self.parse_statement();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump_any();
            }
        }

        self.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::SEMICOLON => self.bump(), // stray separator
            SyntaxKind::AMP => self.parse_annotation(),
            SyntaxKind::VAR_KW => self.parse_var_decl(),
            SyntaxKind::IF_KW => self.parse_if_statement(),
            SyntaxKind::WHILE_KW => self.parse_while_statement(),
            SyntaxKind::FOR_KW => {
                if self.nth(1) == SyntaxKind::EACH_KW {
                    self.parse_for_each_statement();
                } else {
                    self.parse_for_statement();
                }
            }
            SyntaxKind::RETURN_KW => self.parse_return_statement(),
            SyntaxKind::TRY_KW => self.parse_try_statement(),
            SyntaxKind::RAISE_KW => self.parse_raise_statement(),
            SyntaxKind::BREAK_KW => self.parse_jump_statement(SyntaxKind::BREAK_STATEMENT),
            SyntaxKind::CONTINUE_KW => self.parse_jump_statement(SyntaxKind::CONTINUE_STATEMENT),
            SyntaxKind::IDENT => {
                if self.assignment_ahead() {
                    self.parse_assignment();
                } else {
                    self.parse_call_statement();
                }
            }
            _ => {
                self.error_recover(
                    format!("expected statement, found {:?}", self.current_kind()),
                    STMT_RECOVERY,
                );
            }
        }
    }

    /// Assignment = PostfixTarget '=' Expression ';'?
    fn parse_assignment(&mut self) {
        self.start_node(SyntaxKind::ASSIGNMENT);

        self.parse_postfix_operand();
        self.skip_trivia();
        self.expect(SyntaxKind::EQ);
        self.skip_trivia();
        self.parse_expression();
        self.skip_trivia();
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// CallStatement = PostfixChain ';'?
    fn parse_call_statement(&mut self) {
        self.start_node(SyntaxKind::CALL_STATEMENT);

        self.parse_postfix_operand();
        self.skip_trivia();
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// If = 'Если' Expr 'Тогда' Block ElsifBranch* ElseBranch? 'КонецЕсли' ';'?
    fn parse_if_statement(&mut self) {
        self.start_node(SyntaxKind::IF_STATEMENT);

        self.expect(SyntaxKind::IF_KW);
        self.skip_trivia();
        self.parse_expression();
        self.skip_trivia();
        self.expect(SyntaxKind::THEN_KW);

        let ends = &[
            SyntaxKind::ELSIF_KW,
            SyntaxKind::ELSE_KW,
            SyntaxKind::END_IF_KW,
        ];
        self.parse_block(ends);

        while self.at(SyntaxKind::ELSIF_KW) {
            self.start_node(SyntaxKind::ELSIF_BRANCH);
            self.bump();
            self.skip_trivia();
            self.parse_expression();
            self.skip_trivia();
            self.expect(SyntaxKind::THEN_KW);
            self.parse_block(ends);
            self.finish_node();
        }

        if self.at(SyntaxKind::ELSE_KW) {
            self.start_node(SyntaxKind::ELSE_BRANCH);
            self.bump();
            self.parse_block(&[SyntaxKind::END_IF_KW]);
            self.finish_node();
        }

        self.expect(SyntaxKind::END_IF_KW);
        self.skip_trivia();
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// While = 'Пока' Expr 'Цикл' Block 'КонецЦикла' ';'?
    fn parse_while_statement(&mut self) {
        self.start_node(SyntaxKind::WHILE_STATEMENT);

        self.expect(SyntaxKind::WHILE_KW);
        self.skip_trivia();
        self.parse_expression();
        self.skip_trivia();
        self.expect(SyntaxKind::DO_KW);
        self.parse_block(&[SyntaxKind::END_DO_KW]);
        self.expect(SyntaxKind::END_DO_KW);
        self.skip_trivia();
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// For = 'Для' Name '=' Expr 'По' Expr 'Цикл' Block 'КонецЦикла' ';'?
    fn parse_for_statement(&mut self) {
        self.start_node(SyntaxKind::FOR_STATEMENT);

        self.expect(SyntaxKind::FOR_KW);
        self.skip_trivia();
        self.parse_loop_variable();
        self.skip_trivia();
        self.expect(SyntaxKind::EQ);
        self.skip_trivia();
        self.parse_expression();
        self.skip_trivia();
        self.expect(SyntaxKind::TO_KW);
        self.skip_trivia();
        self.parse_expression();
        self.skip_trivia();
        self.expect(SyntaxKind::DO_KW);
        self.parse_block(&[SyntaxKind::END_DO_KW]);
        self.expect(SyntaxKind::END_DO_KW);
        self.skip_trivia();
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// ForEach = 'Для' 'Каждого' Name 'Из' Expr 'Цикл' Block 'КонецЦикла' ';'?
    fn parse_for_each_statement(&mut self) {
        self.start_node(SyntaxKind::FOR_EACH_STATEMENT);

        self.expect(SyntaxKind::FOR_KW);
        self.skip_trivia();
        self.expect(SyntaxKind::EACH_KW);
        self.skip_trivia();
        self.parse_loop_variable();
        self.skip_trivia();
        self.expect(SyntaxKind::IN_KW);
        self.skip_trivia();
        self.parse_expression();
        self.skip_trivia();
        self.expect(SyntaxKind::DO_KW);
        self.parse_block(&[SyntaxKind::END_DO_KW]);
        self.expect(SyntaxKind::END_DO_KW);
        self.skip_trivia();
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// The loop variable is a declaration site, wrapped so the analyzer can
    /// find it as a direct child of the loop node.
    fn parse_loop_variable(&mut self) {
        self.start_node(SyntaxKind::NAME_REF);
        if self.at(SyntaxKind::IDENT) {
            self.bump();
        } else {
            self.error("expected loop variable");
        }
        self.finish_node();
    }

    /// Return = 'Возврат' Expr? ';'?
    fn parse_return_statement(&mut self) {
        self.start_node(SyntaxKind::RETURN_STATEMENT);

        self.expect(SyntaxKind::RETURN_KW);
        self.skip_trivia();
        if !self.at(SyntaxKind::SEMICOLON)
            && !self.at_any(HARD_BLOCK_ENDS)
            && !self.at_any(&[
                SyntaxKind::ELSIF_KW,
                SyntaxKind::ELSE_KW,
                SyntaxKind::END_IF_KW,
                SyntaxKind::END_DO_KW,
                SyntaxKind::EXCEPT_KW,
                SyntaxKind::END_TRY_KW,
            ])
            && !self.at_eof()
        {
            self.parse_expression();
            self.skip_trivia();
        }
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// Try = 'Попытка' Block 'Исключение' Block 'КонецПопытки' ';'?
    fn parse_try_statement(&mut self) {
        self.start_node(SyntaxKind::TRY_STATEMENT);

        self.expect(SyntaxKind::TRY_KW);
        self.parse_block(&[SyntaxKind::EXCEPT_KW, SyntaxKind::END_TRY_KW]);
        self.expect(SyntaxKind::EXCEPT_KW);
        self.parse_block(&[SyntaxKind::END_TRY_KW]);
        self.expect(SyntaxKind::END_TRY_KW);
        self.skip_trivia();
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// Raise = 'ВызватьИсключение' Expr? ';'?
    fn parse_raise_statement(&mut self) {
        self.start_node(SyntaxKind::RAISE_STATEMENT);

        self.expect(SyntaxKind::RAISE_KW);
        self.skip_trivia();
        if !self.at(SyntaxKind::SEMICOLON) && !self.at_any(HARD_BLOCK_ENDS) && !self.at_eof() {
            self.parse_expression();
            self.skip_trivia();
        }
        self.eat(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    fn parse_jump_statement(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump(); // Прервать / Продолжить
        self.skip_trivia();
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Expression parsing with proper precedence. Operators stay flat inside
    /// one EXPRESSION node; operands get their own nodes.
    fn parse_expression(&mut self) {
        self.start_node(SyntaxKind::EXPRESSION);
        self.parse_or_expr();
        self.finish_node();
    }

    /// OrExpr = AndExpr ('Или' AndExpr)*
    fn parse_or_expr(&mut self) {
        self.parse_and_expr();

        while self.at(SyntaxKind::OR_KW) {
            self.bump();
            self.skip_trivia();
            self.parse_and_expr();
        }
    }

    /// AndExpr = NotExpr ('И' NotExpr)*
    fn parse_and_expr(&mut self) {
        self.parse_not_expr();

        while self.at(SyntaxKind::AND_KW) {
            self.bump();
            self.skip_trivia();
            self.parse_not_expr();
        }
    }

    /// NotExpr = 'Не' NotExpr | Comparison
    fn parse_not_expr(&mut self) {
        if self.at(SyntaxKind::NOT_KW) {
            self.bump();
            self.skip_trivia();
            self.parse_not_expr();
        } else {
            self.parse_comparison();
        }
    }

    /// Comparison = Additive (('=' | '<>' | '<' | '>' | '<=' | '>=') Additive)*
    fn parse_comparison(&mut self) {
        self.parse_additive();

        while self.at_any(&[
            SyntaxKind::EQ,
            SyntaxKind::LT_GT,
            SyntaxKind::LT,
            SyntaxKind::GT,
            SyntaxKind::LT_EQ,
            SyntaxKind::GT_EQ,
        ]) {
            self.bump();
            self.skip_trivia();
            self.parse_additive();
        }
    }

    /// Additive = Multiplicative (('+' | '-') Multiplicative)*
    fn parse_additive(&mut self) {
        self.parse_multiplicative();

        while self.at(SyntaxKind::PLUS) || self.at(SyntaxKind::MINUS) {
            self.bump();
            self.skip_trivia();
            self.parse_multiplicative();
        }
    }

    /// Multiplicative = Unary (('*' | '/' | '%') Unary)*
    fn parse_multiplicative(&mut self) {
        self.parse_unary();

        while self.at_any(&[SyntaxKind::STAR, SyntaxKind::SLASH, SyntaxKind::PERCENT]) {
            self.bump();
            self.skip_trivia();
            self.parse_unary();
        }
    }

    /// Unary = ('+' | '-')? Postfix
    fn parse_unary(&mut self) {
        if self.at(SyntaxKind::PLUS) || self.at(SyntaxKind::MINUS) {
            self.bump();
            self.skip_trivia();
        }
        self.parse_postfix_operand();
        // Consume trailing trivia here so the operator loops above see real
        // tokens
        self.skip_trivia();
    }

    /// Postfix operand: a literal, constructor, parenthesized or ternary
    /// expression, name reference, call, or member/index chain.
    fn parse_postfix_operand(&mut self) {
        match self.current_kind() {
            kind if kind.is_literal() => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
            }

            SyntaxKind::NEW_KW => self.parse_new_expr(),

            SyntaxKind::QUESTION => self.parse_ternary_expr(),

            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                self.skip_trivia();
                self.parse_expression();
                self.skip_trivia();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
                // `(Выражение).Метод()` continues flat in the parent
                self.parse_chain_segments();
            }

            SyntaxKind::IDENT => match self.nth(1) {
                SyntaxKind::L_PAREN => {
                    self.start_node(SyntaxKind::CALL_EXPR);
                    self.bump();
                    self.skip_trivia();
                    self.parse_arg_list();
                    self.finish_node();
                    // `Получить(Ключ).Значение` continues flat in the parent
                    self.parse_chain_segments();
                }
                SyntaxKind::DOT | SyntaxKind::L_BRACKET => {
                    self.start_node(SyntaxKind::MEMBER_EXPR);
                    self.bump();
                    self.parse_chain_segments();
                    self.finish_node();
                }
                _ => {
                    self.start_node(SyntaxKind::NAME_REF);
                    self.bump();
                    self.finish_node();
                }
            },

            _ => {
                self.error(format!(
                    "expected expression, found {:?}",
                    self.current_kind()
                ));
            }
        }
    }

    /// Chain = ('.' Name ArgList? | '[' Expression ']')*
    fn parse_chain_segments(&mut self) {
        loop {
            if self.current_kind().is_trivia()
                && matches!(self.nth(0), SyntaxKind::DOT | SyntaxKind::L_BRACKET)
            {
                self.skip_trivia();
            }
            match self.current_kind() {
                SyntaxKind::DOT => {
                    self.bump();
                    self.skip_trivia();
                    if self.at(SyntaxKind::IDENT) {
                        self.bump();
                    } else {
                        self.error("expected member name");
                        break;
                    }
                    if self.current_kind().is_trivia() && self.nth(0) == SyntaxKind::L_PAREN {
                        self.skip_trivia();
                    }
                    if self.at(SyntaxKind::L_PAREN) {
                        self.parse_arg_list();
                    }
                }
                SyntaxKind::L_BRACKET => {
                    self.bump();
                    self.skip_trivia();
                    self.parse_expression();
                    self.skip_trivia();
                    self.expect(SyntaxKind::R_BRACKET);
                }
                _ => break,
            }
        }
    }

    /// NewExpr = 'Новый' Name ArgList? | 'Новый' ArgList
    fn parse_new_expr(&mut self) {
        self.start_node(SyntaxKind::NEW_EXPR);

        self.expect(SyntaxKind::NEW_KW);
        self.skip_trivia();
        if self.at(SyntaxKind::IDENT) {
            self.bump();
            if self.current_kind().is_trivia() && self.nth(0) == SyntaxKind::L_PAREN {
                self.skip_trivia();
            }
            if self.at(SyntaxKind::L_PAREN) {
                self.parse_arg_list();
            }
        } else if self.at(SyntaxKind::L_PAREN) {
            self.parse_arg_list();
        } else {
            self.error("expected type name after constructor keyword");
        }

        self.finish_node();
    }

    /// TernaryExpr = '?' '(' Expression ',' Expression ',' Expression ')'
    fn parse_ternary_expr(&mut self) {
        self.start_node(SyntaxKind::TERNARY_EXPR);

        self.expect(SyntaxKind::QUESTION);
        self.skip_trivia();
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_arg_list();
        } else {
            self.error("expected '(' after '?'");
        }

        self.finish_node();
    }

    /// ArgList = '(' (Expression? (',' Expression?)*)? ')'
    ///
    /// Arguments may be omitted (`Сообщить(, Статус)`).
    fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ARG_LIST);

        self.expect(SyntaxKind::L_PAREN);
        self.skip_trivia();
        if !self.at(SyntaxKind::R_PAREN) && !self.at_eof() {
            if !self.at(SyntaxKind::COMMA) {
                self.parse_expression();
                self.skip_trivia();
            }
            while self.at(SyntaxKind::COMMA) {
                self.bump();
                self.skip_trivia();
                if self.at(SyntaxKind::R_PAREN) || self.at(SyntaxKind::COMMA) || self.at_eof() {
                    continue;
                }
                self.parse_expression();
                self.skip_trivia();
            }
        }
        self.expect(SyntaxKind::R_PAREN);

        self.finish_node();
    }
}
