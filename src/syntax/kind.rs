//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! for BSL modules (`.bsl`) and OneScript files (`.os`).

/// All syntax kinds (tokens and nodes) in BSL
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (methods, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    /// A whole `#...` preprocessor line (`#Область`, `#Если Сервер Тогда`, …).
    /// The semantic layer never looks inside these, so they ride along as
    /// trivia.
    PREPROC,

    // =========================================================================
    // LITERALS AND NAMES
    // =========================================================================
    IDENT,  // Сумма, Amount
    NUMBER, // 42, 3.14
    STRING, // "текст", multiline with | continuations
    DATE,   // '20240101'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,   // (
    R_PAREN,   // )
    L_BRACKET, // [
    R_BRACKET, // ]
    DOT,       // .
    COMMA,     // ,
    SEMICOLON, // ;
    PLUS,      // +
    MINUS,     // -
    STAR,      // *
    SLASH,     // /
    PERCENT,   // %
    EQ,        // =  (assignment and comparison)
    LT_GT,     // <>
    LT_EQ,     // <=
    GT_EQ,     // >=
    LT,        // <
    GT,        // >
    QUESTION,  // ?  (ternary ?(c, a, b))
    AMP,       // &  (annotations)

    // =========================================================================
    // KEYWORDS (dual-language, classified case-insensitively after lexing)
    // =========================================================================
    PROCEDURE_KW,     // Процедура / Procedure
    END_PROCEDURE_KW, // КонецПроцедуры / EndProcedure
    FUNCTION_KW,      // Функция / Function
    END_FUNCTION_KW,  // КонецФункции / EndFunction
    VAR_KW,           // Перем / Var
    EXPORT_KW,        // Экспорт / Export
    VAL_KW,           // Знач / Val
    IF_KW,            // Если / If
    THEN_KW,          // Тогда / Then
    ELSIF_KW,         // ИначеЕсли / ElsIf
    ELSE_KW,          // Иначе / Else
    END_IF_KW,        // КонецЕсли / EndIf
    FOR_KW,           // Для / For
    EACH_KW,          // Каждого / Each
    IN_KW,            // Из / In
    TO_KW,            // По / To
    WHILE_KW,         // Пока / While
    DO_KW,            // Цикл / Do
    END_DO_KW,        // КонецЦикла / EndDo
    RETURN_KW,        // Возврат / Return
    BREAK_KW,         // Прервать / Break
    CONTINUE_KW,      // Продолжить / Continue
    TRY_KW,           // Попытка / Try
    EXCEPT_KW,        // Исключение / Except
    END_TRY_KW,       // КонецПопытки / EndTry
    RAISE_KW,         // ВызватьИсключение / Raise
    NEW_KW,           // Новый / New
    NOT_KW,           // Не / Not
    AND_KW,           // И / And
    OR_KW,            // Или / Or
    TRUE_KW,          // Истина / True
    FALSE_KW,         // Ложь / False
    UNDEFINED_KW,     // Неопределено / Undefined
    NULL_KW,          // Null

    // =========================================================================
    // COMPOSITE NODES (non-terminals in the grammar)
    // =========================================================================
    // Root
    SOURCE_FILE,

    // Declarations
    ANNOTATION, // &НаСервере, &Перед("Записать")
    VAR_DECL,   // Перем А, Б Экспорт;
    PROCEDURE,
    FUNCTION,
    PARAM_LIST,
    PARAM,

    // Statements
    BLOCK,
    ASSIGNMENT,
    CALL_STATEMENT,
    IF_STATEMENT,
    ELSIF_BRANCH,
    ELSE_BRANCH,
    WHILE_STATEMENT,
    FOR_STATEMENT,
    FOR_EACH_STATEMENT,
    RETURN_STATEMENT,
    TRY_STATEMENT,
    RAISE_STATEMENT,
    BREAK_STATEMENT,
    CONTINUE_STATEMENT,

    // Expressions
    EXPRESSION,
    PAREN_EXPR,
    NEW_EXPR,     // Новый Массив(10), Новый("Массив")
    CALL_EXPR,    // Сложить(А, Б)
    MEMBER_EXPR,  // Модуль.Метод(...), Объект.Поле, Массив[0]
    NAME_REF,     // bare identifier use
    LITERAL,
    TERNARY_EXPR, // ?(Условие, Да, Нет)
    ARG_LIST,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, comment, preprocessor line)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::PREPROC)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::PROCEDURE_KW as u16) && (self as u16) <= (Self::NULL_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_PAREN as u16) && (self as u16) <= (Self::AMP as u16)
    }

    /// Check if this is a literal token
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::NUMBER
                | Self::STRING
                | Self::DATE
                | Self::TRUE_KW
                | Self::FALSE_KW
                | Self::UNDEFINED_KW
                | Self::NULL_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BslLanguage {}

impl rowan::Language for BslLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<BslLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<BslLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<BslLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<BslLanguage>;
