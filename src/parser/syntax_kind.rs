//! Syntax kinds for the BASIC syntax tree
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! Terminals come first and are contiguous up to [`SyntaxKind::EOF`], so a
//! terminal's discriminant doubles as its column in the parse tables.

/// All syntax kinds (tokens and nodes) in BASIC
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (lines, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    COMMENT,            // ' to end of line

    // =========================================================================
    // STATEMENT BOUNDARY
    // =========================================================================
    NEWLINE,

    // =========================================================================
    // LITERALS
    // =========================================================================
    NUMBER,             // 10, 3.14
    STRING,             // "hello"
    IDENT,              // A, NAME$
    REM_TEXT,           // text after REM
    DATA_ITEM,          // unquoted DATA literal
    BUILTIN_FN,         // ABS, LEFT$, ...

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    COMMA,              // ,
    SEMICOLON,          // ;
    COLON,              // :
    EQ,                 // =
    NEQ,                // <>
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    PLUS,               // +
    MINUS,              // -
    STAR,               // *
    SLASH,              // /
    CARET,              // ^
    L_PAREN,            // (
    R_PAREN,            // )

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    PRINT_KW,
    LET_KW,
    IF_KW,
    THEN_KW,
    ELSE_KW,
    GOTO_KW,
    GOSUB_KW,
    RETURN_KW,
    FOR_KW,
    TO_KW,
    STEP_KW,
    NEXT_KW,
    INPUT_KW,
    END_KW,
    STOP_KW,
    REM_KW,
    DATA_KW,
    READ_KW,
    RESTORE_KW,
    DIM_KW,
    ON_KW,
    AND_KW,
    OR_KW,
    NOT_KW,
    MOD_KW,

    // =========================================================================
    // SPECIAL TOKENS
    // =========================================================================
    ERROR,              // unrecognised input; also the kind of error nodes
    EOF,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    LINE_STATEMENT,

    PRINT_STATEMENT,
    LET_STATEMENT,
    IF_STATEMENT,
    GOTO_STATEMENT,
    GOSUB_STATEMENT,
    ON_STATEMENT,
    RETURN_STATEMENT,
    FOR_STATEMENT,
    NEXT_STATEMENT,
    INPUT_STATEMENT,
    END_STATEMENT,
    STOP_STATEMENT,
    REM_STATEMENT,
    DATA_STATEMENT,
    READ_STATEMENT,
    RESTORE_STATEMENT,
    DIM_STATEMENT,
    ARRAY_DECLARATION,

    BINARY_EXPRESSION,
    UNARY_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
    FUNCTION_CALL,
    ARRAY_ACCESS,

    #[doc(hidden)]
    __LAST,
}

/// Number of terminal kinds, `EOF` included.
pub const TERMINAL_COUNT: usize = SyntaxKind::EOF as usize + 1;

/// Number of kinds, terminals and nodes.
pub const KIND_COUNT: usize = SyntaxKind::__LAST as usize;

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::COMMENT)
    }

    /// Check if this kind is a terminal (token) kind
    pub fn is_terminal(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::PRINT_KW as u16) && (self as u16) <= (Self::MOD_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::COMMA as u16) && (self as u16) <= (Self::R_PAREN as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::NUMBER | Self::STRING | Self::IDENT | Self::REM_TEXT | Self::DATA_ITEM
        )
    }

    /// Named kinds show up in S-expressions; keywords and punctuation don't.
    pub fn is_named(self) -> bool {
        !self.is_terminal()
            || self.is_literal()
            || matches!(self, Self::BUILTIN_FN | Self::COMMENT | Self::ERROR)
    }

    /// Statement kinds, i.e. the things a line is made of
    pub fn is_statement(self) -> bool {
        (self as u16) >= (Self::PRINT_STATEMENT as u16)
            && (self as u16) <= (Self::DIM_STATEMENT as u16)
    }

    /// Convert a raw symbol id back into a kind.
    pub fn from_raw(raw: u16) -> Option<Self> {
        if raw < Self::__LAST as u16 {
            // Safety: `SyntaxKind` is `repr(u16)` with contiguous discriminants
            // starting at zero, and `raw` is below `__LAST`.
            Some(unsafe { std::mem::transmute::<u16, SyntaxKind>(raw) })
        } else {
            None
        }
    }

    /// Iterate over every kind in discriminant order.
    pub fn all() -> impl Iterator<Item = SyntaxKind> {
        (0..Self::__LAST as u16).filter_map(Self::from_raw)
    }

    /// Public symbol name, as used by host-side pattern matching
    pub fn name(self) -> &'static str {
        match self {
            Self::WHITESPACE => "whitespace",
            Self::COMMENT => "comment",
            Self::NEWLINE => "newline",
            Self::NUMBER => "number",
            Self::STRING => "string",
            Self::IDENT => "identifier",
            Self::REM_TEXT => "comment_text",
            Self::DATA_ITEM => "data_item",
            Self::BUILTIN_FN => "function_name",
            Self::COMMA => ",",
            Self::SEMICOLON => ";",
            Self::COLON => ":",
            Self::EQ => "=",
            Self::NEQ => "<>",
            Self::LT => "<",
            Self::GT => ">",
            Self::LT_EQ => "<=",
            Self::GT_EQ => ">=",
            Self::PLUS => "+",
            Self::MINUS => "-",
            Self::STAR => "*",
            Self::SLASH => "/",
            Self::CARET => "^",
            Self::L_PAREN => "(",
            Self::R_PAREN => ")",
            Self::PRINT_KW => "PRINT",
            Self::LET_KW => "LET",
            Self::IF_KW => "IF",
            Self::THEN_KW => "THEN",
            Self::ELSE_KW => "ELSE",
            Self::GOTO_KW => "GOTO",
            Self::GOSUB_KW => "GOSUB",
            Self::RETURN_KW => "RETURN",
            Self::FOR_KW => "FOR",
            Self::TO_KW => "TO",
            Self::STEP_KW => "STEP",
            Self::NEXT_KW => "NEXT",
            Self::INPUT_KW => "INPUT",
            Self::END_KW => "END",
            Self::STOP_KW => "STOP",
            Self::REM_KW => "REM",
            Self::DATA_KW => "DATA",
            Self::READ_KW => "READ",
            Self::RESTORE_KW => "RESTORE",
            Self::DIM_KW => "DIM",
            Self::ON_KW => "ON",
            Self::AND_KW => "AND",
            Self::OR_KW => "OR",
            Self::NOT_KW => "NOT",
            Self::MOD_KW => "MOD",
            Self::ERROR => "ERROR",
            Self::EOF => "end",
            Self::SOURCE_FILE => "source_file",
            Self::LINE_STATEMENT => "line_statement",
            Self::PRINT_STATEMENT => "print_statement",
            Self::LET_STATEMENT => "let_statement",
            Self::IF_STATEMENT => "if_statement",
            Self::GOTO_STATEMENT => "goto_statement",
            Self::GOSUB_STATEMENT => "gosub_statement",
            Self::ON_STATEMENT => "on_statement",
            Self::RETURN_STATEMENT => "return_statement",
            Self::FOR_STATEMENT => "for_statement",
            Self::NEXT_STATEMENT => "next_statement",
            Self::INPUT_STATEMENT => "input_statement",
            Self::END_STATEMENT => "end_statement",
            Self::STOP_STATEMENT => "stop_statement",
            Self::REM_STATEMENT => "rem_statement",
            Self::DATA_STATEMENT => "data_statement",
            Self::READ_STATEMENT => "read_statement",
            Self::RESTORE_STATEMENT => "restore_statement",
            Self::DIM_STATEMENT => "dim_statement",
            Self::ARRAY_DECLARATION => "array_declaration",
            Self::BINARY_EXPRESSION => "binary_expression",
            Self::UNARY_EXPRESSION => "unary_expression",
            Self::PARENTHESIZED_EXPRESSION => "parenthesized_expression",
            Self::FUNCTION_CALL => "function_call",
            Self::ARRAY_ACCESS => "array_access",
            Self::__LAST => "__last",
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        match SyntaxKind::from_raw(raw.0) {
            Some(kind) => kind,
            None => panic!("invalid raw syntax kind {}", raw.0),
        }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BasicLanguage {}

impl rowan::Language for BasicLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type RowanNode = rowan::SyntaxNode<BasicLanguage>;
pub type RowanToken = rowan::SyntaxToken<BasicLanguage>;
pub type RowanElement = rowan::SyntaxElement<BasicLanguage>;
