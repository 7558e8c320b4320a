//! Logos-based lexer for BASIC
//!
//! The lexer is restartable: every call lexes exactly one token from an
//! explicit [`LexState`] (byte offset, mode and point) and hands back the
//! state after it. Re-lexing from an arbitrary token boundary is just
//! building that state by hand.

use std::borrow::Cow;

use logos::Logos;
use text_size::{TextRange, TextSize};

use super::keywords::{self, CasePolicy};
use super::syntax_kind::SyntaxKind;
use crate::base::Point;

/// Lexer mode; keywords switch it for the rest of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LexMode {
    #[default]
    Normal,
    /// After `REM`: the rest of the line is a single text token
    Remark,
    /// After `DATA`: unquoted literals separated by commas
    Data,
}

impl LexMode {
    /// Mode in effect after a token of `kind` lexed in `self`.
    pub fn after(self, kind: SyntaxKind) -> LexMode {
        match (self, kind) {
            (LexMode::Normal, SyntaxKind::REM_KW) => LexMode::Remark,
            (LexMode::Normal, SyntaxKind::DATA_KW) => LexMode::Data,
            (LexMode::Remark, SyntaxKind::NEWLINE) => LexMode::Normal,
            (LexMode::Data, SyntaxKind::NEWLINE | SyntaxKind::COLON) => LexMode::Normal,
            (mode, _) => mode,
        }
    }
}

/// Everything needed to resume lexing at a token boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexState {
    pub offset: TextSize,
    pub mode: LexMode,
    pub point: Point,
}

impl LexState {
    pub fn new(offset: TextSize, mode: LexMode, point: Point) -> Self {
        Self { offset, mode, point }
    }
}

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a [u8],
    pub range: TextRange,
    pub start: Point,
    /// Mode the token was lexed in
    pub mode: LexMode,
    /// Set for unrecognised input and malformed literals
    pub is_error: bool,
}

impl Token<'_> {
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.text)
    }
}

/// Lex one token starting at `state`.
///
/// Returns `None` at end of input. Every returned token is at least one byte
/// long, so repeated calls always make progress.
pub fn lex_token<'a>(
    src: &'a [u8],
    state: LexState,
    policy: CasePolicy,
) -> Option<(Token<'a>, LexState)> {
    let start = u32::from(state.offset) as usize;
    let rest = src.get(start..).filter(|rest| !rest.is_empty())?;

    let (kind, len, is_error) = match state.mode {
        LexMode::Normal => lex_normal(rest, policy),
        LexMode::Remark => lex_remark(rest),
        LexMode::Data => lex_data(rest),
    };
    let len = len.clamp(1, rest.len());
    let text = &rest[..len];

    let range = TextRange::at(state.offset, TextSize::new(len as u32));
    let token = Token {
        kind,
        text,
        range,
        start: state.point,
        mode: state.mode,
        is_error,
    };
    let next = LexState {
        offset: range.end(),
        mode: state.mode.after(kind),
        point: state.point.advance(text),
    };
    Some((token, next))
}

/// Length of the unrecognised input at the front of `rest`: one whole
/// character when it decodes, otherwise the run of invalid bytes.
fn error_len(rest: &[u8]) -> usize {
    match rest.utf8_chunks().next() {
        Some(chunk) => match chunk.valid().chars().next() {
            Some(c) => c.len_utf8(),
            None => chunk.invalid().len().max(1),
        },
        None => 1,
    }
}

fn lex_normal(rest: &[u8], policy: CasePolicy) -> (SyntaxKind, usize, bool) {
    let mut lex = NormalToken::lexer(rest);
    let result = lex.next();
    let span = lex.span();
    if span.start > 0 {
        return (SyntaxKind::ERROR, span.start, true);
    }
    match result {
        Some(Ok(NormalToken::Ident)) => {
            // Identifiers are ASCII by construction
            let text = std::str::from_utf8(lex.slice()).unwrap_or_default();
            let kind = keywords::lookup(text, policy).unwrap_or(SyntaxKind::IDENT);
            (kind, span.end, false)
        }
        Some(Ok(NormalToken::UnterminatedString)) => (SyntaxKind::STRING, span.end, true),
        Some(Ok(token)) => (token.into(), span.end, false),
        Some(Err(())) | None => (SyntaxKind::ERROR, error_len(rest), true),
    }
}

fn lex_remark(rest: &[u8]) -> (SyntaxKind, usize, bool) {
    let mut lex = RemarkToken::lexer(rest);
    let result = lex.next();
    let span = lex.span();
    match result {
        Some(Ok(RemarkToken::Whitespace)) if span.start == 0 => {
            (SyntaxKind::WHITESPACE, span.end, false)
        }
        Some(Ok(RemarkToken::Newline)) if span.start == 0 => (SyntaxKind::NEWLINE, span.end, false),
        Some(Ok(RemarkToken::Text)) if span.start == 0 => (SyntaxKind::REM_TEXT, span.end, false),
        _ => (SyntaxKind::ERROR, error_len(rest), true),
    }
}

fn lex_data(rest: &[u8]) -> (SyntaxKind, usize, bool) {
    let mut lex = DataToken::lexer(rest);
    let result = lex.next();
    let span = lex.span();
    if span.start > 0 {
        return (SyntaxKind::ERROR, span.start, true);
    }
    match result {
        Some(Ok(DataToken::Whitespace)) => (SyntaxKind::WHITESPACE, span.end, false),
        Some(Ok(DataToken::Newline)) => (SyntaxKind::NEWLINE, span.end, false),
        Some(Ok(DataToken::Comma)) => (SyntaxKind::COMMA, span.end, false),
        Some(Ok(DataToken::Colon)) => (SyntaxKind::COLON, span.end, false),
        Some(Ok(DataToken::String)) => (SyntaxKind::STRING, span.end, false),
        Some(Ok(DataToken::UnterminatedString)) => (SyntaxKind::STRING, span.end, true),
        Some(Ok(DataToken::Number)) => (SyntaxKind::NUMBER, span.end, false),
        Some(Ok(DataToken::Item)) => (SyntaxKind::DATA_ITEM, span.end, false),
        Some(Err(())) | None => (SyntaxKind::ERROR, error_len(rest), true),
    }
}

/// Lexer over a whole buffer
pub struct Lexer<'a> {
    src: &'a [u8],
    state: LexState,
    policy: CasePolicy,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a (impl AsRef<[u8]> + ?Sized)) -> Self {
        Self::with_state(input.as_ref(), LexState::default(), CasePolicy::default())
    }

    /// Resume lexing `src` from a known token boundary.
    pub fn with_state(src: &'a [u8], state: LexState, policy: CasePolicy) -> Self {
        Self { src, state, policy }
    }

    /// State the next token will be lexed from
    pub fn state(&self) -> LexState {
        self.state
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (token, next) = lex_token(self.src, self.state, self.policy)?;
        self.state = next;
        Some(token)
    }
}

/// Tokenize an entire input into a Vec
pub fn tokenize(input: &(impl AsRef<[u8]> + ?Sized)) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Tokens in normal mode
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(source = [u8])]
enum NormalToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    #[regex(r"'[^\r\n]*")]
    Comment,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""[^"\r\n]*""#)]
    String,

    #[regex(r#""[^"\r\n]*"#)]
    UnterminatedString,

    #[regex(r"[A-Za-z][A-Za-z0-9_]*[$%!#]?")]
    Ident,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("<>")]
    Neq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

impl From<NormalToken> for SyntaxKind {
    fn from(token: NormalToken) -> Self {
        use NormalToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            Comment => SyntaxKind::COMMENT,
            Newline => SyntaxKind::NEWLINE,
            Number => SyntaxKind::NUMBER,
            String | UnterminatedString => SyntaxKind::STRING,
            Ident => SyntaxKind::IDENT,
            Neq => SyntaxKind::NEQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            Comma => SyntaxKind::COMMA,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Caret => SyntaxKind::CARET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
        }
    }
}

/// Tokens after `REM`
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(source = [u8])]
enum RemarkToken {
    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[regex(r"[^ \t\x0C\r\n][^\r\n]*")]
    Text,
}

/// Tokens after `DATA`
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(source = [u8])]
enum DataToken {
    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[regex(r#""[^"\r\n]*""#)]
    String,

    #[regex(r#""[^"\r\n]*"#)]
    UnterminatedString,

    #[regex(r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", priority = 10)]
    Number,

    #[regex(r#"[^,:"\r\n \t\x0C]([^,:\r\n]*[^,:\r\n \t\x0C])?"#)]
    Item,
}
