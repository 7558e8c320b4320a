//! Parser input: an in-memory buffer or a pull-based byte source
//!
//! Streaming input is buffered one line at a time. A token is lexed only
//! once the buffer holds a line terminator after it, or the source is
//! exhausted, so no token is ever cut at a chunk boundary.

use std::borrow::Cow;

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::keywords::CasePolicy;
use super::lexer::{LexMode, LexState, lex_token};
use super::syntax_kind::SyntaxKind;

/// A pull-based source of input bytes.
///
/// Any iterator over byte chunks is a source:
///
/// ```
/// use basic_syntax::parser::{Parser, TextSource};
/// use tokio_util::sync::CancellationToken;
///
/// let chunks = ["10 PRI", "NT 1\n20 E", "ND\n"].into_iter();
/// let tree = Parser::new().parse_source(chunks, &CancellationToken::new());
/// assert!(!tree.unwrap().has_error());
/// ```
pub trait TextSource {
    /// Append the next chunk to `buf`. Returns `false` once the source is
    /// exhausted; empty chunks are allowed.
    fn read_chunk(&mut self, buf: &mut Vec<u8>) -> bool;
}

impl<I> TextSource for I
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    fn read_chunk(&mut self, buf: &mut Vec<u8>) -> bool {
        match self.next() {
            Some(chunk) => {
                buf.extend_from_slice(chunk.as_ref());
                true
            }
            None => false,
        }
    }
}

/// A lexed token, detached from the input buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawToken {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub text: SmolStr,
    pub mode: LexMode,
    pub is_error: bool,
}

pub(crate) struct TokenStream<'s> {
    bytes: Cow<'s, [u8]>,
    source: Option<&'s mut dyn TextSource>,
    /// Index of the last line terminator known to be complete
    last_break: Option<usize>,
    policy: CasePolicy,
    state: LexState,
}

impl<'s> TokenStream<'s> {
    pub fn borrowed(bytes: &'s [u8], policy: CasePolicy) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
            source: None,
            last_break: None,
            policy,
            state: LexState::default(),
        }
    }

    pub fn streaming(source: &'s mut dyn TextSource, policy: CasePolicy) -> Self {
        Self {
            bytes: Cow::Owned(Vec::new()),
            source: Some(source),
            last_break: None,
            policy,
            state: LexState::default(),
        }
    }

    pub fn offset(&self) -> TextSize {
        self.state.offset
    }

    pub fn mode(&self) -> LexMode {
        self.state.mode
    }

    /// Lex the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<RawToken> {
        self.fill(u32::from(self.state.offset) as usize);
        let (token, next) = lex_token(&self.bytes, self.state, self.policy)?;
        let raw = RawToken {
            kind: token.kind,
            range: token.range,
            text: SmolStr::new(token.text_lossy()),
            mode: token.mode,
            is_error: token.is_error,
        };
        self.state = next;
        Some(raw)
    }

    /// Move past `len` bytes that a reused subtree already covers.
    pub fn skip(&mut self, len: TextSize, mode: LexMode) {
        let start = u32::from(self.state.offset) as usize;
        let end = start + u32::from(len) as usize;
        self.fill(end);
        let covered = self.bytes.get(start..end).unwrap_or_default();
        self.state = LexState::new(
            self.state.offset + len,
            mode,
            self.state.point.advance(covered),
        );
    }

    /// Pull chunks until a complete token can be lexed at `offset`.
    fn fill(&mut self, offset: usize) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        while self.last_break.is_none_or(|at| at < offset) {
            let buf = self.bytes.to_mut();
            let before = buf.len();
            if !source.read_chunk(buf) {
                self.source = None;
                return;
            }
            // A '\r' that ended the previous chunk may start a "\r\n".
            let len = buf.len();
            for i in before.saturating_sub(1)..len {
                match buf[i] {
                    b'\n' => self.last_break = Some(i),
                    b'\r' if i + 1 < len => self.last_break = Some(i),
                    _ => {}
                }
            }
        }
    }
}
