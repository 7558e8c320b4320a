//! Incremental GLR parser for line-numbered BASIC
//!
//! This module turns bytes into [`SyntaxTree`]s using:
//! - **logos** for the restartable lexer
//! - an LALR(1) table compiled from a declarative [`grammar`]
//! - a bounded GLR engine with error recovery, so every input parses
//!
//! ## Architecture
//!
//! ```text
//! Source bytes / TextSource
//!     ↓
//! Lexer (logos, LexMode) → tokens with SyntaxKind
//!     ↓
//! Engine (ParseTable, stack versions, recovery) ← ReuseIndex (old tree + edits)
//!     ↓
//! Arena → SyntaxTree (immutable, cheap to clone)
//!     ↓
//! rowan GreenNode export, diagnostics, changed ranges
//! ```
//!
//! ## Incremental Reparsing
//!
//! When text changes, we:
//! 1. Map the old tree's untouched nodes to their new positions
//! 2. Reparse the new text, shifting old subtrees whole wherever the parser
//!    reaches one in the state it was built in
//! 3. Keep the old arena underneath the new one, so reused nodes are shared

mod engine;
pub mod errors;
pub mod grammar;
mod input;
pub mod keywords;
mod language;
mod lexer;
mod options;
mod stack;
mod syntax_kind;

pub use errors::{ConfigError, ErrorCode, RelatedInfo, SyntaxError};
pub use input::TextSource;
pub use keywords::CasePolicy;
pub use language::{ABI_VERSION, Language, MIN_COMPATIBLE_ABI_VERSION};
pub use lexer::{LexMode, LexState, Lexer, Token, lex_token, tokenize};
pub use options::ParseOptions;
pub use syntax_kind::{
    BasicLanguage, KIND_COUNT, RowanElement, RowanNode, RowanToken, SyntaxKind, TERMINAL_COUNT,
};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};

use std::sync::Arc;

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::incremental::{InputEdit, ReuseIndex};
use crate::tree::{Arena, SyntaxTree};
use engine::Engine;
use input::TokenStream;

/// Parse `source` as BASIC with default options.
pub fn parse(source: impl AsRef<[u8]>) -> SyntaxTree {
    Parser::new().parse(source)
}

/// A configured parser; cheap to clone and shareable between threads
#[derive(Debug, Clone)]
pub struct Parser {
    language: Language,
    options: ParseOptions,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self::for_language(Language::basic(), options)
    }

    pub fn for_language(language: Language, options: ParseOptions) -> Self {
        Self { language, options }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a whole buffer. Never fails: malformed input ends up in ERROR
    /// and MISSING nodes.
    pub fn parse(&self, source: impl AsRef<[u8]>) -> SyntaxTree {
        let tokens = TokenStream::borrowed(source.as_ref(), self.options.case_policy);
        self.finish(tokens, Arena::new(), None, None)
    }

    /// Like [`parse`](Self::parse), giving up with `None` once `cancel` is
    /// cancelled.
    pub fn parse_cancellable(
        &self,
        source: impl AsRef<[u8]>,
        cancel: &CancellationToken,
    ) -> Option<SyntaxTree> {
        let tokens = TokenStream::borrowed(source.as_ref(), self.options.case_policy);
        self.run(tokens, Arena::new(), None, Some(cancel))
    }

    /// Parse input pulled chunk by chunk from `source`.
    pub fn parse_source(
        &self,
        mut source: impl TextSource,
        cancel: &CancellationToken,
    ) -> Option<SyntaxTree> {
        let tokens = TokenStream::streaming(&mut source, self.options.case_policy);
        self.run(tokens, Arena::new(), None, Some(cancel))
    }

    /// Reparse after `edits` turned `old`'s text into `source`, reusing
    /// what the edits left intact.
    ///
    /// The result is the tree [`parse`](Self::parse) would build for
    /// `source`. Edits that do not describe a change from `old`'s text to
    /// `source` are ignored with a warning and the text parsed from scratch.
    pub fn parse_incremental(
        &self,
        old: &SyntaxTree,
        source: impl AsRef<[u8]>,
        edits: &[InputEdit],
    ) -> SyntaxTree {
        let source = source.as_ref();
        if !old.language().ptr_eq(&self.language)
            || old.options().case_policy != self.options.case_policy
        {
            debug!("[INCREMENTAL] old tree was parsed with another language or case policy");
            return self.parse(source);
        }
        if old.arena_depth() + 1 >= self.options.max_arena_depth {
            debug!(
                "[INCREMENTAL] arena depth {} reached the limit of {}, starting a fresh arena",
                old.arena_depth(),
                self.options.max_arena_depth
            );
            return self.parse(source);
        }

        let reuse = TextSize::try_from(source.len())
            .ok()
            .and_then(|len| ReuseIndex::build(old, edits, len));
        let Some(reuse) = reuse else {
            warn!(
                "[INCREMENTAL] {} edits do not turn a {:?} byte text into a {} byte one, parsing from scratch",
                edits.len(),
                old.len(),
                source.len()
            );
            return self.parse(source);
        };

        let tokens = TokenStream::borrowed(source, self.options.case_policy);
        let arena = Arena::layered(old.shared_arena().clone());
        self.finish(tokens, arena, Some(&reuse), None)
    }

    /// Parse independent sources in parallel.
    pub fn parse_many<S>(&self, sources: &[S]) -> Vec<SyntaxTree>
    where
        S: AsRef<[u8]> + Sync,
    {
        sources.par_iter().map(|source| self.parse(source)).collect()
    }

    fn finish<'a>(
        &'a self,
        tokens: TokenStream<'a>,
        arena: Arena,
        reuse: Option<&'a ReuseIndex<'a>>,
        cancel: Option<&'a CancellationToken>,
    ) -> SyntaxTree {
        match self.run(tokens, arena, reuse, cancel) {
            Some(tree) => tree,
            None => unreachable!("a parse with no cancellation token stopped early"),
        }
    }

    fn run<'a>(
        &'a self,
        tokens: TokenStream<'a>,
        arena: Arena,
        reuse: Option<&'a ReuseIndex<'a>>,
        cancel: Option<&'a CancellationToken>,
    ) -> Option<SyntaxTree> {
        let language = &self.language;
        let mut engine = Engine::new(
            language.grammar(),
            language.table(),
            &self.options,
            tokens,
            arena,
        );
        if let Some(reuse) = reuse {
            engine = engine.with_reuse(reuse);
        }
        if let Some(cancel) = cancel {
            engine = engine.with_cancellation(cancel);
        }
        let (arena, root) = engine.run()?;
        Some(SyntaxTree::new(
            Arc::new(arena),
            root,
            self.language.clone(),
            self.options.clone(),
        ))
    }
}
