//! Errors raised while assembling a language, before any parsing happens

use smol_str::SmolStr;
use thiserror::Error;

use crate::parser::SyntaxKind;

/// A grammar or table that cannot be used to parse.
///
/// These are the only failures the parser reports through `Result`; malformed
/// source text always yields a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("incompatible language ABI version {found} (supported {min}..={max})")]
    IncompatibleVersion { found: u32, min: u32, max: u32 },

    #[error("grammar '{0}' has no start symbol")]
    MissingStartSymbol(SmolStr),

    #[error("nonterminal '{0}' is used but has no rules")]
    UndefinedNonterminal(SmolStr),

    #[error("node kind {0} is referenced but never declared")]
    UndeclaredNodeKind(SyntaxKind),

    #[error("token kind {0} cannot be the left-hand side of a rule")]
    TerminalLhs(SyntaxKind),

    #[error("token kind {0} is reserved and cannot appear in a rule")]
    ReservedToken(SyntaxKind),

    #[error("grammar needs {0} symbols, more than a table can address")]
    TooManySymbols(usize),

    #[error("grammar produces {0} parse states, more than a table can address")]
    TooManyStates(usize),

    #[error("rule for '{lhs}' has {len} symbols on its right-hand side")]
    RuleTooLong { lhs: SmolStr, len: usize },
}
