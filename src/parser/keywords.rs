//! Reserved-word table
//!
//! Identifiers are lexed by the general identifier rule first and then looked
//! up here, so `PRINTER` stays an identifier while `PRINT` becomes a keyword.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use super::syntax_kind::SyntaxKind;

/// How reserved words are matched against source spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CasePolicy {
    /// `print`, `Print` and `PRINT` are all the keyword
    #[default]
    Insensitive,
    /// Only the upper-case spelling is reserved
    Sensitive,
}

/// Statement and operator keywords.
pub const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("PRINT", SyntaxKind::PRINT_KW),
    ("LET", SyntaxKind::LET_KW),
    ("IF", SyntaxKind::IF_KW),
    ("THEN", SyntaxKind::THEN_KW),
    ("ELSE", SyntaxKind::ELSE_KW),
    ("GOTO", SyntaxKind::GOTO_KW),
    ("GOSUB", SyntaxKind::GOSUB_KW),
    ("RETURN", SyntaxKind::RETURN_KW),
    ("FOR", SyntaxKind::FOR_KW),
    ("TO", SyntaxKind::TO_KW),
    ("STEP", SyntaxKind::STEP_KW),
    ("NEXT", SyntaxKind::NEXT_KW),
    ("INPUT", SyntaxKind::INPUT_KW),
    ("END", SyntaxKind::END_KW),
    ("STOP", SyntaxKind::STOP_KW),
    ("REM", SyntaxKind::REM_KW),
    ("DATA", SyntaxKind::DATA_KW),
    ("READ", SyntaxKind::READ_KW),
    ("RESTORE", SyntaxKind::RESTORE_KW),
    ("DIM", SyntaxKind::DIM_KW),
    ("ON", SyntaxKind::ON_KW),
    ("AND", SyntaxKind::AND_KW),
    ("OR", SyntaxKind::OR_KW),
    ("NOT", SyntaxKind::NOT_KW),
    ("MOD", SyntaxKind::MOD_KW),
];

/// Built-in functions; all lex as [`SyntaxKind::BUILTIN_FN`].
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "ABS", "ASC", "ATN", "CHR$", "COS", "EXP", "INT", "LEFT$", "LEN", "LOG", "MID$", "RIGHT$",
    "RND", "SGN", "SIN", "SQR", "STR$", "TAN", "VAL",
];

static RESERVED: LazyLock<FxHashMap<&'static str, SyntaxKind>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    map.extend(KEYWORDS.iter().copied());
    map.extend(BUILTIN_FUNCTIONS.iter().map(|name| (*name, SyntaxKind::BUILTIN_FN)));
    map
});

/// Longest reserved word, used to bail out early on long identifiers.
const MAX_RESERVED_LEN: usize = 7;

/// Look up an identifier in the reserved-word table.
pub fn lookup(ident: &str, policy: CasePolicy) -> Option<SyntaxKind> {
    if ident.len() > MAX_RESERVED_LEN {
        return None;
    }
    match policy {
        CasePolicy::Sensitive => RESERVED.get(ident).copied(),
        CasePolicy::Insensitive => {
            let mut buf = [0u8; MAX_RESERVED_LEN];
            let upper = &mut buf[..ident.len()];
            upper.copy_from_slice(ident.as_bytes());
            upper.make_ascii_uppercase();
            let upper = std::str::from_utf8(upper).ok()?;
            RESERVED.get(upper).copied()
        }
    }
}

/// Check whether `ident` is reserved under `policy`.
pub fn is_reserved(ident: &str, policy: CasePolicy) -> bool {
    lookup(ident, policy).is_some()
}
