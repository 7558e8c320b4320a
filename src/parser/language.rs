//! Language handles: a grammar together with its compiled tables
//!
//! A [`Language`] is built once and shared read-only between any number of
//! parsers and threads. Nothing in the parser reaches for a global grammar;
//! [`Language::basic`] is a lazily built default that callers pass in like
//! any other language.

use std::fmt;
use std::sync::{Arc, LazyLock};

use rustc_hash::FxHashMap;

use super::errors::ConfigError;
use super::grammar::{FieldId, Grammar, ParseTable, basic_grammar};
use super::syntax_kind::{KIND_COUNT, SyntaxKind};

/// ABI version of tables produced by this crate
pub const ABI_VERSION: u32 = 14;

/// Oldest ABI version whose tables this crate can still drive
pub const MIN_COMPATIBLE_ABI_VERSION: u32 = 13;

static SYMBOL_IDS: LazyLock<FxHashMap<&'static str, SyntaxKind>> = LazyLock::new(|| {
    SyntaxKind::all()
        .filter(|kind| *kind != SyntaxKind::__LAST)
        .map(|kind| (kind.name(), kind))
        .collect()
});

static BASIC: LazyLock<Language> = LazyLock::new(|| {
    match basic_grammar().and_then(Language::new) {
        Ok(language) => language,
        Err(err) => panic!("built-in BASIC grammar is invalid: {err}"),
    }
});

struct LanguageData {
    grammar: Grammar,
    table: ParseTable,
    abi_version: u32,
}

/// A grammar and its parse tables; cheap to clone
#[derive(Clone)]
pub struct Language(Arc<LanguageData>);

impl Language {
    /// Compile `grammar` into a language at the current ABI version.
    pub fn new(grammar: Grammar) -> Result<Self, ConfigError> {
        Self::with_abi_version(grammar, ABI_VERSION)
    }

    /// Compile `grammar`, tagging the result with `abi_version`.
    ///
    /// Fails if the version is outside what this crate can drive.
    pub fn with_abi_version(grammar: Grammar, abi_version: u32) -> Result<Self, ConfigError> {
        check_version(abi_version)?;
        let table = ParseTable::build(&grammar)?;
        Ok(Language(Arc::new(LanguageData {
            grammar,
            table,
            abi_version,
        })))
    }

    /// The built-in BASIC language
    pub fn basic() -> Language {
        BASIC.clone()
    }

    pub fn name(&self) -> &str {
        self.0.grammar.name()
    }

    pub fn abi_version(&self) -> u32 {
        self.0.abi_version
    }

    /// Reject this language if a host built against `expected` can't use it.
    pub fn check_abi_version(&self, expected: u32) -> Result<(), ConfigError> {
        check_version(expected)?;
        if expected < self.0.abi_version {
            return Err(ConfigError::IncompatibleVersion {
                found: self.0.abi_version,
                min: MIN_COMPATIBLE_ABI_VERSION,
                max: expected,
            });
        }
        Ok(())
    }

    /// Name of symbol `id`; symbol ids are [`SyntaxKind`] discriminants.
    pub fn symbol_name(&self, id: u16) -> Option<&'static str> {
        SyntaxKind::from_raw(id).map(SyntaxKind::name)
    }

    /// Symbol id for `name`, e.g. `"print_statement"`
    pub fn symbol_id(&self, name: &str) -> Option<u16> {
        SYMBOL_IDS.get(name).map(|kind| *kind as u16)
    }

    pub fn symbol_count(&self) -> usize {
        KIND_COUNT
    }

    pub fn field_name(&self, id: FieldId) -> Option<&str> {
        self.0.grammar.field_name(id)
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.0.grammar.field_id(name)
    }

    pub fn field_count(&self) -> usize {
        self.0.grammar.fields().len()
    }

    pub fn grammar(&self) -> &Grammar {
        &self.0.grammar
    }

    pub fn table(&self) -> &ParseTable {
        &self.0.table
    }

    /// Whether both handles refer to the same compiled language
    pub fn ptr_eq(&self, other: &Language) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

fn check_version(version: u32) -> Result<(), ConfigError> {
    if (MIN_COMPATIBLE_ABI_VERSION..=ABI_VERSION).contains(&version) {
        Ok(())
    } else {
        Err(ConfigError::IncompatibleVersion {
            found: version,
            min: MIN_COMPATIBLE_ABI_VERSION,
            max: ABI_VERSION,
        })
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name())
            .field("abi_version", &self.abi_version())
            .field("states", &self.table().state_count())
            .finish()
    }
}
