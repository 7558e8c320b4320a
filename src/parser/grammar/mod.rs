//! Declarative grammar description
//!
//! A grammar is a list of rules over [`Symbol`]s. Terminals are token
//! [`SyntaxKind`]s; nonterminals are either *visible* (they produce a node of
//! their own kind) or *hidden* (name starts with `_`, their children are
//! spliced into whichever node uses them).
//!
//! ```text
//! GrammarBuilder ──build()──▶ Grammar ──ParseTable::build()──▶ ParseTable
//!   (rules, fields,            (resolved,          (LALR(1) actions, gotos,
//!    precedence)                validated)          conflicts kept for GLR)
//! ```
//!
//! Rules are written in Rust:
//!
//! ```
//! use basic_syntax::parser::SyntaxKind::*;
//! use basic_syntax::parser::grammar::{GrammarBuilder, field};
//!
//! let mut g = GrammarBuilder::new("tiny");
//! let lines = g.hidden("_lines");
//! g.start(SOURCE_FILE);
//! g.rule(SOURCE_FILE, [lines.into()]);
//! g.rule(lines, [GOTO_STATEMENT.into()]);
//! g.rule(lines, [lines.into(), NEWLINE.into(), GOTO_STATEMENT.into()]);
//! g.rule(GOTO_STATEMENT, [GOTO_KW.into(), field("target", NUMBER)]);
//! assert!(g.build().is_ok());
//! ```

mod basic;
mod table;

pub use basic::basic_grammar;
pub use table::{Action, ParseTable, StateId};

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::parser::errors::ConfigError;
use crate::parser::syntax_kind::{SyntaxKind, TERMINAL_COUNT};

/// Index of a rule; rule 0 is the augmented `_accept -> start` rule.
pub type RuleId = u16;

/// Interned field name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(u16);

impl FieldId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A grammar symbol.
///
/// Terminals share their number with the token's [`SyntaxKind`];
/// nonterminals are numbered after the last terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u16);

impl Symbol {
    pub fn terminal(kind: SyntaxKind) -> Symbol {
        debug_assert!(kind.is_terminal(), "{kind:?} is not a token kind");
        Symbol(kind as u16)
    }

    fn nonterminal(index: usize) -> Symbol {
        Symbol((TERMINAL_COUNT + index) as u16)
    }

    pub fn is_terminal(self) -> bool {
        (self.0 as usize) < TERMINAL_COUNT
    }

    pub fn as_terminal(self) -> Option<SyntaxKind> {
        if self.is_terminal() {
            SyntaxKind::from_raw(self.0)
        } else {
            None
        }
    }

    /// Position among the nonterminals, `None` for terminals
    pub fn nonterminal_index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(TERMINAL_COUNT)
    }
}

/// Reference to a symbol as written in a rule: a kind or a hidden symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRef {
    Kind(SyntaxKind),
    Symbol(Symbol),
}

impl From<SyntaxKind> for SymbolRef {
    fn from(kind: SyntaxKind) -> Self {
        SymbolRef::Kind(kind)
    }
}

impl From<Symbol> for SymbolRef {
    fn from(symbol: Symbol) -> Self {
        SymbolRef::Symbol(symbol)
    }
}

/// One right-hand side item as declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhsDecl {
    symbol: SymbolRef,
    field: Option<SmolStr>,
}

impl From<SyntaxKind> for RhsDecl {
    fn from(kind: SyntaxKind) -> Self {
        RhsDecl {
            symbol: kind.into(),
            field: None,
        }
    }
}

impl From<Symbol> for RhsDecl {
    fn from(symbol: Symbol) -> Self {
        RhsDecl {
            symbol: symbol.into(),
            field: None,
        }
    }
}

/// A right-hand side item labelled with a field name.
pub fn field(name: &str, symbol: impl Into<SymbolRef>) -> RhsDecl {
    RhsDecl {
        symbol: symbol.into(),
        field: Some(SmolStr::new(name)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assoc {
    #[default]
    None,
    Left,
    Right,
}

/// A rule as declared; precedence setters chain.
#[derive(Debug, Clone)]
pub struct RuleDecl {
    lhs: SymbolRef,
    rhs: Vec<RhsDecl>,
    precedence: i32,
    assoc: Assoc,
    dynamic_precedence: i32,
}

impl RuleDecl {
    pub fn prec(&mut self, precedence: i32) -> &mut Self {
        self.precedence = precedence;
        self
    }

    pub fn left(&mut self, precedence: i32) -> &mut Self {
        self.assoc(Assoc::Left, precedence)
    }

    pub fn right(&mut self, precedence: i32) -> &mut Self {
        self.assoc(Assoc::Right, precedence)
    }

    pub fn assoc(&mut self, assoc: Assoc, precedence: i32) -> &mut Self {
        self.assoc = assoc;
        self.precedence = precedence;
        self
    }

    /// Preference used only at runtime, when GLR versions are compared
    pub fn dynamic(&mut self, precedence: i32) -> &mut Self {
        self.dynamic_precedence = precedence;
        self
    }
}

/// Right-hand side item of a compiled rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RhsItem {
    pub symbol: Symbol,
    pub field: Option<FieldId>,
}

/// A compiled rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub lhs: Symbol,
    pub rhs: Vec<RhsItem>,
    pub precedence: i32,
    pub assoc: Assoc,
    pub dynamic_precedence: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub name: SmolStr,
    /// Node kind produced on reduce; `None` for hidden symbols
    pub kind: Option<SyntaxKind>,
}

impl NonTerminal {
    pub fn is_hidden(&self) -> bool {
        self.kind.is_none()
    }
}

/// Collects rule declarations and validates them into a [`Grammar`]
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    name: SmolStr,
    hidden: IndexSet<SmolStr>,
    rules: Vec<RuleDecl>,
    start: Option<SymbolRef>,
    sync_tokens: Vec<SyntaxKind>,
}

impl GrammarBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            hidden: IndexSet::new(),
            rules: Vec::new(),
            start: None,
            sync_tokens: Vec::new(),
        }
    }

    /// Declare (or look up) a hidden nonterminal.
    ///
    /// The returned symbol is only meaningful to this builder.
    pub fn hidden(&mut self, name: &str) -> Symbol {
        let (index, _) = self.hidden.insert_full(SmolStr::new(name));
        // Hidden symbols are renumbered in `build`; until then they live
        // above every possible node kind.
        Symbol((HIDDEN_BASE + index) as u16)
    }

    pub fn start(&mut self, symbol: impl Into<SymbolRef>) -> &mut Self {
        self.start = Some(symbol.into());
        self
    }

    /// Tokens where panic-mode recovery stops skipping
    pub fn sync(&mut self, tokens: &[SyntaxKind]) -> &mut Self {
        self.sync_tokens.extend_from_slice(tokens);
        self
    }

    pub fn rule<const N: usize>(
        &mut self,
        lhs: impl Into<SymbolRef>,
        rhs: [RhsDecl; N],
    ) -> &mut RuleDecl {
        self.rules.push(RuleDecl {
            lhs: lhs.into(),
            rhs: rhs.into(),
            precedence: 0,
            assoc: Assoc::None,
            dynamic_precedence: 0,
        });
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    pub fn build(self) -> Result<Grammar, ConfigError> {
        let mut resolver = Resolver {
            nonterminals: Vec::new(),
            by_kind: FxHashMap::default(),
            hidden: vec![None; self.hidden.len()],
            hidden_names: &self.hidden,
        };

        // Left-hand sides first, so every declared kind has a symbol before
        // right-hand sides are resolved.
        let mut lhs_symbols = Vec::with_capacity(self.rules.len());
        for decl in &self.rules {
            lhs_symbols.push(resolver.declare(decl.lhs)?);
        }

        let start = match self.start {
            Some(start) => resolver.resolve(start)?,
            None => return Err(ConfigError::MissingStartSymbol(self.name)),
        };
        if start.is_terminal() {
            if let Some(kind) = start.as_terminal() {
                return Err(ConfigError::TerminalLhs(kind));
            }
        }

        let mut fields: IndexSet<SmolStr> = IndexSet::new();
        let mut rules = Vec::with_capacity(self.rules.len() + 1);
        let accept = resolver.push_nonterminal(SmolStr::new_static("_accept"), None);
        rules.push(Rule {
            lhs: accept,
            rhs: vec![RhsItem {
                symbol: start,
                field: None,
            }],
            precedence: 0,
            assoc: Assoc::None,
            dynamic_precedence: 0,
        });

        for (decl, lhs) in self.rules.iter().zip(lhs_symbols) {
            if decl.rhs.len() > u8::MAX as usize {
                return Err(ConfigError::RuleTooLong {
                    lhs: resolver.name(lhs),
                    len: decl.rhs.len(),
                });
            }
            let mut rhs = Vec::with_capacity(decl.rhs.len());
            for item in &decl.rhs {
                let symbol = resolver.resolve(item.symbol)?;
                if let Some(kind @ (SyntaxKind::EOF | SyntaxKind::ERROR)) = symbol.as_terminal() {
                    return Err(ConfigError::ReservedToken(kind));
                }
                let field = item.field.as_ref().map(|name| {
                    let (index, _) = fields.insert_full(name.clone());
                    FieldId(index as u16)
                });
                rhs.push(RhsItem { symbol, field });
            }
            rules.push(Rule {
                lhs,
                rhs,
                precedence: decl.precedence,
                assoc: decl.assoc,
                dynamic_precedence: decl.dynamic_precedence,
            });
        }

        let mut defined = vec![false; resolver.nonterminals.len()];
        for rule in &rules {
            if let Some(index) = rule.lhs.nonterminal_index() {
                defined[index] = true;
            }
        }
        if let Some(index) = defined.iter().position(|&d| !d) {
            return Err(ConfigError::UndefinedNonterminal(
                resolver.nonterminals[index].name.clone(),
            ));
        }
        // Hidden symbols handed out by `hidden` but never used at all
        if let Some(index) = resolver.hidden.iter().position(Option::is_none) {
            return Err(ConfigError::UndefinedNonterminal(self.hidden[index].clone()));
        }

        let symbol_count = TERMINAL_COUNT + resolver.nonterminals.len();
        if symbol_count >= HIDDEN_BASE || fields.len() > u16::MAX as usize {
            return Err(ConfigError::TooManySymbols(symbol_count));
        }

        let mut sync_tokens = self.sync_tokens;
        if !sync_tokens.contains(&SyntaxKind::EOF) {
            sync_tokens.push(SyntaxKind::EOF);
        }

        Ok(Grammar {
            name: self.name,
            by_kind: resolver.by_kind,
            nonterminals: resolver.nonterminals,
            rules,
            fields: fields.into_iter().collect(),
            start,
            sync_tokens,
        })
    }
}

const HIDDEN_BASE: usize = 0x8000;

struct Resolver<'a> {
    nonterminals: Vec<NonTerminal>,
    by_kind: FxHashMap<SyntaxKind, Symbol>,
    hidden: Vec<Option<Symbol>>,
    hidden_names: &'a IndexSet<SmolStr>,
}

impl Resolver<'_> {
    fn push_nonterminal(&mut self, name: SmolStr, kind: Option<SyntaxKind>) -> Symbol {
        let symbol = Symbol::nonterminal(self.nonterminals.len());
        self.nonterminals.push(NonTerminal { name, kind });
        symbol
    }

    fn hidden_symbol(&mut self, raw: Symbol) -> Symbol {
        let index = raw.0 as usize - HIDDEN_BASE;
        match self.hidden[index] {
            Some(symbol) => symbol,
            None => {
                let name = self.hidden_names[index].clone();
                let symbol = self.push_nonterminal(name, None);
                self.hidden[index] = Some(symbol);
                symbol
            }
        }
    }

    /// Resolve a left-hand side, creating its nonterminal if needed.
    fn declare(&mut self, lhs: SymbolRef) -> Result<Symbol, ConfigError> {
        match lhs {
            SymbolRef::Kind(kind) if kind.is_terminal() => Err(ConfigError::TerminalLhs(kind)),
            SymbolRef::Kind(kind) => {
                if let Some(&symbol) = self.by_kind.get(&kind) {
                    return Ok(symbol);
                }
                let symbol = self.push_nonterminal(SmolStr::new_static(kind.name()), Some(kind));
                self.by_kind.insert(kind, symbol);
                Ok(symbol)
            }
            SymbolRef::Symbol(symbol) => self.resolve(SymbolRef::Symbol(symbol)),
        }
    }

    fn resolve(&mut self, item: SymbolRef) -> Result<Symbol, ConfigError> {
        match item {
            SymbolRef::Kind(kind) if kind.is_terminal() => Ok(Symbol::terminal(kind)),
            SymbolRef::Kind(kind) => self
                .by_kind
                .get(&kind)
                .copied()
                .ok_or(ConfigError::UndeclaredNodeKind(kind)),
            SymbolRef::Symbol(symbol) if symbol.0 as usize >= HIDDEN_BASE => {
                Ok(self.hidden_symbol(symbol))
            }
            SymbolRef::Symbol(symbol) => Ok(symbol),
        }
    }

    fn name(&self, symbol: Symbol) -> SmolStr {
        match symbol.nonterminal_index() {
            Some(index) => self.nonterminals[index].name.clone(),
            None => SmolStr::new_static(symbol.as_terminal().map_or("?", SyntaxKind::name)),
        }
    }
}

/// A validated grammar
#[derive(Debug, Clone)]
pub struct Grammar {
    name: SmolStr,
    nonterminals: Vec<NonTerminal>,
    by_kind: FxHashMap<SyntaxKind, Symbol>,
    rules: Vec<Rule>,
    fields: Vec<SmolStr>,
    start: Symbol,
    sync_tokens: Vec<SyntaxKind>,
}

impl Grammar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id as usize]
    }

    pub fn nonterminals(&self) -> &[NonTerminal] {
        &self.nonterminals
    }

    /// The nonterminal behind `symbol`.
    ///
    /// # Panics
    /// Panics if `symbol` is a terminal.
    pub fn nonterminal(&self, symbol: Symbol) -> &NonTerminal {
        match symbol.nonterminal_index() {
            Some(index) => &self.nonterminals[index],
            None => panic!("{symbol:?} is a terminal"),
        }
    }

    pub fn start(&self) -> Symbol {
        self.start
    }

    /// Node kind of the root, if the start symbol is visible
    pub fn root_kind(&self) -> Option<SyntaxKind> {
        self.nonterminal(self.start).kind
    }

    /// Nonterminal producing nodes of `kind`
    pub fn symbol_for_kind(&self, kind: SyntaxKind) -> Option<Symbol> {
        self.by_kind.get(&kind).copied()
    }

    pub fn fields(&self) -> &[SmolStr] {
        &self.fields
    }

    pub fn field_name(&self, id: FieldId) -> Option<&str> {
        self.fields.get(id.index()).map(SmolStr::as_str)
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|f| f == name)
            .map(|index| FieldId(index as u16))
    }

    pub fn sync_tokens(&self) -> &[SyntaxKind] {
        &self.sync_tokens
    }

    pub fn is_sync(&self, kind: SyntaxKind) -> bool {
        self.sync_tokens.contains(&kind)
    }

    /// Whether recovery may invent a zero-width `kind` token
    pub fn is_insertable(&self, kind: SyntaxKind) -> bool {
        !kind.is_trivia() && kind != SyntaxKind::ERROR && !self.is_sync(kind)
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        match symbol.nonterminal_index() {
            Some(index) => self.nonterminals[index].name.as_str(),
            None => symbol.as_terminal().map_or("?", SyntaxKind::name),
        }
    }
}
