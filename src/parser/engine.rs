//! Table-driven GLR parsing
//!
//! The engine runs the LALR(1) automaton over a set of stack [`Version`]s.
//! A cell with several actions forks the version; versions that reach the
//! same state stack merge, keeping the preferred one. When no version can
//! take the lookahead, the best one is repaired:
//!
//! 1. insert a zero-width MISSING token, if a single token makes the
//!    lookahead acceptable;
//! 2. otherwise skip tokens into an ERROR node until one is acceptable,
//!    popping the stack when a line terminator or the end of input still
//!    isn't.
//!
//! With a [`ReuseIndex`] the engine also takes whole subtrees from the
//! previous tree instead of lexing and reducing them again.

use std::collections::VecDeque;
use std::mem;

use smol_str::SmolStr;
use text_size::TextSize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::grammar::{Action, FieldId, Grammar, ParseTable, RuleId, StateId};
use super::input::TokenStream;
use super::lexer::LexMode;
use super::options::ParseOptions;
use super::stack::{StackEntry, Version, condense};
use super::syntax_kind::SyntaxKind;
use crate::incremental::ReuseIndex;
use crate::tree::{Arena, Child, NO_STATE, NodeFlags, NodeId};

/// Reductions one version may make on a single lookahead before it is
/// dropped; only a cyclic grammar gets anywhere near this.
const MAX_REDUCTIONS: usize = 4096;

#[derive(Debug, Clone, Copy)]
struct Lookahead {
    kind: SyntaxKind,
    /// `None` only for the end of input
    leaf: Option<NodeId>,
    start: TextSize,
    end: TextSize,
    mode: LexMode,
}

enum Recovery {
    Resume(Version, Lookahead),
    Finished(NodeId),
}

#[derive(Debug, Default)]
struct Stats {
    tokens: usize,
    forks: usize,
    merges: usize,
    recoveries: usize,
    reused: usize,
}

pub(crate) struct Engine<'a> {
    grammar: &'a Grammar,
    table: &'a ParseTable,
    options: &'a ParseOptions,
    tokens: TokenStream<'a>,
    arena: Arena,
    reuse: Option<&'a ReuseIndex<'a>>,
    cancel: Option<&'a CancellationToken>,
    versions: Vec<Version>,
    /// Trivia waiting to lead the next shifted token
    pending: Vec<Child>,
    /// End of the last token consumed, trivia excluded
    position: TextSize,
    stats: Stats,
}

impl<'a> Engine<'a> {
    pub fn new(
        grammar: &'a Grammar,
        table: &'a ParseTable,
        options: &'a ParseOptions,
        tokens: TokenStream<'a>,
        arena: Arena,
    ) -> Self {
        Self {
            grammar,
            table,
            options,
            tokens,
            arena,
            reuse: None,
            cancel: None,
            versions: vec![Version::new()],
            pending: Vec::new(),
            position: TextSize::new(0),
            stats: Stats::default(),
        }
    }

    pub fn with_reuse(mut self, reuse: &'a ReuseIndex<'a>) -> Self {
        self.reuse = Some(reuse);
        self
    }

    pub fn with_cancellation(mut self, cancel: &'a CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Parse to the end of input. Returns `None` if cancelled.
    pub fn run(mut self) -> Option<(Arena, NodeId)> {
        loop {
            if self.cancel.is_some_and(CancellationToken::is_cancelled) {
                debug!(
                    "[PARSE] cancelled after {} tokens at byte {:?}",
                    self.stats.tokens,
                    self.tokens.offset()
                );
                return None;
            }
            let Some(lookahead) = self.next_lookahead() else {
                continue;
            };
            if let Some(root) = self.consume(lookahead) {
                debug!(
                    "[PARSE] {} tokens, {} forks, {} merges, {} recoveries, {} reused subtrees, {} new nodes",
                    self.stats.tokens,
                    self.stats.forks,
                    self.stats.merges,
                    self.stats.recoveries,
                    self.stats.reused,
                    self.arena.layer_len()
                );
                return Some((self.arena, root));
            }
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Next non-trivia lookahead; trivia go to `pending`. Returns `None`
    /// when a whole subtree was reused instead.
    fn next_lookahead(&mut self) -> Option<Lookahead> {
        loop {
            let lookahead = match self.reuse_at_cursor() {
                Some(Reused::Subtree) => return None,
                Some(Reused::Leaf(lookahead)) => lookahead,
                None => self.lex(),
            };
            self.stats.tokens += 1;
            match lookahead.leaf {
                Some(leaf) if lookahead.kind.is_trivia() => self.pending.push(Child::new(leaf)),
                _ => return Some(lookahead),
            }
        }
    }

    fn lex(&mut self) -> Lookahead {
        let mode = self.tokens.mode();
        match self.tokens.next_token() {
            Some(token) => {
                let flags = if token.is_error {
                    NodeFlags::ERROR
                } else {
                    NodeFlags::empty()
                };
                let leaf = self.arena.push_leaf(
                    token.kind,
                    token.text,
                    token.range.len(),
                    flags,
                    token.mode,
                );
                Lookahead {
                    kind: token.kind,
                    leaf: Some(leaf),
                    start: token.range.start(),
                    end: token.range.end(),
                    mode: token.mode,
                }
            }
            None => {
                let end = self.tokens.offset();
                Lookahead {
                    kind: SyntaxKind::EOF,
                    leaf: None,
                    start: end,
                    end,
                    mode,
                }
            }
        }
    }

    /// Lex past trivia without consulting the reuse index.
    fn lex_significant(&mut self) -> Lookahead {
        loop {
            let lookahead = self.lex();
            self.stats.tokens += 1;
            match lookahead.leaf {
                Some(leaf) if lookahead.kind.is_trivia() => self.pending.push(Child::new(leaf)),
                _ => return lookahead,
            }
        }
    }

    // =========================================================================
    // Shifting and reducing
    // =========================================================================

    /// Feed one lookahead to every version. Returns the root once the
    /// input is accepted.
    fn consume(&mut self, mut lookahead: Lookahead) -> Option<NodeId> {
        loop {
            let versions = mem::take(&mut self.versions);
            let advanced = self.advance_all(versions, lookahead);

            if let Some(version) = advanced.accepted {
                return Some(self.accept(version));
            }
            if !advanced.shifted.is_empty() {
                let mut shifted = advanced.shifted;
                let merged = condense(&mut shifted, self.options.max_versions);
                if merged > 0 {
                    self.stats.merges += merged;
                    trace!(
                        "[GLR] merged {} versions at byte {:?}, {} left",
                        merged,
                        lookahead.start,
                        shifted.len()
                    );
                }
                self.versions = shifted;
                self.pending.clear();
                self.position = lookahead.end;
                return None;
            }

            let mut failed = advanced.failed;
            failed.sort_by(Version::cmp_preference);
            let best = match failed.into_iter().next() {
                Some(version) => version,
                None => unreachable!("every version either shifts, accepts or fails"),
            };
            match self.recover(best, lookahead) {
                Recovery::Resume(version, next) => {
                    self.versions = vec![version];
                    lookahead = next;
                }
                Recovery::Finished(root) => return Some(root),
            }
        }
    }

    fn advance_all(&mut self, versions: Vec<Version>, lookahead: Lookahead) -> Advanced {
        let table = self.table;
        let started = versions.len();
        let mut work: VecDeque<(Version, Option<Action>)> =
            versions.into_iter().map(|v| (v, None)).collect();
        let mut result = Advanced::default();

        'versions: while let Some((mut version, mut forced)) = work.pop_front() {
            let mut reductions = 0;
            loop {
                let action = match forced.take() {
                    Some(action) => action,
                    None => match table.actions(version.top(), lookahead.kind) {
                        [] => {
                            result.failed.push(version);
                            continue 'versions;
                        }
                        [action] => *action,
                        [first, rest @ ..] => {
                            let alive = work.len() + result.shifted.len() + 1;
                            let room = self.options.max_versions.saturating_sub(alive);
                            if room > 0 {
                                for (i, &alternative) in rest.iter().take(room).enumerate() {
                                    let mut fork = version.clone();
                                    fork.signature.push(i as u16 + 1);
                                    work.push_back((fork, Some(alternative)));
                                }
                                version.signature.push(0);
                                self.stats.forks += 1;
                                trace!(
                                    "[GLR] fork in state {} on {:?}: {:?}",
                                    version.top(),
                                    lookahead.kind,
                                    table.actions(version.top(), lookahead.kind)
                                );
                            }
                            *first
                        }
                    },
                };

                match action {
                    Action::Shift(state) => {
                        let Some(leaf) = lookahead.leaf else {
                            result.failed.push(version);
                            continue 'versions;
                        };
                        let mut children = self.pending.clone();
                        children.push(Child::new(leaf));
                        version.stack.push(StackEntry {
                            state,
                            start: self.position,
                            children,
                        });
                        result.shifted.push(version);
                        continue 'versions;
                    }
                    Action::Accept => {
                        let better = result
                            .accepted
                            .as_ref()
                            .is_none_or(|best| version.cmp_preference(best).is_lt());
                        if better {
                            result.accepted = Some(version);
                        }
                        continue 'versions;
                    }
                    Action::Reduce(rule) => {
                        reductions += 1;
                        if reductions > MAX_REDUCTIONS {
                            result.failed.push(version);
                            continue 'versions;
                        }
                        let fragile = started > 1 || !work.is_empty() || !result.shifted.is_empty();
                        self.reduce(&mut version, rule, fragile);
                    }
                }
            }
        }
        result
    }

    fn reduce(&mut self, version: &mut Version, rule_id: RuleId, fragile: bool) {
        let grammar = self.grammar;
        let rule = grammar.rule(rule_id);
        let split = version.stack.len() - rule.rhs.len();
        let popped = version.stack.split_off(split);
        let pre_state = version.top();
        let start = popped.first().map_or(self.position, |entry| entry.start);

        // The first entry's vec becomes the accumulator, so a left-recursive
        // list appends to its own children instead of copying them.
        let mut children: Vec<Child> = Vec::new();
        for (entry, item) in popped.into_iter().zip(&rule.rhs) {
            let mut contributed = entry.children;
            if let Some(field) = item.field {
                self.apply_field(&mut contributed, field, item.symbol.is_terminal());
            }
            if children.is_empty() {
                children = contributed;
            } else {
                children.append(&mut contributed);
            }
        }
        version.dynamic_precedence += rule.dynamic_precedence;

        // The start symbol becomes the root on accept
        let kind = if rule.lhs == grammar.start() {
            None
        } else {
            grammar.nonterminal(rule.lhs).kind
        };
        if let Some(kind) = kind {
            let leading = children
                .iter()
                .take_while(|child| self.arena.get(child.node).kind.is_trivia())
                .count();
            let node_children = children.split_off(leading);
            let node_start = children
                .iter()
                .fold(start, |at, child| at + self.arena.get(child.node).width);
            let node = self.build_node(kind, &node_children, pre_state, node_start, fragile);
            children.push(Child::new(node));
        }

        let state = match self.table.goto(pre_state, rule.lhs) {
            Some(state) => state,
            None => panic!(
                "no goto for {} from state {pre_state}",
                grammar.symbol_name(rule.lhs)
            ),
        };
        version.stack.push(StackEntry {
            state,
            start,
            children,
        });
    }

    fn apply_field(&self, children: &mut [Child], field: FieldId, terminal: bool) {
        for child in children.iter_mut().filter(|child| child.field.is_none()) {
            let kind = self.arena.get(child.node).kind;
            if !kind.is_trivia() && kind != SyntaxKind::ERROR && (terminal || kind.is_named()) {
                child.field = Some(field);
            }
        }
    }

    fn build_node(
        &mut self,
        kind: SyntaxKind,
        children: &[Child],
        pre_state: StateId,
        start: TextSize,
        fragile: bool,
    ) -> NodeId {
        if !fragile {
            if let Some(reuse) = self.reuse {
                if let Some(node) = reuse.find_node(&self.arena, start, kind, pre_state, children) {
                    self.stats.reused += 1;
                    return node;
                }
            }
        }
        let flags = if fragile {
            NodeFlags::FRAGILE
        } else {
            NodeFlags::empty()
        };
        self.arena.push_node(kind, children, flags, pre_state)
    }

    fn accept(&mut self, version: Version) -> NodeId {
        let mut children: Vec<Child> = version
            .stack
            .into_iter()
            .flat_map(|entry| entry.children)
            .collect();
        children.append(&mut self.pending);
        let kind = self.grammar.root_kind().unwrap_or(SyntaxKind::SOURCE_FILE);
        self.arena
            .push_node(kind, &children, NodeFlags::empty(), NO_STATE)
    }

    /// Take the preferred action until `lookahead` is shifted.
    ///
    /// Only used for MISSING tokens. Nodes reduced here saw a lookahead that
    /// is not in the text, so they are built fragile.
    fn advance_preferred(&mut self, version: &mut Version, lookahead: Lookahead) -> bool {
        let table = self.table;
        let Some(leaf) = lookahead.leaf else {
            return false;
        };
        for _ in 0..MAX_REDUCTIONS {
            match table.actions(version.top(), lookahead.kind).first() {
                Some(&Action::Reduce(rule)) => self.reduce(version, rule, true),
                Some(&Action::Shift(state)) => {
                    version.stack.push(StackEntry {
                        state,
                        start: self.position,
                        children: vec![Child::new(leaf)],
                    });
                    return true;
                }
                Some(Action::Accept) | None => return false,
            }
        }
        false
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Run preferred actions for `kind` over bare states, up to and
    /// including the shift. Returns the action that consumed it.
    fn simulate(&self, states: &mut Vec<StateId>, kind: SyntaxKind) -> Option<Action> {
        for _ in 0..MAX_REDUCTIONS {
            let top = *states.last()?;
            match *self.table.actions(top, kind).first()? {
                Action::Shift(state) => {
                    states.push(state);
                    return Some(Action::Shift(state));
                }
                Action::Accept => return Some(Action::Accept),
                Action::Reduce(rule) => {
                    let rule = self.grammar.rule(rule);
                    let len = states.len().checked_sub(rule.rhs.len())?;
                    states.truncate(len);
                    let top = *states.last()?;
                    states.push(self.table.goto(top, rule.lhs)?);
                }
            }
        }
        None
    }

    fn accepts(&self, version: &Version, kind: SyntaxKind) -> bool {
        self.simulate(&mut version.states(), kind).is_some()
    }

    /// A token whose insertion lets `kind` be consumed
    fn find_missing(&self, version: &Version, kind: SyntaxKind) -> Option<SyntaxKind> {
        let states = version.states();
        missing_candidates()
            .filter(|&candidate| self.grammar.is_insertable(candidate))
            .find(|&candidate| {
                let mut states = states.clone();
                matches!(
                    self.simulate(&mut states, candidate),
                    Some(Action::Shift(_))
                ) && self.simulate(&mut states, kind).is_some()
            })
    }

    // =========================================================================
    // Error recovery
    // =========================================================================

    fn recover(&mut self, mut version: Version, mut lookahead: Lookahead) -> Recovery {
        self.stats.recoveries += 1;
        trace!(
            "[RECOVER] state {} cannot take {:?} at byte {:?}",
            version.top(),
            lookahead.kind,
            lookahead.start
        );
        let mut skipped: Vec<Child> = Vec::new();
        loop {
            if self.accepts(&version, lookahead.kind) {
                break;
            }

            if let Some(kind) = self.find_missing(&version, lookahead.kind) {
                self.wrap_skipped(&mut version, &mut skipped);
                trace!("[RECOVER] inserting missing {:?} at byte {:?}", kind, self.position);
                let leaf = self.arena.push_leaf(
                    kind,
                    SmolStr::default(),
                    TextSize::new(0),
                    NodeFlags::MISSING | NodeFlags::FRAGILE,
                    lookahead.mode,
                );
                let missing = Lookahead {
                    kind,
                    leaf: Some(leaf),
                    start: self.position,
                    end: self.position,
                    mode: lookahead.mode,
                };
                if !self.advance_preferred(&mut version, missing) {
                    unreachable!("simulated insertion of {kind:?} could not be replayed");
                }
                version.error_cost += 1;
                continue;
            }

            let sync = self.grammar.is_sync(lookahead.kind);
            if sync && version.stack.len() > 1 {
                if let Some(entry) = version.stack.pop() {
                    trace!("[RECOVER] popping state {}", entry.state);
                    let mut children = entry.children;
                    children.append(&mut skipped);
                    skipped = children;
                }
                continue;
            }

            let Some(leaf) = lookahead.leaf else {
                // End of input with nothing left to pop
                self.wrap_skipped(&mut version, &mut skipped);
                return Recovery::Finished(self.accept(version));
            };
            trace!("[RECOVER] skipping {:?} at byte {:?}", lookahead.kind, lookahead.start);
            if skipped.is_empty() {
                let pending = mem::take(&mut self.pending);
                version.top_entry().children.extend(pending);
            } else {
                skipped.append(&mut self.pending);
            }
            skipped.push(Child::new(leaf));
            self.position = lookahead.end;
            lookahead = self.lex_significant();
        }
        self.wrap_skipped(&mut version, &mut skipped);
        Recovery::Resume(version, lookahead)
    }

    /// Wrap skipped children in an ERROR node on top of the stack.
    fn wrap_skipped(&mut self, version: &mut Version, skipped: &mut Vec<Child>) {
        if skipped.is_empty() {
            return;
        }
        let leading = skipped
            .iter()
            .take_while(|child| self.arena.get(child.node).kind.is_trivia())
            .count();
        let mut content = skipped.split_off(leading);
        let trivia = mem::take(skipped);
        // Fields belong to the rules the popped entries were parsed under
        for child in &mut content {
            child.field = None;
        }

        let entry = version.top_entry();
        entry.children.extend(trivia);
        if !content.is_empty() {
            let error = self.arena.push_node(
                SyntaxKind::ERROR,
                &content,
                NodeFlags::ERROR | NodeFlags::FRAGILE,
                NO_STATE,
            );
            version.top_entry().children.push(Child::new(error));
            version.error_cost += 1;
        }
    }

    // =========================================================================
    // Subtree reuse
    // =========================================================================

    fn reuse_at_cursor(&mut self) -> Option<Reused> {
        let reuse = self.reuse?;
        if self.versions.len() != 1 {
            return None;
        }
        let offset = self.tokens.offset();
        let mode = self.tokens.mode();
        for node in reuse.at(offset) {
            let data = self.arena.get(node);
            if data.mode != mode {
                continue;
            }
            let (kind, width) = (data.kind, data.width);
            if data.is_leaf() {
                self.tokens.skip(width, mode.after(kind));
                return Some(Reused::Leaf(Lookahead {
                    kind,
                    leaf: Some(node),
                    start: offset,
                    end: offset + width,
                    mode,
                }));
            }
            if self.reuse_subtree(node, offset) {
                return Some(Reused::Subtree);
            }
        }
        None
    }

    /// Shift an old subtree whole, if the parser is in the state it was
    /// built in once its first token's reductions are done.
    fn reuse_subtree(&mut self, node: NodeId, offset: TextSize) -> bool {
        let table = self.table;
        let data = self.arena.get(node);
        let (kind, width, pre_state) = (data.kind, data.width, data.pre_state);
        if pre_state == NO_STATE {
            return false;
        }
        let Some(symbol) = self.grammar.symbol_for_kind(kind) else {
            return false;
        };
        let Some(target) = table.goto(pre_state, symbol) else {
            return false;
        };
        let (Some(first), Some(last)) = (self.boundary_leaf(node, true), self.boundary_leaf(node, false))
        else {
            return false;
        };
        let first_kind = self.arena.get(first).kind;
        let last = self.arena.get(last);
        let mode_after = last.mode.after(last.kind);

        // The reductions before the first token must be forced moves.
        let mut states = self.versions[0].states();
        loop {
            let Some(&top) = states.last() else {
                return false;
            };
            match table.actions(top, first_kind) {
                [Action::Shift(_)] => break,
                [Action::Reduce(rule)] => {
                    let rule = self.grammar.rule(*rule);
                    let Some(len) = states.len().checked_sub(rule.rhs.len()) else {
                        return false;
                    };
                    states.truncate(len);
                    let Some(next) = states.last().and_then(|&top| table.goto(top, rule.lhs))
                    else {
                        return false;
                    };
                    states.push(next);
                }
                _ => return false,
            }
        }
        if states.last() != Some(&pre_state) {
            return false;
        }

        let Some(mut version) = self.versions.pop() else {
            return false;
        };
        while let [Action::Reduce(rule)] = table.actions(version.top(), first_kind) {
            self.reduce(&mut version, *rule, false);
        }
        let mut children = mem::take(&mut self.pending);
        children.push(Child::new(node));
        version.stack.push(StackEntry {
            state: target,
            start: self.position,
            children,
        });
        self.versions.push(version);

        self.tokens.skip(width, mode_after);
        self.position = offset + width;
        self.stats.reused += 1;
        trace!("[REUSE] {:?} at byte {:?}", kind, offset);
        true
    }

    /// First or last leaf of a subtree
    fn boundary_leaf(&self, node: NodeId, first: bool) -> Option<NodeId> {
        let mut current = node;
        loop {
            let data = self.arena.get(current);
            if data.is_leaf() {
                return Some(current);
            }
            let children = self.arena.children(current);
            let next = if first {
                children.first()
            } else {
                children.last()
            };
            current = next?.node;
        }
    }
}

enum Reused {
    Leaf(Lookahead),
    Subtree,
}

#[derive(Default)]
struct Advanced {
    shifted: Vec<Version>,
    accepted: Option<Version>,
    failed: Vec<Version>,
}

/// Insertion candidates, most plausible first: keywords, then
/// punctuation, then literals.
fn missing_candidates() -> impl Iterator<Item = SyntaxKind> {
    let keywords = SyntaxKind::all().filter(|kind| kind.is_keyword());
    let punctuation = SyntaxKind::all().filter(|kind| kind.is_punct());
    let rest = SyntaxKind::all().filter(|kind| {
        kind.is_terminal() && !kind.is_keyword() && !kind.is_punct() && *kind != SyntaxKind::EOF
    });
    keywords.chain(punctuation).chain(rest)
}
