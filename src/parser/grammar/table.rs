//! LALR(1) parse table construction
//!
//! States are LR(1) item sets merged by core: a state is identified by its
//! kernel items without lookaheads, and lookaheads of merged states are
//! unioned until nothing changes. Conflicts are resolved statically by rule
//! precedence and associativity where possible; the rest are kept, ordered
//! by preference, and explored at runtime by the GLR driver.

use std::cmp::{Ordering, Reverse};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, VecDeque};

use indexmap::IndexMap;
use tracing::debug;

use super::{Assoc, Grammar, RhsItem, RuleId, Symbol};
use crate::parser::errors::ConfigError;
use crate::parser::syntax_kind::{SyntaxKind, TERMINAL_COUNT};

// Lookahead sets are bitsets over terminals.
const _: () = assert!(TERMINAL_COUNT <= 128);

/// Index of a parse state
pub type StateId = u16;

const NO_STATE: StateId = StateId::MAX;

/// A parse action for a (state, terminal) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Shift(StateId),
    Reduce(RuleId),
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TermSet(u128);

impl TermSet {
    fn single(kind: SyntaxKind) -> Self {
        TermSet(1 << kind as u32)
    }

    fn insert(&mut self, terminal: usize) {
        self.0 |= 1 << terminal;
    }

    /// Union `other` into `self`, reporting whether anything was added.
    fn union(&mut self, other: TermSet) -> bool {
        let before = self.0;
        self.0 |= other.0;
        self.0 != before
    }

    fn iter(self) -> impl Iterator<Item = usize> {
        (0..TERMINAL_COUNT).filter(move |&t| self.0 & (1 << t) != 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    rule: RuleId,
    dot: u16,
}

type Kernel = Vec<(Item, TermSet)>;

/// Compiled action and goto tables.
#[derive(Debug, Clone)]
pub struct ParseTable {
    state_count: usize,
    nonterminal_count: usize,
    /// `(offset, len)` into `actions`, per `state * TERMINAL_COUNT + terminal`
    cells: Vec<(u32, u32)>,
    actions: Vec<Action>,
    gotos: Vec<StateId>,
    conflicts: usize,
}

impl ParseTable {
    pub fn build(grammar: &Grammar) -> Result<ParseTable, ConfigError> {
        let builder = TableBuilder::new(grammar);
        let (states, transitions) = builder.item_sets()?;

        let nonterminal_count = grammar.nonterminals().len();
        let mut table = ParseTable {
            state_count: states.len(),
            nonterminal_count,
            cells: Vec::with_capacity(states.len() * TERMINAL_COUNT),
            actions: Vec::new(),
            gotos: vec![NO_STATE; states.len() * nonterminal_count],
            conflicts: 0,
        };

        for (state, kernel) in states.iter().enumerate() {
            for (&symbol, &target) in &transitions[state] {
                if let Some(nt) = symbol.nonterminal_index() {
                    table.gotos[state * nonterminal_count + nt] = target;
                }
            }

            let mut shifts: Vec<Option<ShiftCandidate>> = vec![None; TERMINAL_COUNT];
            let mut reduces: Vec<Vec<ReduceCandidate>> = vec![Vec::new(); TERMINAL_COUNT];
            for (item, lookahead) in builder.closure(kernel) {
                let rule = grammar.rule(item.rule);
                match rule.rhs.get(item.dot as usize) {
                    Some(next) => {
                        let Some(kind) = next.symbol.as_terminal() else {
                            continue;
                        };
                        let target = transitions[state][&next.symbol];
                        let slot = &mut shifts[kind as usize];
                        match slot {
                            Some(shift) => {
                                shift.precedence = shift.precedence.max(rule.precedence);
                                shift.rule = shift.rule.min(item.rule);
                            }
                            None => {
                                *slot = Some(ShiftCandidate {
                                    target,
                                    precedence: rule.precedence,
                                    rule: item.rule,
                                })
                            }
                        }
                    }
                    None => {
                        for terminal in lookahead.iter() {
                            reduces[terminal].push(ReduceCandidate {
                                rule: item.rule,
                                precedence: rule.precedence,
                                assoc: rule.assoc,
                            });
                        }
                    }
                }
            }

            for (shift, reduces) in shifts.into_iter().zip(reduces) {
                let resolved = resolve(shift, reduces);
                if resolved.len() > 1 {
                    table.conflicts += 1;
                }
                let offset = table.actions.len() as u32;
                table.cells.push((offset, resolved.len() as u32));
                table.actions.extend(resolved);
            }
        }

        debug!(
            grammar = grammar.name(),
            states = table.state_count,
            actions = table.actions.len(),
            conflicts = table.conflicts,
            "built parse table"
        );
        Ok(table)
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Number of (state, token) cells that kept more than one action
    pub fn conflict_count(&self) -> usize {
        self.conflicts
    }

    /// Actions for `kind` in `state`, most preferred first.
    pub fn actions(&self, state: StateId, kind: SyntaxKind) -> &[Action] {
        if !kind.is_terminal() {
            return &[];
        }
        let (offset, len) = self.cells[state as usize * TERMINAL_COUNT + kind as usize];
        &self.actions[offset as usize..(offset + len) as usize]
    }

    /// Target state after reducing to `symbol` with `state` uncovered
    pub fn goto(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        let nt = symbol.nonterminal_index()?;
        match self.gotos[state as usize * self.nonterminal_count + nt] {
            NO_STATE => None,
            target => Some(target),
        }
    }

    /// Tokens with at least one action in `state`
    pub fn expected(&self, state: StateId) -> impl Iterator<Item = SyntaxKind> + '_ {
        SyntaxKind::all()
            .filter(|kind| kind.is_terminal())
            .filter(move |&kind| !self.actions(state, kind).is_empty())
    }
}

#[derive(Debug, Clone, Copy)]
struct ShiftCandidate {
    target: StateId,
    precedence: i32,
    /// Earliest rule whose item shifts here, for ordering
    rule: RuleId,
}

#[derive(Debug, Clone, Copy)]
struct ReduceCandidate {
    rule: RuleId,
    precedence: i32,
    assoc: Assoc,
}

/// Resolve one cell, returning the surviving actions in preference order.
fn resolve(shift: Option<ShiftCandidate>, mut reduces: Vec<ReduceCandidate>) -> Vec<Action> {
    if let Some(best) = reduces.iter().map(|r| r.precedence).max() {
        reduces.retain(|r| r.precedence == best);
    }

    let mut candidates: Vec<(i32, RuleId, Action)> = Vec::new();
    let mut keep_shift = shift.is_some();
    for reduce in reduces {
        let keep_reduce = match shift {
            None => true,
            Some(shift) => match reduce.precedence.cmp(&shift.precedence) {
                Ordering::Greater => {
                    keep_shift = false;
                    true
                }
                Ordering::Less => false,
                Ordering::Equal => match reduce.assoc {
                    Assoc::Left => {
                        keep_shift = false;
                        true
                    }
                    Assoc::Right => false,
                    Assoc::None => true,
                },
            },
        };
        if keep_reduce {
            let action = if reduce.rule == 0 {
                Action::Accept
            } else {
                Action::Reduce(reduce.rule)
            };
            candidates.push((reduce.precedence, reduce.rule, action));
        }
    }
    if let (true, Some(shift)) = (keep_shift, shift) {
        candidates.push((shift.precedence, shift.rule, Action::Shift(shift.target)));
    }

    candidates.sort_by_key(|&(precedence, rule, _)| (Reverse(precedence), rule));
    candidates.into_iter().map(|(_, _, action)| action).collect()
}

struct TableBuilder<'g> {
    grammar: &'g Grammar,
    by_lhs: Vec<Vec<RuleId>>,
    nullable: Vec<bool>,
    first: Vec<TermSet>,
}

impl<'g> TableBuilder<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let count = grammar.nonterminals().len();
        let mut by_lhs = vec![Vec::new(); count];
        for (id, rule) in grammar.rules().iter().enumerate() {
            if let Some(nt) = rule.lhs.nonterminal_index() {
                by_lhs[nt].push(id as RuleId);
            }
        }

        let mut builder = TableBuilder {
            grammar,
            by_lhs,
            nullable: vec![false; count],
            first: vec![TermSet::default(); count],
        };
        builder.compute_first_sets();
        builder
    }

    fn compute_first_sets(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for rule in self.grammar.rules() {
                let Some(lhs) = rule.lhs.nonterminal_index() else {
                    continue;
                };
                let (first, nullable) = self.first_of(&rule.rhs);
                changed |= self.first[lhs].union(first);
                if nullable && !self.nullable[lhs] {
                    self.nullable[lhs] = true;
                    changed = true;
                }
            }
        }
    }

    /// FIRST set of a symbol sequence, and whether it can derive nothing
    fn first_of(&self, items: &[RhsItem]) -> (TermSet, bool) {
        let mut set = TermSet::default();
        for item in items {
            match item.symbol.nonterminal_index() {
                None => {
                    set.insert(item.symbol.as_terminal().map_or(0, |k| k as usize));
                    return (set, false);
                }
                Some(nt) => {
                    set.union(self.first[nt]);
                    if !self.nullable[nt] {
                        return (set, false);
                    }
                }
            }
        }
        (set, true)
    }

    fn closure(&self, kernel: &[(Item, TermSet)]) -> BTreeMap<Item, TermSet> {
        let mut items: BTreeMap<Item, TermSet> = kernel.iter().copied().collect();
        let mut work: Vec<Item> = items.keys().copied().collect();
        while let Some(item) = work.pop() {
            let lookahead = items[&item];
            let rule = self.grammar.rule(item.rule);
            let Some(next) = rule.rhs.get(item.dot as usize) else {
                continue;
            };
            let Some(nt) = next.symbol.nonterminal_index() else {
                continue;
            };
            let (mut follow, nullable) = self.first_of(&rule.rhs[item.dot as usize + 1..]);
            if nullable {
                follow.union(lookahead);
            }
            for &rule in &self.by_lhs[nt] {
                let derived = Item { rule, dot: 0 };
                match items.entry(derived) {
                    Entry::Vacant(entry) => {
                        entry.insert(follow);
                        work.push(derived);
                    }
                    Entry::Occupied(mut entry) => {
                        if entry.get_mut().union(follow) {
                            work.push(derived);
                        }
                    }
                }
            }
        }
        items
    }

    /// Build the LALR(1) item sets and their transitions.
    fn item_sets(&self) -> Result<(Vec<Kernel>, Vec<BTreeMap<Symbol, StateId>>), ConfigError> {
        let initial = vec![(Item { rule: 0, dot: 0 }, TermSet::single(SyntaxKind::EOF))];
        let mut index: IndexMap<Vec<Item>, usize> = IndexMap::new();
        index.insert(vec![Item { rule: 0, dot: 0 }], 0);
        let mut states: Vec<Kernel> = vec![initial];
        let mut transitions: Vec<BTreeMap<Symbol, StateId>> = vec![BTreeMap::new()];
        let mut queued = vec![true];
        let mut queue = VecDeque::from([0usize]);

        while let Some(state) = queue.pop_front() {
            queued[state] = false;
            let mut successors: BTreeMap<Symbol, BTreeMap<Item, TermSet>> = BTreeMap::new();
            for (item, lookahead) in self.closure(&states[state]) {
                let rule = self.grammar.rule(item.rule);
                if let Some(next) = rule.rhs.get(item.dot as usize) {
                    let advanced = Item {
                        rule: item.rule,
                        dot: item.dot + 1,
                    };
                    successors
                        .entry(next.symbol)
                        .or_default()
                        .entry(advanced)
                        .or_default()
                        .union(lookahead);
                }
            }

            for (symbol, kernel) in successors {
                let core: Vec<Item> = kernel.keys().copied().collect();
                let target = match index.get(&core) {
                    Some(&target) => {
                        let mut changed = false;
                        for (item, lookahead) in states[target].iter_mut() {
                            changed |= lookahead.union(kernel[item]);
                        }
                        if changed && !queued[target] {
                            queued[target] = true;
                            queue.push_back(target);
                        }
                        target
                    }
                    None => {
                        let target = states.len();
                        if target >= NO_STATE as usize {
                            return Err(ConfigError::TooManyStates(target));
                        }
                        states.push(kernel.into_iter().collect());
                        index.insert(core, target);
                        transitions.push(BTreeMap::new());
                        queued.push(true);
                        queue.push_back(target);
                        target
                    }
                };
                transitions[state].insert(symbol, target as StateId);
            }
        }

        Ok((states, transitions))
    }
}
