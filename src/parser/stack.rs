//! GLR stack versions

use std::cmp::{Ordering, Reverse};

use text_size::TextSize;

use super::grammar::StateId;
use crate::tree::Child;

/// One shifted or reduced symbol on a parse stack
#[derive(Debug, Clone)]
pub(crate) struct StackEntry {
    pub state: StateId,
    /// Offset of the first child, leading trivia included
    pub start: TextSize,
    /// What the symbol contributes to its parent: a single node for
    /// visible symbols, the spliced children for hidden ones
    pub children: Vec<Child>,
}

impl StackEntry {
    pub fn bottom() -> Self {
        Self {
            state: 0,
            start: TextSize::new(0),
            children: Vec::new(),
        }
    }
}

/// One alternative parse
#[derive(Debug, Clone)]
pub(crate) struct Version {
    pub stack: Vec<StackEntry>,
    pub error_cost: u32,
    pub dynamic_precedence: i32,
    /// Alternative taken at every fork, in order
    pub signature: Vec<u16>,
}

impl Version {
    pub fn new() -> Self {
        Self {
            stack: vec![StackEntry::bottom()],
            error_cost: 0,
            dynamic_precedence: 0,
            signature: Vec::new(),
        }
    }

    pub fn top(&self) -> StateId {
        match self.stack.last() {
            Some(entry) => entry.state,
            None => unreachable!("parse stack lost its bottom entry"),
        }
    }

    pub fn top_entry(&mut self) -> &mut StackEntry {
        match self.stack.last_mut() {
            Some(entry) => entry,
            None => unreachable!("parse stack lost its bottom entry"),
        }
    }

    pub fn states(&self) -> Vec<StateId> {
        self.stack.iter().map(|entry| entry.state).collect()
    }

    pub fn same_states(&self, other: &Version) -> bool {
        self.stack.len() == other.stack.len()
            && self
                .stack
                .iter()
                .zip(&other.stack)
                .all(|(a, b)| a.state == b.state)
    }

    /// Preference order: fewer errors, then higher dynamic precedence, then
    /// the earlier alternatives at each fork.
    pub fn cmp_preference(&self, other: &Version) -> Ordering {
        (
            self.error_cost,
            Reverse(self.dynamic_precedence),
            &self.signature,
        )
            .cmp(&(
                other.error_cost,
                Reverse(other.dynamic_precedence),
                &other.signature,
            ))
    }
}

/// Sort by preference, merge versions with equal state stacks, and keep at
/// most `max` of them. Returns how many versions were merged away.
pub(crate) fn condense(versions: &mut Vec<Version>, max: usize) -> usize {
    versions.sort_by(Version::cmp_preference);
    let before = versions.len();
    let mut kept: Vec<Version> = Vec::with_capacity(versions.len());
    for version in versions.drain(..) {
        if !kept.iter().any(|k| k.same_states(&version)) {
            kept.push(version);
        }
    }
    let merged = before - kept.len();
    kept.truncate(max.max(1));
    *versions = kept;
    merged
}
