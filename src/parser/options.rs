//! Parser options

use super::keywords::CasePolicy;

/// Options controlling a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// How reserved words are matched
    pub case_policy: CasePolicy,
    /// Maximum number of GLR stack versions kept alive at once
    pub max_versions: usize,
    /// Maximum number of arena layers a tree may stack up through
    /// incremental reparses before a reparse starts a fresh arena
    pub max_arena_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            case_policy: CasePolicy::Insensitive,
            max_versions: 8,
            max_arena_depth: 16,
        }
    }
}

impl ParseOptions {
    pub fn with_case_policy(mut self, case_policy: CasePolicy) -> Self {
        self.case_policy = case_policy;
        self
    }

    pub fn with_max_versions(mut self, max_versions: usize) -> Self {
        self.max_versions = max_versions.max(1);
        self
    }

    pub fn with_max_arena_depth(mut self, max_arena_depth: usize) -> Self {
        self.max_arena_depth = max_arena_depth.max(1);
        self
    }
}
