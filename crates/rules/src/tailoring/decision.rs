//! Inclusion decisions, kept free of console I/O.

use std::collections::HashSet;

use crate::schema::{RuleRecord, TAG_INHERENT};

/// What happens to a rule before (or instead of) asking the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Include the rule; `ask_odv` says whether the ODV step follows.
    Include { ask_odv: bool },
    /// Leave the rule out of the baseline.
    Exclude,
    /// Ask the operator.
    Prompt,
}

/// An operator answer to the inclusion prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Include,
    Exclude,
    IncludeAll,
    Detail,
}

impl Choice {
    /// The token the operator types for this choice.
    pub fn token(self) -> &'static str {
        match self {
            Choice::Include => "y",
            Choice::Exclude => "n",
            Choice::IncludeAll => "all",
            Choice::Detail => "?",
        }
    }
}

/// Mutable state of one tailoring pass.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Set once the operator answers `all`; every later rule is included.
    pub include_all: bool,
    /// Ids already decided in this pass.
    pub decided: HashSet<String>,
}

impl SessionState {
    /// Record `id` as decided. Returns false when it already was.
    pub fn mark_decided(&mut self, id: &str) -> bool {
        self.decided.insert(id.to_string())
    }

    /// Fold an operator answer into a decision, updating `include_all`.
    ///
    /// `Detail` is not a decision; callers re-prompt after showing the rule.
    pub fn apply(&mut self, choice: Choice) -> Decision {
        match choice {
            Choice::Include => Decision::Include { ask_odv: true },
            Choice::Exclude => Decision::Exclude,
            Choice::IncludeAll => {
                self.include_all = true;
                Decision::Include { ask_odv: true }
            }
            Choice::Detail => Decision::Prompt,
        }
    }
}

/// Decide a rule without operator input where possible.
///
/// Mandatory (`inherent`) rules are always included and never get the ODV
/// step. After `all`, every rule is included and goes through the ODV step.
pub fn decide(rule: &RuleRecord, state: &SessionState) -> Decision {
    if rule.has_tag(TAG_INHERENT) {
        Decision::Include { ask_odv: false }
    } else if state.include_all {
        Decision::Include { ask_odv: true }
    } else {
        Decision::Prompt
    }
}
