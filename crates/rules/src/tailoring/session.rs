//! The interactive tailoring pass over a filtered rule list.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::benchmark::Benchmark;
use crate::loader::{OverlayStore, Reconciled, StoreError};
use crate::schema::{OdvValue, RuleRecord};

use super::decision::{decide, Choice, Decision, SessionState};
use super::input::{parse_choice, parse_odv, InputError};
use super::prompter::Prompter;

const FULL_CHOICES: [Choice; 4] = [Choice::Include, Choice::Exclude, Choice::IncludeAll, Choice::Detail];
const NARROW_CHOICES: [Choice; 3] = [Choice::Include, Choice::Exclude, Choice::IncludeAll];

/// Errors that end a tailoring session.
#[derive(Debug, thiserror::Error)]
pub enum TailorError {
    /// The operator console failed or reached end of input.
    #[error("operator console error: {0}")]
    Console(#[from] std::io::Error),
}

/// A change made to the overlay store during the session.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayChange {
    /// A custom ODV was persisted.
    Written {
        rule_id: String,
        value: OdvValue,
        path: PathBuf,
    },
    /// The rule's overlay was removed (returned to default).
    Removed { rule_id: String, path: PathBuf },
    /// Persisting the decision failed; the session carried on.
    Failed { rule_id: String, error: String },
}

/// Result of a tailoring pass.
///
/// `included` holds the records as loaded: ODV choices made in this pass only
/// show up after the corpus is loaded again.
#[derive(Debug, Default)]
pub struct TailoringOutcome {
    pub included: Vec<RuleRecord>,
    pub changes: Vec<OverlayChange>,
}

/// One interactive tailoring pass.
pub struct TailoringSession<'a, P: Prompter> {
    store: &'a OverlayStore,
    prompter: &'a mut P,
    benchmark: Benchmark,
    state: SessionState,
    changes: Vec<OverlayChange>,
}

impl<'a, P: Prompter> TailoringSession<'a, P> {
    pub fn new(store: &'a OverlayStore, prompter: &'a mut P, benchmark: Benchmark) -> Self {
        Self {
            store,
            prompter,
            benchmark,
            state: SessionState::default(),
            changes: Vec::new(),
        }
    }

    /// Walk `rules` in order, deciding inclusion and ODV values.
    pub fn run(mut self, rules: &[RuleRecord]) -> Result<TailoringOutcome, TailorError> {
        self.prompter.say(
            "Rule inclusion is a risk-based decision (RBD). Each rule maps to an 800-53 control.",
        )?;
        if !self.benchmark.is_recommended() {
            self.prompter
                .warn("WARNING: Modifying an established benchmark may affect compliance.")?;
        }

        let mut included = Vec::new();
        for rule in rules {
            if !self.state.mark_decided(&rule.id) {
                continue;
            }

            let mut decision = decide(rule, &self.state);
            while decision == Decision::Prompt {
                decision = self.ask_inclusion(rule)?;
            }

            match decision {
                Decision::Include { ask_odv } => {
                    included.push(rule.clone());
                    if ask_odv {
                        self.odv_step(rule)?;
                    }
                }
                Decision::Exclude => self.forget_odv(rule)?,
                Decision::Prompt => {}
            }
        }

        info!(
            included = included.len(),
            changes = self.changes.len(),
            benchmark = %self.benchmark,
            "tailoring session finished"
        );
        Ok(TailoringOutcome {
            included,
            changes: self.changes,
        })
    }

    fn ask_inclusion(&mut self, rule: &RuleRecord) -> Result<Decision, TailorError> {
        let prompt = format!("Include rule \"{}\" in your benchmark? [Y/n/all/?]: ", rule.id);
        let mut choice = self.ask_until_valid(&prompt, |s| parse_choice(s, &FULL_CHOICES))?;

        if choice == Choice::Detail {
            self.prompter.say(&format!("Rule Details: \n{}", rule.discussion))?;
            let prompt = format!("Include rule \"{}\" in your benchmark? [Y/n/all]: ", rule.id);
            choice = self.ask_until_valid(&prompt, |s| parse_choice(s, &NARROW_CHOICES))?;
        }

        Ok(self.state.apply(choice))
    }

    /// Offer the benchmark default for an included rule and persist the answer.
    fn odv_step(&mut self, rule: &RuleRecord) -> Result<(), TailorError> {
        let Some(default) = rule.base_odv.get(self.benchmark.odv_key()) else {
            return Ok(());
        };
        let current = rule.odv.custom().unwrap_or(default);

        self.prompter.say(&format!(
            "\n{}",
            rule.base_odv.hint().unwrap_or("No hint available")
        ))?;
        let prompt = if current == default {
            format!("Enter ODV for \"{}\" (default: {}): ", rule.id, default)
        } else {
            format!(
                "Enter ODV for \"{}\" (default: {}, current: {}): ",
                rule.id, default, current
            )
        };
        // Input takes the default's type, whatever type the current value has.
        let value = self.ask_until_valid(&prompt, |s| {
            if s.trim().is_empty() {
                Ok(current.clone())
            } else {
                parse_odv(s, default)
            }
        })?;

        if &value != default {
            let outcome = self.store.set_custom_odv(&rule.id, &value);
            self.record(rule, Some(value), outcome)
        } else {
            let outcome = self.store.clear_odv(&rule.id);
            self.record(rule, None, outcome)
        }
    }

    /// An excluded rule keeps no custom value.
    fn forget_odv(&mut self, rule: &RuleRecord) -> Result<(), TailorError> {
        let outcome = self.store.clear_odv(&rule.id);
        self.record(rule, None, outcome)
    }

    fn record(
        &mut self,
        rule: &RuleRecord,
        value: Option<OdvValue>,
        outcome: Result<Reconciled, StoreError>,
    ) -> Result<(), TailorError> {
        let rule_id = rule.id.clone();
        match (outcome, value) {
            (Ok(Reconciled::Written(path)), Some(value)) => {
                self.prompter
                    .say(&format!("Created custom rule {} with value {}", rule_id, value))?;
                self.changes.push(OverlayChange::Written { rule_id, value, path });
            }
            (Ok(Reconciled::Written(path)), None) => {
                // Other overrides remain; only the odv entry went away.
                self.prompter
                    .say(&format!("Removed custom value for rule {}", rule_id))?;
                self.changes.push(OverlayChange::Removed { rule_id, path });
            }
            (Ok(Reconciled::Removed(path)), _) => {
                self.prompter
                    .say(&format!("Removed custom rule {}", rule_id))?;
                self.changes.push(OverlayChange::Removed { rule_id, path });
            }
            (Ok(Reconciled::Unchanged), _) => {}
            (Err(e), _) => {
                warn!(rule_id = %rule_id, error = %e, "failed to persist tailoring decision");
                self.prompter
                    .warn(&format!("Error writing custom rule {}: {}", rule_id, e))?;
                self.changes.push(OverlayChange::Failed {
                    rule_id,
                    error: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Prompt until `parse` accepts the answer. Invalid input never ends the session.
    fn ask_until_valid<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> Result<T, TailorError> {
        loop {
            let answer = self.prompter.ask(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    self.prompter
                        .warn(&format!("Invalid input: {}. Please try again.", e))?;
                }
            }
        }
    }
}
