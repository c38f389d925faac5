//! Interactive tailoring of a rule selection.
//!
//! Walks a filtered rule list one rule at a time. Mandatory rules are included
//! silently; otherwise the operator chooses include, exclude, include-all, or
//! asks for the rule's discussion first. Included rules with an ODV get a
//! value prompt, and the answer is persisted as an overlay document that the
//! next corpus load picks up.

mod decision;
mod input;
mod prompter;
mod session;


pub use decision::{decide, Choice, Decision, SessionState};
pub use input::{parse_choice, parse_odv, InputError};
pub use prompter::{Prompter, ScriptedPrompter};
pub use session::{OverlayChange, TailorError, TailoringOutcome, TailoringSession};
