//! Rule document schema types with serde deserialization.
//!
//! Defines the two shapes a rule takes on its way through the engine:
//! - `RuleDocument`: the raw, partial document as written on disk (base or overlay)
//! - `RuleRecord`: the resolved, schema-complete record handed to tailoring and composition
//!
//! `Odv` models the organization-defined value block a rule may carry.

mod document;
mod odv;
mod record;

pub use document::*;
pub use odv::*;
pub use record::*;
