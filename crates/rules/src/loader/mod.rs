//! Filesystem corpus loader with custom overlay resolution.
//!
//! Scans the rules directory and the custom overlay directory for YAML
//! documents, merges each base rule with its overlay field by field, and
//! completes the result into schema-complete [`RuleRecord`](crate::schema::RuleRecord)s.
//! Operator overrides are persisted back through the [`OverlayStore`].

mod core;
mod error;
mod overlay;
mod scan;
mod store;

#[cfg(test)]
mod tests;

pub use self::core::{assemble, Corpus, CorpusLoader, SourceDocument};
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
pub use self::overlay::{resolve, Resolution};
pub use self::store::{OverlayStore, Reconciled, StoreError};
