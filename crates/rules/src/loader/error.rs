//! Error types and load result structures for the corpus loader.

use std::path::PathBuf;

use crate::schema::DocumentError;

/// Errors that can occur while loading and resolving rule documents.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A base document lacks the structure every rule needs (mapping, `id`).
    #[error("rule integrity error: {0}")]
    Integrity(String),

    /// Two base documents claim the same id.
    #[error("duplicate rule id '{id}' (first defined in {first})")]
    DuplicateId { id: String, first: PathBuf },

    /// An overlay document has no base document to apply to.
    #[error("overlay for '{0}' has no base rule document")]
    OrphanOverlay(String),

    /// The rules directory itself does not exist.
    #[error("rules directory not found: {0}")]
    MissingDirectory(PathBuf),
}

impl From<DocumentError> for RuleError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Parse(e) => RuleError::Parse(e),
            DocumentError::NotAMapping(kind) => {
                RuleError::Integrity(format!("top-level YAML value must be a mapping, found {}", kind))
            }
        }
    }
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Outcome of loading a single rule file.
#[derive(Debug)]
pub struct LoadResult {
    /// Path to the file that was loaded.
    pub path: PathBuf,
    /// Status of the load attempt.
    pub status: LoadStatus,
}

/// Status of a single file load attempt.
#[derive(Debug)]
pub enum LoadStatus {
    /// Base rule was resolved into the corpus.
    Loaded { rule_id: String },
    /// Overlay was applied to its base rule.
    Applied { rule_id: String, customized: Vec<String> },
    /// File was skipped (dotfile, non-YAML, etc.).
    Skipped { reason: String },
    /// Parse, integrity, or precedence error occurred.
    Failed { error: String },
}

impl LoadResult {
    pub(super) fn failed(path: PathBuf, error: &RuleError) -> Self {
        Self {
            path,
            status: LoadStatus::Failed {
                error: error.to_string(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, LoadStatus::Failed { .. })
    }
}
