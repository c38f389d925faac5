//! NIST 800-53 control coverage of a rule corpus.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::baseline::{load_yaml, MetadataError};
use crate::schema::RuleRecord;

const NO_CONTROL: &str = "None";

/// Control lists per impact level, from `includes/800-53_baselines.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControlCatalog {
    #[serde(default)]
    pub low: Vec<String>,
    #[serde(default)]
    pub moderate: Vec<String>,
    #[serde(default)]
    pub high: Vec<String>,
}

impl ControlCatalog {
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        load_yaml(path)
    }

    /// Controls required at `level` (`low`, `moderate` or `high`).
    pub fn level(&self, level: &str) -> Option<&[String]> {
        match level {
            "low" => Some(&self.low),
            "moderate" => Some(&self.moderate),
            "high" => Some(&self.high),
            _ => None,
        }
    }
}

/// Every 800-53r4 control referenced by `rules`, sorted.
pub fn covered_controls(rules: &[RuleRecord]) -> BTreeSet<String> {
    rules
        .iter()
        .flat_map(|r| r.references.nist_800_53r4.iter())
        .filter(|c| c.as_str() != NO_CONTROL)
        .cloned()
        .collect()
}

/// Controls in `required` that no rule covers, de-duplicated in first-seen order.
pub fn missing_controls(required: &[String], rules: &[RuleRecord]) -> Vec<String> {
    let covered = covered_controls(rules);
    let mut seen = HashSet::new();
    required
        .iter()
        .filter(|c| seen.insert(c.as_str()))
        .filter(|c| !covered.contains(c.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RuleDocument;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn rule(yaml: &str) -> RuleRecord {
        RuleRecord::from_resolved(RuleDocument::from_yaml(yaml).unwrap(), Vec::new(), Path::new("r.yaml"))
    }

    fn corpus() -> Vec<RuleRecord> {
        vec![
            rule("id: a\nreferences:\n  800-53r4: [AC-2, IA-5]\n"),
            rule("id: b\nreferences:\n  800-53r4: [IA-5, CM-6]\n"),
            rule("id: c\n"),
        ]
    }

    #[test]
    fn covered_controls_skip_placeholder() {
        let covered: Vec<String> = covered_controls(&corpus()).into_iter().collect();
        assert_eq!(covered, vec!["AC-2", "CM-6", "IA-5"]);
    }

    #[test]
    fn missing_controls_keep_first_seen_order() {
        let required: Vec<String> = ["SC-7", "AC-2", "AU-2", "SC-7", "IA-5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(missing_controls(&required, &corpus()), vec!["SC-7", "AU-2"]);
    }

    #[test]
    fn catalog_levels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("800-53_baselines.yaml");
        fs::write(&path, "low:\n  - AC-1\n  - AC-2\nmoderate:\n  - AC-1\n").unwrap();

        let catalog = ControlCatalog::load(&path).unwrap();
        assert_eq!(catalog.level("low").unwrap().len(), 2);
        assert_eq!(catalog.level("moderate").unwrap(), ["AC-1".to_string()]);
        assert!(catalog.level("high").unwrap().is_empty());
        assert!(catalog.level("extreme").is_none());
    }
}
