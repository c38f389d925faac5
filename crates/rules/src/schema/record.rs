//! Resolved rule records: schema-complete, escaped, immutable.

use std::path::{Path, PathBuf};

use super::{Odv, RuleDocument};

/// Sentinel stored in any descriptive field that neither source supplied.
pub const MISSING: &str = "missing";

/// Pseudo-tag every rule implicitly carries at query time.
pub const ALL_RULES: &str = "all_rules";

/// Tag marking a rule as structurally inherent to the platform.
pub const TAG_INHERENT: &str = "inherent";
/// Tag marking a setting that cannot be changed.
pub const TAG_PERMANENT: &str = "permanent";
/// Tag marking a rule that does not apply to the platform.
pub const TAG_NOT_APPLICABLE: &str = "n_a";
/// Tag marking supplemental guidance.
pub const TAG_SUPPLEMENTAL: &str = "supplemental";

/// Reference schemes every record carries, in canonical order.
pub const REFERENCE_SCHEMES: [&str; 5] = ["cci", "cce", "800-53r4", "disa_stig", "srg"];

const NO_REFERENCE: &str = "None";

/// Cross-references of a rule, one list per fixed scheme.
///
/// A scheme missing from the source document defaults to `["None"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct References {
    pub cci: Vec<String>,
    pub cce: Vec<String>,
    pub nist_800_53r4: Vec<String>,
    pub disa_stig: Vec<String>,
    pub srg: Vec<String>,
}

impl Default for References {
    fn default() -> Self {
        Self::from_mapping(None)
    }
}

impl References {
    /// Complete each scheme from the raw `references` mapping.
    pub fn from_mapping(mapping: Option<&serde_yaml::Mapping>) -> Self {
        let scheme = |name: &str| -> Vec<String> {
            mapping
                .and_then(|m| m.get(name))
                .and_then(reference_list)
                .unwrap_or_else(|| vec![NO_REFERENCE.to_string()])
        };
        Self {
            cci: scheme("cci"),
            cce: scheme("cce"),
            nist_800_53r4: scheme("800-53r4"),
            disa_stig: scheme("disa_stig"),
            srg: scheme("srg"),
        }
    }

    /// Look a scheme up by its document key.
    pub fn scheme(&self, name: &str) -> Option<&[String]> {
        match name {
            "cci" => Some(&self.cci),
            "cce" => Some(&self.cce),
            "800-53r4" => Some(&self.nist_800_53r4),
            "disa_stig" => Some(&self.disa_stig),
            "srg" => Some(&self.srg),
            _ => None,
        }
    }
}

fn reference_list(value: &serde_yaml::Value) -> Option<Vec<String>> {
    match value {
        serde_yaml::Value::Sequence(items) => Some(items.iter().filter_map(scalar_string).collect()),
        other => scalar_string(other).map(|s| vec![s]),
    }
}

fn scalar_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Escape `|` so free text can sit inside a pipe-delimited table cell.
pub fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

/// One resolved security rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRecord {
    pub id: String,
    pub title: String,
    pub severity: String,
    pub discussion: String,
    pub check: String,
    pub fix: String,
    pub tags: Vec<String>,
    pub references: References,
    pub odv: Odv,
    /// ODV block of the base document, before any overlay. Tailoring offers
    /// defaults from here so a customized rule can be returned to them.
    pub base_odv: Odv,
    pub result: serde_yaml::Value,
    pub mobileconfig: serde_yaml::Value,
    pub mobileconfig_info: serde_yaml::Value,
    /// Field names an overlay changed, in schema order.
    pub customized: Vec<String>,
    /// Base document this record was resolved from.
    pub source: PathBuf,
}

impl RuleRecord {
    /// Complete a resolved document into a record.
    ///
    /// Absent fields become the `missing` sentinel, references are filled per
    /// scheme, tags are de-duplicated and never left empty, and pipe characters
    /// in free-text fields are escaped.
    pub fn from_resolved(doc: RuleDocument, customized: Vec<String>, source: &Path) -> Self {
        let text = |field: Option<String>| escape_pipes(field.as_deref().unwrap_or(MISSING));
        let opaque = |field: Option<serde_yaml::Value>| {
            field.unwrap_or_else(|| serde_yaml::Value::String(MISSING.to_string()))
        };

        let mut tags: Vec<String> = Vec::new();
        for tag in doc.tags.unwrap_or_default() {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        if tags.is_empty() {
            tags.push(MISSING.to_string());
        }

        Self {
            id: text(doc.id),
            title: text(doc.title),
            severity: text(doc.severity),
            discussion: text(doc.discussion),
            check: text(doc.check),
            fix: text(doc.fix),
            tags,
            references: References::from_mapping(doc.references.as_ref()),
            odv: Odv::from_yaml(doc.odv.as_ref()),
            base_odv: Odv::from_yaml(doc.odv.as_ref()),
            result: opaque(doc.result),
            mobileconfig: opaque(doc.mobileconfig),
            mobileconfig_info: opaque(doc.mobileconfig_info),
            customized,
            source: source.to_path_buf(),
        }
    }

    /// Replace the base ODV block (the resolved document may carry the overlay's).
    pub fn with_base_odv(mut self, base_odv: Odv) -> Self {
        self.base_odv = base_odv;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// True when an overlay changed at least one field.
    pub fn is_customized(&self) -> bool {
        !self.customized.is_empty()
    }
}
