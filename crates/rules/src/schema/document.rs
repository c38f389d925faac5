//! Raw rule document as read from a base or overlay YAML file.

use serde::{Deserialize, Serialize};

/// Error raised while turning YAML text into a [`RuleDocument`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The text is not valid YAML or a field has the wrong type.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The YAML parsed but its top level is not a mapping.
    #[error("top-level YAML value must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// A rule document with every field optional.
///
/// Base documents define which fields a rule has; overlay documents use the
/// same schema but usually carry only the handful of fields an operator
/// overrode (typically just `odv`). Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<serde_yaml::Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odv: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobileconfig: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobileconfig_info: Option<serde_yaml::Value>,
}

impl RuleDocument {
    /// Parse a document from YAML text.
    ///
    /// An empty file (YAML `null`) yields an empty document; any other
    /// non-mapping top level is rejected.
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        match value {
            serde_yaml::Value::Null => Ok(Self::default()),
            serde_yaml::Value::Mapping(_) => Ok(serde_yaml::from_value(value)?),
            other => Err(DocumentError::NotAMapping(value_kind(&other))),
        }
    }

    /// Serialize to YAML with an explicit `---` document start.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        let body = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}", body))
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The custom ODV value this document carries, if any.
    pub fn custom_odv(&self) -> Option<&serde_yaml::Value> {
        self.odv.as_ref()?.as_mapping()?.get("custom")
    }
}

fn value_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
