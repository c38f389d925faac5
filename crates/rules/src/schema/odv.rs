//! Organization-defined values (ODVs) attached to a rule.

use std::collections::BTreeMap;
use std::fmt;

use super::MISSING;

/// Key holding the operator-supplied value in an overlay document.
pub const CUSTOM_ODV_KEY: &str = "custom";

/// Key holding the catalog default used by the `recommended` benchmark.
pub const RECOMMENDED_ODV_KEY: &str = "recommended";

const HINT_KEY: &str = "hint";

/// A single typed ODV value.
///
/// The variant of the benchmark default decides how operator input is parsed
/// during tailoring.
#[derive(Debug, Clone, PartialEq)]
pub enum OdvValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl OdvValue {
    /// Convert a scalar YAML value. Sequences, mappings and nulls have no ODV form.
    pub fn from_yaml(value: &serde_yaml::Value) -> Option<Self> {
        match value {
            serde_yaml::Value::Bool(b) => Some(Self::Boolean(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Integer(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            serde_yaml::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Convert back into a YAML value for persistence.
    pub fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            Self::Integer(i) => serde_yaml::Value::from(*i),
            Self::Float(f) => serde_yaml::Value::from(*f),
            Self::Boolean(b) => serde_yaml::Value::Bool(*b),
            Self::Text(s) => serde_yaml::Value::String(s.clone()),
        }
    }

    /// Human-readable name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Text(_) => "string",
        }
    }
}

impl fmt::Display for OdvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// The ODV block of a resolved rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Odv {
    /// The rule has no ODV (absent, or the literal `missing` sentinel).
    Missing,
    /// Values keyed by benchmark identity (plus `recommended` and `custom`).
    Values {
        entries: BTreeMap<String, OdvValue>,
        hint: Option<String>,
    },
}

impl Odv {
    /// Build from the raw `odv` field of a resolved document.
    ///
    /// Entries whose values are not scalars are dropped.
    pub fn from_yaml(value: Option<&serde_yaml::Value>) -> Self {
        let Some(mapping) = value.and_then(|v| v.as_mapping()) else {
            return Self::Missing;
        };

        let mut entries = BTreeMap::new();
        let mut hint = None;
        for (key, value) in mapping {
            let Some(key) = key.as_str() else {
                continue;
            };
            if key == HINT_KEY {
                hint = value.as_str().map(str::to_string);
                continue;
            }
            match OdvValue::from_yaml(value) {
                Some(v) => {
                    entries.insert(key.to_string(), v);
                }
                None => tracing::debug!(key = %key, "ignoring non-scalar odv entry"),
            }
        }

        Self::Values { entries, hint }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&OdvValue> {
        match self {
            Self::Missing => None,
            Self::Values { entries, .. } => entries.get(key),
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Missing => None,
            Self::Values { hint, .. } => hint.as_deref(),
        }
    }

    /// The operator's custom value, if an overlay supplied one.
    pub fn custom(&self) -> Option<&OdvValue> {
        self.get(CUSTOM_ODV_KEY)
    }
}

impl fmt::Display for Odv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "{}", MISSING),
            Self::Values { entries, .. } => {
                let parts: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}
