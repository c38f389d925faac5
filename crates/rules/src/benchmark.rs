//! Benchmark identity: which ODV entry a baseline is tailored against.

use std::fmt;

use crate::schema::RECOMMENDED_ODV_KEY;

/// Established external benchmarks, matched as substrings of the keyword.
pub const ESTABLISHED_BENCHMARKS: [&str; 3] = ["stig", "cis_lvl1", "cis_lvl2"];

/// The standard a baseline is generated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Benchmark {
    /// An established benchmark, named by the full keyword (e.g. `cis_lvl1`).
    Established(String),
    /// The synthetic catalog of recommended settings.
    Recommended,
}

impl Benchmark {
    /// Resolve the benchmark for a tag keyword.
    pub fn from_keyword(keyword: &str) -> Self {
        if ESTABLISHED_BENCHMARKS.iter().any(|b| keyword.contains(b)) {
            Self::Established(keyword.to_string())
        } else {
            Self::Recommended
        }
    }

    pub fn is_recommended(&self) -> bool {
        matches!(self, Self::Recommended)
    }

    /// The key of the `odv` mapping offered as the default.
    pub fn odv_key(&self) -> &str {
        match self {
            Self::Established(name) => name,
            Self::Recommended => RECOMMENDED_ODV_KEY,
        }
    }

    pub fn as_str(&self) -> &str {
        self.odv_key()
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
