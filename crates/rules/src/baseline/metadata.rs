//! Project metadata consumed by the composer: author tables, keyword titles
//! and the platform version file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::authors::{parse_authors, DEFAULT_AUTHORS};

/// Errors loading project metadata files.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Author table for one keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorEntry {
    #[serde(default)]
    pub preamble: Option<String>,
    #[serde(default)]
    pub names: Vec<String>,
}

/// `includes/mscp-data.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectData {
    #[serde(default)]
    pub authors: HashMap<String, AuthorEntry>,
    #[serde(default)]
    pub titles: HashMap<String, String>,
}

impl ProjectData {
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        load_yaml(path)
    }

    /// Rendered author block for `keyword`, or the empty name/organization table.
    pub fn authors_for(&self, keyword: &str) -> String {
        match self.authors.get(keyword) {
            Some(entry) => parse_authors(entry),
            None => {
                debug!(keyword, "no authors listed for keyword");
                DEFAULT_AUTHORS.to_string()
            }
        }
    }

    /// Display title for `keyword`. Tailored baselines always use the keyword.
    pub fn title_for(&self, keyword: &str, tailored: bool) -> String {
        if tailored {
            return keyword.to_string();
        }
        self.titles
            .get(keyword)
            .cloned()
            .unwrap_or_else(|| keyword.to_string())
    }
}

/// `VERSION.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionInfo {
    #[serde(deserialize_with = "scalar_string")]
    pub platform: String,
    #[serde(deserialize_with = "scalar_string")]
    pub os: String,
    #[serde(default)]
    pub cpe: Option<String>,
}

impl VersionInfo {
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        load_yaml(path)
    }

    /// `"<platform> <os>"`, e.g. `macOS 15.0`.
    pub fn platform_os(&self) -> String {
        format!("{} {}", self.platform, self.os)
    }
}

/// Accept `os: 15.0` as well as `os: "15.0"`.
fn scalar_string<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {:?}",
            other
        ))),
    }
}

pub(crate) fn load_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, MetadataError> {
    let contents = fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| MetadataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
