//! Durable overlay store: one partial rule document per customized rule id.
//!
//! Presence of `<id>.yaml` means the rule has at least one operator override;
//! absence means it is fully default. Empty overlays are never left on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::schema::{DocumentError, OdvValue, RuleDocument, CUSTOM_ODV_KEY};

use super::scan::find_by_stem;

/// Errors raised by overlay store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem I/O error on a specific path.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing overlay document could not be parsed.
    #[error("invalid overlay document {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    /// The overlay document could not be serialized.
    #[error("YAML serialize error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The rule id cannot be used as a file name.
    #[error("rule id '{0}' cannot be used as an overlay file name")]
    InvalidId(String),
}

/// What [`OverlayStore::reconcile`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// The overlay document was created or replaced.
    Written(PathBuf),
    /// The overlay document became empty and was deleted.
    Removed(PathBuf),
    /// Nothing on disk needed to change.
    Unchanged,
}

/// Filesystem-backed overlay store rooted at the custom rules directory.
#[derive(Debug, Clone)]
pub struct OverlayStore {
    dir: PathBuf,
}

impl OverlayStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the overlay for `id`: an existing file anywhere under the
    /// store, or `<dir>/<id>.yaml` for a new one.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(find_by_stem(&self.dir, id).unwrap_or_else(|| self.dir.join(format!("{}.yaml", id))))
    }

    /// Read the overlay for `id`, if one exists.
    pub fn read(&self, id: &str) -> Result<Option<RuleDocument>, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let doc = RuleDocument::from_yaml(&contents)
            .map_err(|source| StoreError::Document { path, source })?;
        Ok(Some(doc))
    }

    /// Make the stored overlay for `id` equal `overrides`.
    ///
    /// Non-empty overrides are written (unless already identical on disk);
    /// empty overrides delete any existing file. Safe to call repeatedly.
    /// An existing overlay that cannot be parsed is replaced or deleted.
    pub fn reconcile(&self, id: &str, overrides: &RuleDocument) -> Result<Reconciled, StoreError> {
        let path = self.path_for(id)?;

        if overrides.is_empty() {
            if !path.exists() {
                return Ok(Reconciled::Unchanged);
            }
            fs::remove_file(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            info!(rule_id = %id, path = %path.display(), "removed overlay");
            return Ok(Reconciled::Removed(path));
        }

        if self.read_replaceable(id)?.as_ref() == Some(overrides) {
            debug!(rule_id = %id, "overlay already up to date");
            return Ok(Reconciled::Unchanged);
        }

        self.write_atomic(&path, overrides)?;
        info!(rule_id = %id, path = %path.display(), "wrote overlay");
        Ok(Reconciled::Written(path))
    }

    /// Set `odv: {custom: value}` in the overlay for `id`, keeping other overrides.
    pub fn set_custom_odv(&self, id: &str, value: &OdvValue) -> Result<Reconciled, StoreError> {
        let mut doc = self.read_replaceable(id)?.unwrap_or_default();
        let mut odv = serde_yaml::Mapping::new();
        odv.insert(serde_yaml::Value::from(CUSTOM_ODV_KEY), value.to_yaml());
        doc.odv = Some(serde_yaml::Value::Mapping(odv));
        self.reconcile(id, &doc)
    }

    /// Drop the `odv` override for `id`; deletes the file when nothing else remains.
    pub fn clear_odv(&self, id: &str) -> Result<Reconciled, StoreError> {
        let mut doc = self.read_replaceable(id)?.unwrap_or_default();
        doc.odv = None;
        self.reconcile(id, &doc)
    }

    /// Like [`read`](Self::read), but an unparseable overlay counts as absent
    /// so the next write replaces it.
    fn read_replaceable(&self, id: &str) -> Result<Option<RuleDocument>, StoreError> {
        match self.read(id) {
            Err(StoreError::Document { path, source }) => {
                warn!(rule_id = %id, path = %path.display(), error = %source, "replacing unreadable overlay");
                Ok(None)
            }
            other => other,
        }
    }

    /// Write to a dotted `.tmp` sibling first, then rename over the final path,
    /// so a crash leaves at most this one overlay incomplete.
    fn write_atomic(&self, path: &Path, doc: &RuleDocument) -> Result<(), StoreError> {
        let parent = path.parent().unwrap_or(&self.dir);
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("overlay.yaml");
        let tmp_path = parent.join(format!(".{}.tmp", file_name));

        let yaml = doc.to_yaml()?;
        fs::write(&tmp_path, yaml).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']) {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, OverlayStore) {
        let dir = TempDir::new().expect("create tempdir");
        let store = OverlayStore::new(dir.path().join("custom").join("rules"));
        (dir, store)
    }

    #[test]
    fn set_custom_odv_creates_overlay() {
        let (_dir, store) = temp_store();
        let outcome = store.set_custom_odv("auth_pw_1", &OdvValue::Integer(20)).unwrap();

        let path = store.dir().join("auth_pw_1.yaml");
        assert_eq!(outcome, Reconciled::Written(path.clone()));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("---\n"));

        let doc = store.read("auth_pw_1").unwrap().unwrap();
        assert_eq!(doc.custom_odv(), Some(&serde_yaml::Value::from(20)));
        assert!(doc.title.is_none());
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let (_dir, store) = temp_store();
        store.set_custom_odv("a", &OdvValue::Boolean(true)).unwrap();
        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.yaml"]);
    }

    #[test]
    fn rewriting_same_value_is_unchanged() {
        let (_dir, store) = temp_store();
        store.set_custom_odv("a", &OdvValue::Integer(3)).unwrap();
        let again = store.set_custom_odv("a", &OdvValue::Integer(3)).unwrap();
        assert_eq!(again, Reconciled::Unchanged);
    }

    #[test]
    fn clear_odv_deletes_empty_overlay_idempotently() {
        let (_dir, store) = temp_store();
        store.set_custom_odv("a", &OdvValue::Text("x".into())).unwrap();

        let first = store.clear_odv("a").unwrap();
        assert!(matches!(first, Reconciled::Removed(_)));
        assert!(store.read("a").unwrap().is_none());

        let second = store.clear_odv("a").unwrap();
        assert_eq!(second, Reconciled::Unchanged);
    }

    #[test]
    fn clear_odv_keeps_other_overrides() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.dir().join("a.yaml"),
            "---\ntitle: Custom title\nodv:\n  custom: 5\n",
        )
        .unwrap();

        let outcome = store.clear_odv("a").unwrap();
        assert!(matches!(outcome, Reconciled::Written(_)));

        let doc = store.read("a").unwrap().unwrap();
        assert_eq!(doc.title.as_deref(), Some("Custom title"));
        assert!(doc.odv.is_none());
    }

    #[test]
    fn reconcile_empty_without_file_is_unchanged() {
        let (_dir, store) = temp_store();
        let outcome = store.reconcile("a", &RuleDocument::default()).unwrap();
        assert_eq!(outcome, Reconciled::Unchanged);
        assert!(!store.dir().exists());
    }

    #[test]
    fn nested_overlay_is_found_and_updated_in_place() {
        let (_dir, store) = temp_store();
        let nested = store.dir().join("auth");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("a.yml"), "odv:\n  custom: 1\n").unwrap();

        assert_eq!(store.path_for("a").unwrap(), nested.join("a.yml"));
        store.set_custom_odv("a", &OdvValue::Integer(2)).unwrap();

        assert!(!store.dir().join("a.yaml").exists());
        let doc = store.read("a").unwrap().unwrap();
        assert_eq!(doc.custom_odv(), Some(&serde_yaml::Value::from(2)));
    }

    #[test]
    fn unreadable_overlay_is_replaced_or_removed() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.dir()).unwrap();
        let path = store.dir().join("a.yaml");
        fs::write(&path, "odv: [unclosed\n").unwrap();
        assert!(matches!(store.read("a"), Err(StoreError::Document { .. })));

        let outcome = store.set_custom_odv("a", &OdvValue::Integer(7)).unwrap();
        assert_eq!(outcome, Reconciled::Written(path.clone()));
        assert_eq!(
            store.read("a").unwrap().unwrap().custom_odv(),
            Some(&serde_yaml::Value::from(7))
        );

        fs::write(&path, "odv: [unclosed\n").unwrap();
        assert_eq!(store.clear_odv("a").unwrap(), Reconciled::Removed(path.clone()));
        assert!(!path.exists());
    }

    #[test]
    fn reconcile_empty_deletes_unreadable_overlay() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.dir()).unwrap();
        let path = store.dir().join("a.yaml");
        fs::write(&path, "- not\n- a rule\n").unwrap();

        let outcome = store.reconcile("a", &RuleDocument::default()).unwrap();
        assert_eq!(outcome, Reconciled::Removed(path.clone()));
        assert!(!path.exists());
    }

    #[test]
    fn path_like_ids_are_rejected() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.path_for("../etc/passwd"), Err(StoreError::InvalidId(_))));
        assert!(matches!(store.path_for(".hidden"), Err(StoreError::InvalidId(_))));
        assert!(matches!(store.path_for(""), Err(StoreError::InvalidId(_))));
    }
}
