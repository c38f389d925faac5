//! Core [`CorpusLoader`]: discovers base and overlay documents and resolves them
//! into the ordered rule corpus.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::schema::{Odv, RuleDocument, RuleRecord};

use super::error::{LoadResult, LoadStatus, Result, RuleError};
use super::overlay::resolve;
use super::scan::collect_yaml_files;

/// A parsed rule document together with the file it came from.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub document: RuleDocument,
}

impl SourceDocument {
    /// Overlay documents are addressed by file stem, which must equal the rule id.
    fn overlay_key(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// The resolved rule collection plus a per-file load report.
#[derive(Debug, Default)]
pub struct Corpus {
    /// Records ordered by source path, then id.
    pub rules: Vec<RuleRecord>,
    pub report: Vec<LoadResult>,
}

impl Corpus {
    /// True when no rule document could be loaded. Not an error in itself.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn get(&self, id: &str) -> Option<&RuleRecord> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Report entries for documents that were rejected.
    pub fn failures(&self) -> impl Iterator<Item = &LoadResult> {
        self.report.iter().filter(|r| r.is_failure())
    }
}

/// Resolve parsed base and overlay documents into a corpus.
///
/// Bases are processed in path order; a later base reusing an id is rejected.
/// Overlays are matched to bases by file stem; an overlay with no base is
/// rejected. Rejections are logged and reported, never fatal.
pub fn assemble(mut bases: Vec<SourceDocument>, mut overlays: Vec<SourceDocument>) -> Corpus {
    bases.sort_by(|a, b| a.path.cmp(&b.path));
    overlays.sort_by(|a, b| a.path.cmp(&b.path));

    let mut report = Vec::new();

    let mut overlay_by_id: HashMap<String, SourceDocument> = HashMap::new();
    for overlay in overlays {
        let Some(key) = overlay.overlay_key().map(str::to_string) else {
            report.push(LoadResult {
                path: overlay.path,
                status: LoadStatus::Skipped {
                    reason: "overlay file name is not valid UTF-8".to_string(),
                },
            });
            continue;
        };
        if let Some(first) = overlay_by_id.get(&key) {
            let err = RuleError::Integrity(format!(
                "second overlay for '{}' (first is {})",
                key,
                first.path.display()
            ));
            error!(rule_id = %key, path = %overlay.path.display(), "duplicate overlay");
            report.push(LoadResult::failed(overlay.path, &err));
            continue;
        }
        overlay_by_id.insert(key, overlay);
    }

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut rules = Vec::new();

    for base in bases {
        let overlay = base
            .document
            .id
            .as_deref()
            .and_then(|id| overlay_by_id.remove(id));

        let resolution = match resolve(&base.document, overlay.as_ref().map(|o| &o.document)) {
            Ok(r) => r,
            Err(e) => {
                warn!(path = %base.path.display(), error = %e, "failed to resolve rule");
                report.push(LoadResult::failed(base.path, &e));
                continue;
            }
        };

        // resolve() guarantees an id.
        let id = resolution.document.id.clone().unwrap_or_default();
        if let Some(first) = seen.get(&id) {
            let err = RuleError::DuplicateId {
                id: id.clone(),
                first: first.clone(),
            };
            error!(rule_id = %id, path = %base.path.display(), "duplicate rule id");
            report.push(LoadResult::failed(base.path, &err));
            continue;
        }
        seen.insert(id.clone(), base.path.clone());

        if let Some(overlay) = overlay {
            if !resolution.customized.is_empty() {
                info!(rule_id = %id, fields = ?resolution.customized, "custom settings found for rule");
            }
            report.push(LoadResult {
                path: overlay.path,
                status: LoadStatus::Applied {
                    rule_id: id.clone(),
                    customized: resolution.customized.clone(),
                },
            });
        }

        debug!(rule_id = %id, path = %base.path.display(), "loaded rule");
        let base_odv = Odv::from_yaml(base.document.odv.as_ref());
        rules.push(
            RuleRecord::from_resolved(resolution.document, resolution.customized, &base.path)
                .with_base_odv(base_odv),
        );
        report.push(LoadResult {
            path: base.path,
            status: LoadStatus::Loaded { rule_id: id },
        });
    }

    let mut orphans: Vec<SourceDocument> = overlay_by_id.into_values().collect();
    orphans.sort_by(|a, b| a.path.cmp(&b.path));
    for orphan in orphans {
        let key = orphan.overlay_key().unwrap_or_default().to_string();
        let err = RuleError::OrphanOverlay(key);
        warn!(path = %orphan.path.display(), error = %err, "rejected overlay");
        report.push(LoadResult::failed(orphan.path, &err));
    }

    rules.sort_by(|a, b| a.source.cmp(&b.source).then_with(|| a.id.cmp(&b.id)));

    Corpus { rules, report }
}

/// Filesystem-backed corpus loader.
///
/// Scans `rules_dir` (required) and `custom_dir` (optional) recursively for
/// `*.yml` / `*.yaml` files and resolves every base rule against its overlay.
pub struct CorpusLoader {
    rules_dir: PathBuf,
    custom_dir: PathBuf,
}

impl CorpusLoader {
    pub fn new(rules_dir: PathBuf, custom_dir: PathBuf) -> Self {
        Self {
            rules_dir,
            custom_dir,
        }
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    pub fn custom_dir(&self) -> &Path {
        &self.custom_dir
    }

    /// Load and resolve the whole corpus.
    ///
    /// Fails only when the rules directory is missing. Unparseable or
    /// malformed files are reported in [`Corpus::report`] and skipped.
    pub fn load(&self) -> Result<Corpus> {
        if !self.rules_dir.is_dir() {
            return Err(RuleError::MissingDirectory(self.rules_dir.clone()));
        }

        let mut report = Vec::new();
        let bases = self.read_documents(&self.rules_dir, &mut report);
        let overlays = if self.custom_dir.is_dir() {
            self.read_documents(&self.custom_dir, &mut report)
        } else {
            debug!(path = %self.custom_dir.display(), "no custom rules directory");
            Vec::new()
        };

        let mut corpus = assemble(bases, overlays);
        report.append(&mut corpus.report);
        corpus.report = report;

        let failed = corpus.failures().count();
        info!(
            rules = corpus.len(),
            failed,
            path = %self.rules_dir.display(),
            "loaded rule corpus"
        );
        Ok(corpus)
    }

    /// Parse a single YAML file into a [`RuleDocument`].
    pub fn load_file(&self, path: &Path) -> Result<RuleDocument> {
        let contents = fs::read_to_string(path)?;
        Ok(RuleDocument::from_yaml(&contents)?)
    }

    fn read_documents(&self, dir: &Path, report: &mut Vec<LoadResult>) -> Vec<SourceDocument> {
        let mut documents = Vec::new();
        for path in collect_yaml_files(dir, report) {
            match self.load_file(&path) {
                Ok(document) => documents.push(SourceDocument { path, document }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load rule file");
                    report.push(LoadResult::failed(path, &e));
                }
            }
        }
        documents
    }
}
