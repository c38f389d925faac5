//! Recursive discovery of YAML rule files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::error::{LoadResult, LoadStatus};

/// True for `*.yml` / `*.yaml` paths.
pub(crate) fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false)
}

/// Recursively collect YAML files under `dir`, sorted by path.
///
/// Dotfiles/dotdirs and non-YAML files are reported as skipped.
/// Unreadable directories are logged and ignored.
pub(crate) fn collect_yaml_files(dir: &Path, report: &mut Vec<LoadResult>) -> Vec<PathBuf> {
    let mut files = Vec::new();
    scan_dir_recursive(dir, &mut files, report);
    files.sort();
    files
}

fn scan_dir_recursive(dir: &Path, files: &mut Vec<PathBuf>, report: &mut Vec<LoadResult>) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "failed to read directory");
            return;
        }
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };

        // Skip dotfiles/dotdirs
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                if path.is_file() {
                    report.push(LoadResult {
                        path,
                        status: LoadStatus::Skipped {
                            reason: "dotfile".to_string(),
                        },
                    });
                }
                continue;
            }
        }

        if path.is_dir() {
            scan_dir_recursive(&path, files, report);
            continue;
        }

        if !is_yaml(&path) {
            report.push(LoadResult {
                path,
                status: LoadStatus::Skipped {
                    reason: "not a YAML file".to_string(),
                },
            });
            continue;
        }

        files.push(path);
    }
}

/// Locate `<id>.yaml` or `<id>.yml` anywhere under `dir`.
pub(crate) fn find_by_stem(dir: &Path, id: &str) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }
    let mut ignored = Vec::new();
    collect_yaml_files(dir, &mut ignored)
        .into_iter()
        .find(|p| p.file_stem().and_then(|s| s.to_str()) == Some(id))
}
