//! Tests for the corpus loader module.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::*;
use crate::schema::{OdvValue, RuleDocument};

const AUTH_RULE_YAML: &str = r#"
id: auth_pw_1
title: Minimum password length
severity: medium
discussion: Passwords must be long.
check: pwpolicy -getaccountpolicies
fix: Install a configuration profile.
odv:
  recommended: 14
  hint: min length
tags:
  - cis_lvl1
references:
  800-53r4:
    - IA-5(1)
"#;

const OS_RULE_YAML: &str = r#"
id: os_sip_enable
title: Enable System Integrity Protection
tags: [cis_lvl1, stig]
"#;

fn temp_loader() -> (TempDir, CorpusLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let rules = dir.path().join("rules");
    let custom = dir.path().join("custom").join("rules");
    fs::create_dir_all(&rules).unwrap();
    let loader = CorpusLoader::new(rules, custom);
    (dir, loader)
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn source(path: &str, yaml: &str) -> SourceDocument {
    SourceDocument {
        path: path.into(),
        document: RuleDocument::from_yaml(yaml).unwrap(),
    }
}

#[test]
fn load_without_overlays() {
    let (_dir, loader) = temp_loader();
    write(&loader.rules_dir().join("auth/auth_pw_1.yaml"), AUTH_RULE_YAML);
    write(&loader.rules_dir().join("os/os_sip_enable.yaml"), OS_RULE_YAML);

    let corpus = loader.load().unwrap();
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.failures().count(), 0);

    let rule = corpus.get("auth_pw_1").unwrap();
    assert!(rule.customized.is_empty());
    assert_eq!(rule.odv.get("recommended"), Some(&OdvValue::Integer(14)));
    assert_eq!(rule.references.nist_800_53r4, vec!["IA-5(1)"]);
}

#[test]
fn overlay_marks_customized_fields() {
    let (_dir, loader) = temp_loader();
    write(&loader.rules_dir().join("auth/auth_pw_1.yaml"), AUTH_RULE_YAML);
    write(&loader.custom_dir().join("auth_pw_1.yaml"), "---\nodv:\n  custom: 20\n");

    let corpus = loader.load().unwrap();
    let rule = corpus.get("auth_pw_1").unwrap();

    assert_eq!(rule.customized, vec!["odv"]);
    assert_eq!(rule.odv.custom(), Some(&OdvValue::Integer(20)));
    // The overlay replaces the whole odv mapping; base values stay reachable.
    assert_eq!(rule.odv.get("recommended"), None);
    assert_eq!(rule.base_odv.get("recommended"), Some(&OdvValue::Integer(14)));
    assert_eq!(rule.base_odv.hint(), Some("min length"));
    assert!(corpus.report.iter().any(|r| matches!(
        &r.status,
        LoadStatus::Applied { rule_id, .. } if rule_id == "auth_pw_1"
    )));
}

#[test]
fn identical_overlay_is_not_customized() {
    let (_dir, loader) = temp_loader();
    write(&loader.rules_dir().join("auth_pw_1.yaml"), AUTH_RULE_YAML);
    write(&loader.custom_dir().join("auth_pw_1.yaml"), "severity: medium\n");

    let corpus = loader.load().unwrap();
    assert!(!corpus.get("auth_pw_1").unwrap().is_customized());
}

#[test]
fn overlay_in_nested_custom_directory_applies() {
    let (_dir, loader) = temp_loader();
    write(&loader.rules_dir().join("auth/auth_pw_1.yaml"), AUTH_RULE_YAML);
    write(&loader.custom_dir().join("auth/auth_pw_1.yml"), "title: Longer passwords\n");

    let corpus = loader.load().unwrap();
    let rule = corpus.get("auth_pw_1").unwrap();
    assert_eq!(rule.title, "Longer passwords");
    assert_eq!(rule.customized, vec!["title"]);
}

#[test]
fn parse_failures_are_skipped_not_fatal() {
    let (_dir, loader) = temp_loader();
    write(&loader.rules_dir().join("auth_pw_1.yaml"), AUTH_RULE_YAML);
    write(&loader.rules_dir().join("broken.yaml"), "id: [unclosed\n");
    write(&loader.rules_dir().join("list.yaml"), "- not\n- a rule\n");
    write(&loader.rules_dir().join("no_id.yaml"), "title: nobody\n");

    let corpus = loader.load().unwrap();
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.failures().count(), 3);
}

#[test]
fn dotfiles_and_non_yaml_are_skipped() {
    let (_dir, loader) = temp_loader();
    write(&loader.rules_dir().join("auth_pw_1.yaml"), AUTH_RULE_YAML);
    write(&loader.rules_dir().join(".hidden.yaml"), OS_RULE_YAML);
    write(&loader.rules_dir().join("README.md"), "# rules");

    let corpus = loader.load().unwrap();
    let skipped = corpus
        .report
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
        .count();

    assert_eq!(corpus.len(), 1);
    assert_eq!(skipped, 2);
}

#[test]
fn empty_rules_directory_is_empty_corpus() {
    let (_dir, loader) = temp_loader();
    let corpus = loader.load().unwrap();
    assert!(corpus.is_empty());
    assert_eq!(corpus.failures().count(), 0);
}

#[test]
fn missing_rules_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let loader = CorpusLoader::new(dir.path().join("nope"), dir.path().join("custom"));
    assert!(matches!(loader.load(), Err(RuleError::MissingDirectory(_))));
}

#[test]
fn pipes_are_escaped_at_load_time() {
    let (_dir, loader) = temp_loader();
    write(
        &loader.rules_dir().join("audit_flags.yaml"),
        "id: audit_flags\ncheck: awk '/flags/' /etc/security/audit_control | tr ',' '\\n'\n",
    );

    let corpus = loader.load().unwrap();
    assert!(corpus.get("audit_flags").unwrap().check.contains("\\|"));
}

#[test]
fn assemble_orders_by_path_then_id() {
    let corpus = assemble(
        vec![
            source("rules/os/os_b.yaml", "id: os_b\n"),
            source("rules/auth/auth_z.yaml", "id: auth_z\n"),
            source("rules/os/os_a.yaml", "id: os_a\n"),
        ],
        Vec::new(),
    );

    let ids: Vec<_> = corpus.rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["auth_z", "os_a", "os_b"]);
}

#[test]
fn assemble_rejects_duplicate_ids() {
    let corpus = assemble(
        vec![
            source("rules/b/dup.yaml", "id: dup\ntitle: second\n"),
            source("rules/a/dup.yaml", "id: dup\ntitle: first\n"),
        ],
        Vec::new(),
    );

    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.get("dup").unwrap().title, "first");
    let failure = corpus.failures().next().unwrap();
    assert_eq!(failure.path, Path::new("rules/b/dup.yaml"));
}

#[test]
fn assemble_rejects_orphan_overlays() {
    let corpus = assemble(
        vec![source("rules/a.yaml", "id: a\n")],
        vec![source("custom/rules/ghost.yaml", "odv:\n  custom: 1\n")],
    );

    assert_eq!(corpus.len(), 1);
    let failure = corpus.failures().next().unwrap();
    match &failure.status {
        LoadStatus::Failed { error } => assert!(error.contains("ghost")),
        other => panic!("unexpected status: {:?}", other),
    }
}

#[test]
fn tailored_overlay_round_trips_through_reload() {
    let (_dir, loader) = temp_loader();
    write(&loader.rules_dir().join("auth_pw_1.yaml"), AUTH_RULE_YAML);
    let store = OverlayStore::new(loader.custom_dir().to_path_buf());

    store.set_custom_odv("auth_pw_1", &OdvValue::Integer(20)).unwrap();
    let first = loader.load().unwrap();
    let rule = first.get("auth_pw_1").unwrap().clone();
    assert_eq!(rule.customized, vec!["odv"]);

    store.clear_odv("auth_pw_1").unwrap();
    let second = loader.load().unwrap();
    let rule = second.get("auth_pw_1").unwrap();
    assert!(rule.customized.is_empty());
    assert_eq!(rule.odv.get("recommended"), Some(&OdvValue::Integer(14)));
    assert!(!loader.custom_dir().join("auth_pw_1.yaml").exists());
}
