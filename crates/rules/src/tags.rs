//! Tag index over a resolved corpus.

use std::collections::BTreeSet;

use crate::schema::{RuleRecord, ALL_RULES};

/// Every distinct tag in `rules`, plus `all_rules`, sorted ascending.
pub fn tags_of(rules: &[RuleRecord]) -> BTreeSet<String> {
    let mut tags: BTreeSet<String> = rules.iter().flat_map(|r| r.tags.iter().cloned()).collect();
    tags.insert(ALL_RULES.to_string());
    tags
}

/// Rules carrying `tag`, in corpus order. `all_rules` selects everything.
pub fn filter(rules: &[RuleRecord], tag: &str) -> Vec<RuleRecord> {
    rules
        .iter()
        .filter(|r| tag == ALL_RULES || r.has_tag(tag))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RuleDocument;
    use std::path::Path;

    fn rule(yaml: &str) -> RuleRecord {
        let doc = RuleDocument::from_yaml(yaml).unwrap();
        RuleRecord::from_resolved(doc, Vec::new(), Path::new("rule.yaml"))
    }

    fn corpus() -> Vec<RuleRecord> {
        vec![
            rule("id: a\ntags: [stig, cis_lvl1]\n"),
            rule("id: b\ntags: [cis_lvl2]\n"),
            rule("id: c\ntags: [stig]\n"),
        ]
    }

    #[test]
    fn tags_include_all_rules_without_duplicates() {
        let tags: Vec<_> = tags_of(&corpus()).into_iter().collect();
        assert_eq!(tags, vec!["all_rules", "cis_lvl1", "cis_lvl2", "stig"]);
    }

    #[test]
    fn empty_corpus_still_has_all_rules() {
        let tags = tags_of(&[]);
        assert_eq!(tags.len(), 1);
        assert!(tags.contains(ALL_RULES));
    }

    #[test]
    fn untagged_rule_gets_sentinel_tag() {
        let tags = tags_of(&[rule("id: lonely\n")]);
        assert!(tags.contains("missing"));
    }

    #[test]
    fn filter_by_tag_preserves_order() {
        let ids: Vec<_> = filter(&corpus(), "stig").into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn filter_all_rules_selects_everything() {
        assert_eq!(filter(&corpus(), ALL_RULES).len(), 3);
        assert!(filter(&corpus(), "unknown").is_empty());
    }
}
