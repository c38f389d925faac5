//! Sectioning of a rule selection and rendering of the baseline document.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::benchmark::Benchmark;
use crate::schema::{RuleRecord, TAG_INHERENT, TAG_NOT_APPLICABLE, TAG_PERMANENT, TAG_SUPPLEMENTAL};

use super::metadata::VersionInfo;

const TWO_TOKEN_PREFIX: &str = "system_settings";

/// Category buckets that trail the sectioned rules, in tag priority order.
const TRAILERS: [(&str, &str); 4] = [
    (TAG_INHERENT, "Inherent"),
    (TAG_PERMANENT, "Permanent"),
    (TAG_NOT_APPLICABLE, "not_applicable"),
    (TAG_SUPPLEMENTAL, "Supplemental"),
];

/// One `profile` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub section: String,
    pub rules: Vec<String>,
}

/// A composed baseline, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    pub title: String,
    pub description: String,
    pub authors: String,
    pub parent_values: String,
    pub profile: Vec<Section>,
}

/// Section key for an id: first two `_` tokens for `system_settings*`, else the first.
pub fn section_key(id: &str) -> String {
    let tokens = if id.starts_with(TWO_TOKEN_PREFIX) { 2 } else { 1 };
    id.split('_').take(tokens).collect::<Vec<_>>().join("_")
}

impl Baseline {
    /// Compose a baseline from `rules`.
    ///
    /// `title` is the keyword's display title; `tailored` is the tailoring
    /// suffix (e.g. `CIS_LVL1 (Tailored)`) when the baseline was tailored.
    /// The result does not depend on the order of `rules`.
    pub fn compose(
        rules: &[RuleRecord],
        benchmark: &Benchmark,
        version: &VersionInfo,
        authors: &str,
        title: &str,
        tailored: Option<&str>,
    ) -> Self {
        let mut trailers: [BTreeSet<&str>; 4] = Default::default();
        let mut sections: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();

        for rule in rules {
            match TRAILERS.iter().position(|(tag, _)| rule.has_tag(tag)) {
                Some(i) => {
                    trailers[i].insert(&rule.id);
                }
                None => {
                    sections.entry(section_key(&rule.id)).or_default().insert(&rule.id);
                }
            }
        }

        let mut profile: Vec<Section> = sections
            .into_iter()
            .map(|(section, ids)| Section {
                section,
                rules: ids.into_iter().map(str::to_string).collect(),
            })
            .collect();
        for ((_, name), ids) in TRAILERS.iter().zip(trailers) {
            if !ids.is_empty() {
                profile.push(Section {
                    section: name.to_string(),
                    rules: ids.into_iter().map(str::to_string).collect(),
                });
            }
        }

        let platform_os = version.platform_os();
        let suffix = tailored.map(|t| format!(" {}", t)).unwrap_or_default();
        let mut description = format!(
            "This guide describes the actions to take when securing a {} system against the {}{} security baseline.",
            platform_os, title, suffix
        );
        if benchmark.is_recommended() {
            description.push_str(
                "\n\nThis is a catalog of settings to assist in security benchmark creation, not a mandatory checklist.",
            );
        }

        Self {
            title: format!("{}: Security Configuration - {}{}", platform_os, title, suffix),
            description,
            authors: authors.to_string(),
            parent_values: benchmark.to_string(),
            profile,
        }
    }

    /// Render the baseline YAML document.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "title: {}", quoted(&self.title));
        out.push_str("description: |\n");
        for line in self.description.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "  {}", line);
            }
        }
        let _ = writeln!(out, "authors: |\n  {}", self.authors);
        let _ = writeln!(out, "parent_values: {}", quoted(&self.parent_values));
        out.push_str("profile:\n");
        for section in &self.profile {
            let _ = writeln!(out, "  - section: {}", quoted(&section.section));
            out.push_str("    rules:\n");
            for id in &section.rules {
                let _ = writeln!(out, "      - {}", id);
            }
        }
        out
    }
}

/// YAML double-quoted scalar.
fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
