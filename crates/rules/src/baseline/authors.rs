//! Author block formatting for the `authors:` section.

use super::metadata::AuthorEntry;

/// Block used when a keyword has no author table.
pub const DEFAULT_AUTHORS: &str = "|===\n  |Name|Organization\n  |===\n";

/// Format an author table, indented for a YAML block scalar.
pub fn parse_authors(entry: &AuthorEntry) -> String {
    let mut block = String::from("*macOS Security Compliance Project*\n");
    if let Some(preamble) = &entry.preamble {
        block.push_str(&format!("  {}\n", preamble));
    }
    block.push_str("  |===\n");
    for name in &entry.names {
        block.push_str(&format!("  |{}\n", name));
    }
    block.push_str("  |===\n");
    block
}

/// Prefix `authors` with the operator who tailored the baseline.
pub fn append_authors(authors: &str, name: &str, organization: &str) -> String {
    format!(
        "*Security configuration tailored by:*\n  |===\n  |{}|{}\n  |===\n  {}",
        name, organization, authors
    )
}
