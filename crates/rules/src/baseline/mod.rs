//! Baseline composition: turns a rule selection into the rendered baseline
//! document, with author and title metadata from the project includes.

mod authors;
mod compose;
mod metadata;

pub use authors::{append_authors, parse_authors, DEFAULT_AUTHORS};
pub use compose::{section_key, Baseline, Section};
pub use metadata::{AuthorEntry, MetadataError, ProjectData, VersionInfo};
pub(crate) use metadata::load_yaml;

/// Title suffix for a tailored baseline named `name`, built from `keyword`.
pub fn tailored_title(keyword: &str, name: &str) -> String {
    if name == keyword {
        format!("{} (Tailored)", keyword.to_uppercase())
    } else {
        format!(
            "{} (Tailored from {})",
            name.to_uppercase(),
            keyword.to_uppercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::tailored_title;

    #[test]
    fn tailored_titles() {
        assert_eq!(tailored_title("cis_lvl1", "cis_lvl1"), "CIS_LVL1 (Tailored)");
        assert_eq!(
            tailored_title("cis_lvl1", "acme"),
            "ACME (Tailored from CIS_LVL1)"
        );
    }
}
