//! Field-level overlay resolution: base document + optional custom overlay.

use crate::schema::RuleDocument;

use super::error::{Result, RuleError};

/// A base document with its overlay applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub document: RuleDocument,
    /// Names of the fields the overlay changed, in schema order, each at most once.
    pub customized: Vec<String>,
}

/// Merge `overlay` onto `base`, field by field.
///
/// The base defines which fields exist: an overlay value is taken only when
/// the base has that field and the two values differ. Fields the base lacks
/// are never introduced. An overlay carrying an `id` must name the same rule.
pub fn resolve(base: &RuleDocument, overlay: Option<&RuleDocument>) -> Result<Resolution> {
    let id = match base.id.as_deref() {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return Err(RuleError::Integrity(
                "base rule document has no `id`".to_string(),
            ))
        }
    };

    let mut document = base.clone();
    let mut customized = Vec::new();

    let Some(overlay) = overlay else {
        return Ok(Resolution { document, customized });
    };

    if let Some(overlay_id) = overlay.id.as_deref() {
        if overlay_id != id {
            return Err(RuleError::Integrity(format!(
                "overlay id '{}' does not match base id '{}'",
                overlay_id, id
            )));
        }
    }

    merge_field("title", &mut document.title, &overlay.title, &mut customized);
    merge_field("severity", &mut document.severity, &overlay.severity, &mut customized);
    merge_field("discussion", &mut document.discussion, &overlay.discussion, &mut customized);
    merge_field("check", &mut document.check, &overlay.check, &mut customized);
    merge_field("fix", &mut document.fix, &overlay.fix, &mut customized);
    merge_field("references", &mut document.references, &overlay.references, &mut customized);
    merge_field("odv", &mut document.odv, &overlay.odv, &mut customized);
    merge_field("tags", &mut document.tags, &overlay.tags, &mut customized);
    merge_field("result", &mut document.result, &overlay.result, &mut customized);
    merge_field("mobileconfig", &mut document.mobileconfig, &overlay.mobileconfig, &mut customized);
    merge_field(
        "mobileconfig_info",
        &mut document.mobileconfig_info,
        &overlay.mobileconfig_info,
        &mut customized,
    );

    Ok(Resolution { document, customized })
}

fn merge_field<T: PartialEq + Clone>(
    name: &str,
    base: &mut Option<T>,
    overlay: &Option<T>,
    customized: &mut Vec<String>,
) {
    let (Some(base_value), Some(overlay_value)) = (base.as_mut(), overlay.as_ref()) else {
        return;
    };
    if base_value != overlay_value {
        *base_value = overlay_value.clone();
        customized.push(name.to_string());
    }
}
