//! # Attachment Reference Matching
//!
//! Decides whether an attachment is "used" on a page by looking for its filename
//! in the page's storage-format body. Three substring tests run in order and the
//! first hit wins:
//!
//! 1. **Structural**: `ri:filename="<name>"`, the way storage markup embeds an
//!    attachment (`<ac:image><ri:attachment ri:filename="..."/></ac:image>`).
//! 2. **Encoded**: the name with spaces written as `%20`, as found in download links.
//! 3. **Substring**: the raw name anywhere in the body (prose, link text).
//!
//! This is not a markup parser. A name that appears inside a longer name
//! (`report.pdf` inside `annual-report.pdf`) counts as referenced, so the
//! "unused" list can miss attachments but never reports one that is in use.
//! Matching is case-sensitive and path separators are not normalized.

use log::debug;

/// Which of the three tests found the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTier {
    Structural,
    Encoded,
    Substring,
}

/// Anything with a display filename can be checked against a page body.
pub trait Named {
    fn file_name(&self) -> &str;
}

impl Named for String {
    fn file_name(&self) -> &str {
        self
    }
}

impl Named for &str {
    fn file_name(&self) -> &str {
        self
    }
}

/// Returns the first tier that matches, or `None` when the body never mentions
/// the filename.
///
/// An empty filename occurs in every body, so it is always referenced.
pub fn find_reference(filename: &str, body: &str) -> Option<ReferenceTier> {
    if body.contains(&format!("ri:filename=\"{}\"", filename)) {
        return Some(ReferenceTier::Structural);
    }
    if body.contains(&filename.replace(' ', "%20")) {
        return Some(ReferenceTier::Encoded);
    }
    if body.contains(filename) {
        return Some(ReferenceTier::Substring);
    }
    None
}

pub fn is_referenced(filename: &str, body: &str) -> bool {
    find_reference(filename, body).is_some()
}

/// Keeps the attachments that `body` does not reference, in their original order.
pub fn filter_unused<'a, T: Named>(attachments: &'a [T], body: &str) -> Vec<&'a T> {
    attachments
        .iter()
        .filter(|a| match find_reference(a.file_name(), body) {
            Some(tier) => {
                debug!("{} referenced ({:?})", a.file_name(), tier);
                false
            }
            None => true,
        })
        .collect()
}
