//! Manifest Text Operations
//!
//! The project file is treated as text, never parsed. Registered files are
//! found by their comment annotations and new lines are spliced in next to
//! known markers. A marker that is not there yields `None` and the caller
//! decides what to do about it.

use regex::{Captures, Regex};
use std::collections::BTreeSet;

use crate::patcher::PatchError;

/// Compile a region header pattern
pub fn region_pattern(pattern: &str) -> Result<Regex, PatchError> {
    Regex::new(pattern).map_err(|source| PatchError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Regex matching `/* <name>.<extension> */`
fn registered_pattern(extension: &str) -> Result<Regex, PatchError> {
    region_pattern(&format!(r"/\*\s*([^*/\n]+?\.{})\s*\*/", regex::escape(extension)))
}

/// Every `<name>.<extension>` that appears in a comment annotation
pub fn scan_registered(text: &str, extension: &str) -> Result<BTreeSet<String>, PatchError> {
    let registered: BTreeSet<String> = registered_pattern(extension)?
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect();
    tracing::debug!(count = registered.len(), "scanned manifest for registered files");
    Ok(registered)
}

/// Splice `lines` in front of the first occurrence of `marker`.
pub fn insert_before_marker(text: &str, marker: &str, lines: &[String]) -> Option<String> {
    let at = text.find(marker)?;
    if lines.is_empty() {
        return Some(text.to_string());
    }
    let block = lines.join("\n");
    let mut out = String::with_capacity(text.len() + block.len() + 1);
    out.push_str(&text[..at]);
    out.push_str(&block);
    out.push('\n');
    out.push_str(&text[at..]);
    Some(out)
}

/// Insert `lines` right after the first match of `header`, so they become
/// the first entries of the list it opens.
pub fn insert_into_region(text: &str, header: &Regex, lines: &[String]) -> Option<String> {
    if !header.is_match(text) {
        return None;
    }
    if lines.is_empty() {
        return Some(text.to_string());
    }
    let block = lines.join("\n");
    let patched = header.replacen(text, 1, |caps: &Captures| format!("{}\n{}", &caps[0], block));
    Some(patched.into_owned())
}
