//! Anchor-then-extract helpers shared by the target queries and mutations.
//!
//! Project text is never parsed as a whole. Each operation finds the one
//! anchor it needs (a section delimiter, an object header, a list opener)
//! and splices new lines in right after it. Everything outside the edited
//! region is preserved byte for byte.

use regex::{Captures, Regex};

use crate::core::PbxError;

/// Compiles an anchored pattern.
pub(crate) fn compile(pattern: &str) -> Result<Regex, PbxError> {
    Ok(Regex::new(pattern)?)
}

/// Escapes a name or identifier for use inside a pattern.
pub(crate) fn esc(value: &str) -> String {
    regex::escape(value)
}

/// Runs `pattern` against `text`, returning the captures of the first match.
pub(crate) fn captures<'t>(pattern: &str, text: &'t str) -> Result<Option<Captures<'t>>, PbxError> {
    Ok(compile(pattern)?.captures(text))
}

/// Returns capture group 1 of the first match as an owned string.
pub(crate) fn capture_one(pattern: &str, text: &str) -> Result<Option<String>, PbxError> {
    Ok(captures(pattern, text)?.and_then(|c| c.get(1)).map(|m| m.as_str().to_string()))
}

/// Opening delimiter of a section, including its newline.
pub(crate) fn begin_marker(section: &str) -> String {
    format!("/* Begin {section} section */\n")
}

/// Closing delimiter of a section, including its newline.
pub(crate) fn end_marker(section: &str) -> String {
    format!("/* End {section} section */\n")
}

/// Byte range of the body between a section's delimiters.
pub(crate) fn section_body(text: &str, section: &str) -> Result<Option<std::ops::Range<usize>>, PbxError> {
    let pattern = format!(
        r"/\* Begin {s} section \*/\n((?s:.+?))/\* End {s} section \*/",
        s = esc(section)
    );
    Ok(captures(&pattern, text)?.and_then(|c| c.get(1)).map(|m| m.range()))
}

/// Byte offset right after a section's opening delimiter line.
pub(crate) fn section_insert_point(text: &str, section: &str) -> Option<usize> {
    let marker = begin_marker(section);
    text.find(&marker).map(|i| i + marker.len())
}

/// Returns `text` with `block` inserted at byte offset `at`.
pub(crate) fn splice(text: &str, at: usize, block: &str) -> String {
    let mut result = String::with_capacity(text.len() + block.len());
    result.push_str(&text[..at]);
    result.push_str(block);
    result.push_str(&text[at..]);
    result
}

/// Returns `text` with the byte range `range` replaced by `replacement`.
pub(crate) fn replace_range(text: &str, range: std::ops::Range<usize>, replacement: &str) -> String {
    let mut result = String::with_capacity(text.len() + replacement.len());
    result.push_str(&text[..range.start]);
    result.push_str(replacement);
    result.push_str(&text[range.end..]);
    result
}

/// Inserts `block` immediately inside the opening delimiter of `section`.
///
/// Returns `None` when the section does not exist.
pub(crate) fn insert_into_section(text: &str, section: &str, block: &str) -> Option<String> {
    section_insert_point(text, section).map(|at| splice(text, at, block))
}

/// Creates an empty `section` right after the end of `after_section`.
///
/// Returns the text unchanged when `section` already exists, and `None` when
/// it is missing and `after_section` cannot be found either.
pub(crate) fn ensure_section(text: &str, section: &str, after_section: &str) -> Option<String> {
    if text.contains(&begin_marker(section)) {
        return Some(text.to_string());
    }

    let anchor = end_marker(after_section);
    let at = text.find(&anchor)? + anchor.len();
    let block = format!("\n{}\n{}", begin_marker(section), end_marker(section));
    Some(splice(text, at, &block))
}

/// Strips one pair of surrounding double quotes, if present.
pub(crate) fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}
