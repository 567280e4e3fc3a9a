//! Dotted path parsing.
//!
//! A path such as `"account.settings.email"` addresses a node by the segment
//! names leading to it. Resolution is always relative to the node the call is
//! issued on; a single leading `.` marks that explicitly, so `"."` and `""`
//! both address the invoking node itself.

use crate::error::{MenuError, Result};

/// Segment separator.
pub const SEPARATOR: char = '.';

/// Split a dotted path into its segments.
///
/// ```text
/// split_path("a.b.c")  → ["a", "b", "c"]
/// split_path(".a.b")   → ["a", "b"]
/// split_path(".")      → []
/// split_path("a..b")   → Err(InvalidPath)
/// ```
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    let relative = path.strip_prefix(SEPARATOR).unwrap_or(path);
    if relative.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<&str> = relative.split(SEPARATOR).collect();
    if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
        let reason = if pos == 0 {
            "more than one leading separator"
        } else if pos == segments.len() - 1 {
            "trailing separator"
        } else {
            "empty segment"
        };
        return Err(MenuError::invalid_path(path, reason));
    }
    Ok(segments)
}

/// Join segments back into a dotted path (no leading separator).
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}
