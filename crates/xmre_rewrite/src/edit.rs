//! The byte-offset edit list: the common currency between Pass 1, Pass 2,
//! and the text splicer that turns a sorted list of edits back into a
//! whole file's source text.
//!
//! There is no pretty-printer anywhere in this toolchain and none is
//! built here: every addition this crate makes is a string spliced
//! directly into the original source at a byte offset taken from a
//! [`Span`] already produced by the frontend. An edit with `start == end`
//! is a pure insertion at that offset; one with `start < end` replaces
//! that byte range.

use xmre_source::Span;

use crate::errors::RewriteError;

/// One textual change to a file's source, in absolute byte offsets.
#[derive(Debug, Clone)]
pub struct Edit {
    /// Start offset, inclusive.
    pub start: u32,
    /// End offset, exclusive. Equal to `start` for a pure insertion.
    pub end: u32,
    /// The text to splice in at `[start, end)`.
    pub replacement: String,
}

impl Edit {
    /// An insertion at a single byte offset.
    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            replacement: text.into(),
        }
    }

    /// A replacement of `span`'s own text.
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self {
            start: span.start,
            end: span.end,
            replacement: text.into(),
        }
    }
}

/// Applies a list of edits to `source`, producing the rewritten text.
///
/// Edits are sorted by start offset before application; two edits that
/// overlap (the earlier one's `end` falls past the later one's `start`)
/// are rejected rather than silently producing garbled text.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<String, RewriteError> {
    edits.sort_by_key(|e| (e.start, e.end));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0u32;
    for edit in &edits {
        if edit.start < cursor {
            return Err(RewriteError::OverlappingEdits {
                first_end: cursor,
                second_start: edit.start,
            });
        }
        out.push_str(&source[cursor as usize..edit.start as usize]);
        out.push_str(&edit.replacement);
        cursor = edit.end;
    }
    out.push_str(&source[cursor as usize..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmre_source::FileId;

    fn span(start: u32, end: u32) -> Span {
        Span::new(FileId::from_raw(0), start, end)
    }

    #[test]
    fn single_insertion() {
        let out = apply_edits("abcdef", vec![Edit::insert(3, "XYZ")]).unwrap();
        assert_eq!(out, "abcXYZdef");
    }

    #[test]
    fn single_replacement() {
        let out = apply_edits("abcdef", vec![Edit::replace(span(1, 4), "Q")]).unwrap();
        assert_eq!(out, "aQef");
    }

    #[test]
    fn multiple_edits_applied_in_order() {
        let out = apply_edits(
            "abcdef",
            vec![Edit::insert(6, "!"), Edit::insert(0, ">")],
        )
        .unwrap();
        assert_eq!(out, ">abcdef!");
    }

    #[test]
    fn overlapping_edits_rejected() {
        let err = apply_edits(
            "abcdef",
            vec![Edit::replace(span(0, 4), "X"), Edit::replace(span(2, 5), "Y")],
        );
        assert!(err.is_err());
    }

    #[test]
    fn adjacent_edits_are_not_overlapping() {
        let out = apply_edits(
            "abcdef",
            vec![Edit::replace(span(0, 2), "X"), Edit::replace(span(2, 4), "Y")],
        )
        .unwrap();
        assert_eq!(out, "XYef");
    }
}
