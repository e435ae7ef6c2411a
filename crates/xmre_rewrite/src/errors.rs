//! Diagnostic codes raised while applying a `ChangeSet` to source text.

use xmre_diagnostics::{Category, Diagnostic, DiagnosticCode};
use xmre_source::Span;

/// A pass produced two edits that overlap in the same file, or an edit
/// fell outside the file's own text. The file's output is replaced by the
/// empty string; other files still get emitted. Non-fatal.
pub const E400: DiagnosticCode = DiagnosticCode::new(Category::Error, 400);

/// Internal fallibility of applying one file's edit list.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RewriteError {
    /// See [`E400`].
    #[error("overlapping edits in the same file ({first_end} > {second_start})")]
    OverlappingEdits {
        /// End offset of the earlier edit.
        first_end: u32,
        /// Start offset of the edit that overlaps it.
        second_start: u32,
    },
}

/// Builds the `E400` diagnostic for a file whose edit list could not be
/// applied cleanly.
pub fn error_rewrite_failure(path: &str, reason: &RewriteError, span: Span) -> Diagnostic {
    Diagnostic::error(
        E400,
        format!("failed to rewrite `{path}`: {reason}"),
        span,
    )
    .with_help("this file's output was replaced with an empty string; other files still emit")
}
