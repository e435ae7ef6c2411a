//! Diagnostic codes for the XMR Detector.

use xmre_diagnostics::{Category, Diagnostic, DiagnosticCode};
use xmre_source::Span;

/// The same hierarchical reference (same source module, same exact text)
/// was found more than once; only the first occurrence is kept.
pub const W200: DiagnosticCode = DiagnosticCode::new(Category::Warning, 200);

/// A reference's instance chain could not be walked all the way to a
/// declared signal; its target module and bit width are left unresolved.
pub const W201: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);

/// Builds the `W200` duplicate-detection diagnostic.
pub fn warning_duplicate_detection(module: &str, path: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        W200,
        format!("`{path}` is referenced more than once in `{module}`; duplicate dropped"),
        span,
    )
}

/// Builds the `W201` unresolved-target diagnostic.
pub fn warning_unresolved_target(module: &str, path: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        W201,
        format!("could not resolve the target of `{path}` referenced from `{module}`; assuming width 1"),
        span,
    )
    .with_help("an instance along the path is a blackbox, or the path names an instance that does not exist")
}
