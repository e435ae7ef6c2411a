//! Diagnostic codes for the Elaboration Facade.
//!
//! Unlike a synthesis elaborator, a module type that cannot be resolved
//! against the registry is not a hard error here: it is recorded as an
//! unresolved ("blackbox") instance and left to downstream stages, since
//! vendor IP and generated netlists routinely instantiate modules that never
//! appear in the input file set. Only genuinely surprising situations are
//! diagnosed.

use xmre_diagnostics::{Category, Diagnostic, DiagnosticCode};
use xmre_source::Span;

/// Two module declarations in the input set share a name.
pub const W100: DiagnosticCode = DiagnosticCode::new(Category::Warning, 100);

/// A port or signal's bit-range expression could not be evaluated to a
/// constant; the declaration is treated as 1-bit wide.
pub const W101: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);

/// Builds the `W100` duplicate-module-name diagnostic.
pub fn warning_duplicate_module(name: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        W100,
        format!("module `{name}` is declared more than once; the later declaration wins"),
        span,
    )
}

/// Builds the `W101` unresolved-width diagnostic.
pub fn warning_unresolved_width(decl: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        W101,
        format!("could not evaluate the bit-range of `{decl}` as a constant; assuming width 1"),
        span,
    )
    .with_help("parameterized widths that depend on an unresolved identifier are not evaluated")
}
