//! Diagnostic codes raised by the Orchestrator itself, as opposed to codes
//! raised by the pipeline stages it drives.

use xmre_diagnostics::{Category, Diagnostic, DiagnosticCode};
use xmre_source::Span;

/// The input file list is empty, or one of its paths does not exist.
pub const E500: DiagnosticCode = DiagnosticCode::new(Category::Error, 500);

/// A pipeline register was requested for a module missing its configured
/// clock or reset signal. One of these is emitted per missing signal.
pub const E501: DiagnosticCode = DiagnosticCode::new(Category::Error, 501);

/// Writing a rewritten file to the output directory failed.
pub const E502: DiagnosticCode = DiagnosticCode::new(Category::Error, 502);

/// No XMR occurrences were found anywhere in the detected scope; the
/// originals are emitted unchanged.
pub const W500: DiagnosticCode = DiagnosticCode::new(Category::Warning, 500);

/// More than one root module was found and `-t/--top` was not given, so no
/// single used top module could be chosen.
pub const W501: DiagnosticCode = DiagnosticCode::new(Category::Warning, 501);

/// Builds the `E500` diagnostic for a missing or nonexistent input path.
pub fn error_input_missing(path: &str) -> Diagnostic {
    Diagnostic::error(E500, format!("input path `{path}` does not exist"), Span::DUMMY)
}

/// Builds the `E500` diagnostic for an empty input file list.
pub fn error_no_inputs() -> Diagnostic {
    Diagnostic::error(E500, "no input files given", Span::DUMMY)
}

/// Builds the `E501` diagnostic for a missing clock/reset signal.
pub fn error_missing_clock_or_reset(module: &str, signal: &str) -> Diagnostic {
    Diagnostic::error(
        E501,
        format!("module `{module}` requests pipeline registers but has no visible signal named `{signal}`"),
        Span::DUMMY,
    )
    .with_help("declare the clock/reset as a port or body signal, or pass --clock/--reset to match the module's own names")
}

/// Builds the `E502` diagnostic for a filesystem write failure.
pub fn error_output_write(path: &str, reason: &str) -> Diagnostic {
    Diagnostic::error(E502, format!("failed to write `{path}`: {reason}"), Span::DUMMY)
}

/// Builds the `W500` no-XMRs-found warning.
pub fn warning_no_xmrs_found() -> Diagnostic {
    Diagnostic::warning(W500, "no cross-module references found in the detected scope", Span::DUMMY)
}

/// Builds the `W501` multiple-tops warning.
pub fn warning_multiple_tops(tops: &[String]) -> Diagnostic {
    Diagnostic::warning(
        W501,
        format!(
            "{} candidate top modules found ({}) and no -t/--top given; no top module was selected",
            tops.len(),
            tops.join(", ")
        ),
        Span::DUMMY,
    )
}
