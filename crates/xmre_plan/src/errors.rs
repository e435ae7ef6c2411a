//! Diagnostic codes raised while planning changes for detected XMRs.

use xmre_diagnostics::{Category, Diagnostic, DiagnosticCode};
use xmre_source::Span;

/// The planner could not resolve an instance name on an occurrence's
/// declared path. The occurrence's replacement text (recorded in step 1,
/// before the path is walked) is kept, but no port threading past this hop
/// is generated. Non-fatal: the Orchestrator surfaces it and continues.
pub const E300: DiagnosticCode = DiagnosticCode::new(Category::Error, 300);

/// Two occurrences in the same source module share a base path but
/// disagree on direction. Non-fatal: the conflicting occurrence's
/// downstream plan is skipped rather than guessed at.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// Internal fallibility of a single planning step, before it is turned into
/// a [`Diagnostic`] and handed to the sink.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    /// See [`E300`].
    #[error("module `{parent}` has no instance named `{instance}` on the path to an XMR target")]
    UnknownChildInstance {
        /// The module the lookup was performed against.
        parent: String,
        /// The instance name that could not be found.
        instance: String,
    },
    /// See [`E301`].
    #[error("module `{module}` has conflicting read/write XMRs sharing base path `{base_path}`")]
    MixedDirectionConflict {
        /// The module containing both occurrences.
        module: String,
        /// The shared base path.
        base_path: String,
    },
}

/// Builds the `E300` diagnostic.
pub fn error_unknown_child_instance(parent: &str, instance: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E300,
        PlanError::UnknownChildInstance {
            parent: parent.to_string(),
            instance: instance.to_string(),
        }
        .to_string(),
        span,
    )
    .with_help("the occurrence stays in the summary, but ports were not threaded past this point")
}

/// Builds the `E301` diagnostic.
pub fn error_mixed_direction_conflict(module: &str, base_path: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E301,
        PlanError::MixedDirectionConflict {
            module: module.to_string(),
            base_path: base_path.to_string(),
        }
        .to_string(),
        span,
    )
    .with_help("rename or separate the conflicting reads/writes; no direction is guessed")
}
