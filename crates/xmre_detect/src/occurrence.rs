//! The unit of work produced by the XMR Detector (C3): one occurrence per
//! hierarchical-value expression found in a module's body.

use serde::{Deserialize, Serialize};
use xmre_common::Ident;
use xmre_source::Span;

/// Whether a detected reference reads or writes its target signal.
///
/// Every occurrence defaults to [`XmrDirection::Read`]; the only write path
/// this tool recognizes is an XMR passed as an `output`/`inout` argument of a
/// function or task call. Procedural or continuous assignment directly to a
/// remote signal is not modeled as a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmrDirection {
    /// The target signal is read.
    Read,
    /// The target signal is written, via a call's output/inout argument.
    Write,
}

/// One cross-module reference found inside a module's body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmrOccurrence {
    /// The module the reference textually appears in.
    pub source_module: Ident,
    /// Instance names between the reference's root and its target signal.
    ///
    /// For an absolute reference this includes the root instance name
    /// itself; for a relative (downward) reference it starts at the first
    /// child instance under `source_module`; for a self-reference it is
    /// always empty.
    pub path_segments: Vec<Ident>,
    /// The final signal name at the end of the path.
    pub target_signal: Ident,
    /// The module definition that declares `target_signal`, if the whole
    /// instance chain could be walked to a known definition.
    pub target_module: Option<Ident>,
    /// Exact source text of the dotted name. Array indices are never part
    /// of it: the parser already separates a bit/range/part select from
    /// the hierarchical name it selects into, so there is no textual
    /// suffix to strip here.
    pub full_path: String,
    /// Declared bit width of the target signal, or `1` if it could not be
    /// resolved.
    pub bit_width: u32,
    /// Read or write.
    pub direction: XmrDirection,
    /// Whether the reference's root names a root instance rather than a
    /// direct child instance of `source_module`.
    pub absolute: bool,
    /// Source location of the hierarchical name expression.
    pub span: Span,
}

impl XmrOccurrence {
    /// `true` if the path resolves entirely inside its own source module
    /// (no instance boundary is crossed).
    pub fn is_self_reference(&self) -> bool {
        self.path_segments.is_empty()
    }
}
