//! The optional Validator / Re-Elaborator (C6): re-runs the frontend on
//! the Rewriter's own output and reports any compilation error as fatal.
//! No fix-up is attempted — a validation failure means the rewrite itself
//! produced output that doesn't parse or elaborate, which is always a
//! defect in this tool, never something to paper over.
//!
//! This toolchain has no preprocessor stage (`xmre_sv` parses SystemVerilog
//! text directly; there is no include/define expansion anywhere in the
//! pipeline), so there are no include/define options to thread through the
//! re-parse — the rewritten text is re-parsed exactly as it will be
//! consumed downstream.

#![warn(missing_docs)]

use std::path::PathBuf;

use xmre_common::Interner;
use xmre_diagnostics::{Diagnostic, DiagnosticSink};
use xmre_source::SourceDb;

/// The result of re-parsing and re-elaborating a set of rewritten files.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Every diagnostic the re-parse/re-elaborate pass produced.
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// `true` iff no error-severity diagnostic was produced.
    pub fn ok(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

/// Re-parses and re-elaborates `rewritten` (path, source text pairs) from
/// scratch, in a fresh `SourceDb`/`Interner` independent of whatever
/// produced the text, and reports whatever the frontend finds.
pub fn validate(rewritten: &[(PathBuf, String)]) -> ValidationReport {
    let mut source_db = SourceDb::new();
    let interner = Interner::new();
    let sink = DiagnosticSink::new();

    let mut files = Vec::with_capacity(rewritten.len());
    for (path, text) in rewritten {
        let file_id = source_db.add_source(path.clone(), text.clone());
        let parsed = xmre_sv::parse_file(file_id, &source_db, &interner, &sink);
        files.push((file_id, parsed));
    }

    xmre_elaborate::elaborate(&files, &source_db, &interner, &sink);

    ValidationReport {
        diagnostics: sink.take_all(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_output_validates_clean() {
        let rewritten = vec![(
            PathBuf::from("top.sv"),
            "module top;\n  wire __xmr__u_sub_sig;\n  sub u_sub(.__xmr__u_sub_sig(__xmr__u_sub_sig));\nendmodule\nmodule sub(output __xmr__u_sub_sig);\n  reg sig;\n  assign __xmr__u_sub_sig = sig;\nendmodule\n".to_string(),
        )];
        let report = validate(&rewritten);
        assert!(report.ok(), "unexpected diagnostics: {:?}", report.diagnostics);
    }

    #[test]
    fn malformed_output_fails_validation() {
        let rewritten = vec![(
            PathBuf::from("broken.sv"),
            "module top;\n  assign r = ;\nendmodule\n".to_string(),
        )];
        let report = validate(&rewritten);
        assert!(!report.ok());
        assert!(!report.diagnostics.is_empty());
    }
}
