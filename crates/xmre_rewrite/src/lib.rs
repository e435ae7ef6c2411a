//! The Syntax Rewriter (C5): applies a `ChangeSet` to the original source
//! text of every input file, producing the rewritten SystemVerilog with
//! every cross-module reference eliminated.
//!
//! There is no pretty-printer here, by design: this crate never re-emits
//! an AST as text. Every addition is a small string spliced into the
//! original source at a byte offset already carried by the frontend's own
//! spans, via the edit list in [`edit`]. Two passes build that list:
//!
//! - Pass 1 ([`pass1`]) handles everything local to a single module: new
//!   ports on the header, new wires and pipeline registers in the body,
//!   and the scoped-name substitution walk in [`substitute`].
//! - Pass 2 ([`pass2`]) appends new connections to instantiation sites,
//!   and only starts once every file has finished Pass 1 — an instance's
//!   connection list can't grow correctly until every module's new ports
//!   are already decided.
//!
//! A file whose edit list can't be applied cleanly (overlapping edits)
//! fails in isolation: its output is the empty string and an `E400`
//! diagnostic is emitted, but every other file still gets rewritten.

#![warn(missing_docs)]

mod edit;
/// Diagnostic codes raised while applying a `ChangeSet` to source text.
pub mod errors;
mod pass1;
mod pass2;
mod substitute;

use std::collections::HashMap;

use xmre_common::Interner;
use xmre_diagnostics::DiagnosticSink;
use xmre_ir::Design;
use xmre_plan::ChangeSet;
use xmre_source::{FileId, SourceDb, Span};
use xmre_sv::ast::SvSourceFile;

pub use edit::{apply_edits, Edit};

/// The rewritten text for one input file, or `None` if that file's own
/// edits could not be applied (see [`errors::E400`]).
#[derive(Debug, Clone)]
pub struct RewrittenFile {
    /// The file that was rewritten.
    pub file: FileId,
    /// The rewritten source text. Empty if rewriting this file failed.
    pub text: String,
    /// `false` if this file's edit list could not be applied cleanly.
    pub succeeded: bool,
}

/// Applies `change_set` to every file in `files`, returning the rewritten
/// text for each. Runs Pass 1 across all files, then Pass 2 across all
/// files, then splices each file's combined edit list independently.
pub fn rewrite(
    design: &Design,
    files: &[(FileId, SvSourceFile)],
    source_db: &SourceDb,
    interner: &Interner,
    change_set: &ChangeSet,
    sink: &DiagnosticSink,
) -> Vec<RewrittenFile> {
    let mut pass1_edits = pass1::build_pass1_edits(design, files, source_db, interner, change_set);
    let pass2_edits = pass2::build_pass2_edits(design, files, source_db, interner, change_set);

    let mut combined: HashMap<FileId, Vec<Edit>> = HashMap::new();
    for (file, edits) in pass1_edits.drain() {
        combined.entry(file).or_default().extend(edits);
    }
    for (file, edits) in pass2_edits {
        combined.entry(file).or_default().extend(edits);
    }

    files
        .iter()
        .map(|(file_id, parsed)| {
            let source_text = source_db.snippet(parsed.span);
            let edits = combined.remove(file_id).unwrap_or_default();
            if edits.is_empty() {
                return RewrittenFile {
                    file: *file_id,
                    text: source_text.to_string(),
                    succeeded: true,
                };
            }
            match apply_edits(source_text, edits) {
                Ok(text) => RewrittenFile {
                    file: *file_id,
                    text,
                    succeeded: true,
                },
                Err(reason) => {
                    sink.emit(errors::error_rewrite_failure(
                        &source_db.get_file(*file_id).path.display().to_string(),
                        &reason,
                        Span::new(*file_id, 0, 0),
                    ));
                    RewrittenFile {
                        file: *file_id,
                        text: String::new(),
                        succeeded: false,
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmre_diagnostics::DiagnosticSink;
    use xmre_plan::{ConnectionChange, PlannedPort, PlannedWire};
    use xmre_ir::{DeclKind, PortDirection};

    fn elaborate_one(source: &str) -> (SourceDb, Interner, FileId, SvSourceFile, Design, DiagnosticSink) {
        let mut source_db = SourceDb::new();
        let file_id = source_db.add_source("t.sv", source.to_string());
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let parsed = xmre_sv::parse_file(file_id, &source_db, &interner, &sink);
        let design = xmre_elaborate::elaborate(&[(file_id, parsed.clone())], &source_db, &interner, &sink);
        (source_db, interner, file_id, parsed, design, sink)
    }

    #[test]
    fn simple_downward_read_is_fully_threaded() {
        let source = "module top;\n  sub u_sub();\n  assign r = u_sub.sig;\nendmodule\nmodule sub;\n  reg sig;\nendmodule\n";
        let (source_db, interner, file_id, parsed, design, sink) = elaborate_one(source);

        let top = interner.get_or_intern("top");
        let sub = interner.get_or_intern("sub");
        let u_sub = interner.get_or_intern("u_sub");
        let sig = interner.get_or_intern("sig");
        let port = interner.get_or_intern("__xmr__u_sub_sig");

        let mut cs = ChangeSet::new();
        cs.xmr_replacements.insert(
            (top, "u_sub.sig".to_string()),
            interner.resolve(port).to_string(),
        );
        cs.add_wire(
            top,
            PlannedWire {
                name: port,
                width: 1,
                kind: DeclKind::Net,
            },
        );
        cs.add_connection(ConnectionChange {
            parent_module: top,
            instance_name: u_sub,
            child_module: sub,
            port_name: port,
            local_signal: port,
        });
        cs.add_port(
            sub,
            PlannedPort {
                name: port,
                direction: PortDirection::Output,
                width: 1,
                kind: DeclKind::Net,
                local_driver_signal: None,
            },
        );
        cs.add_assign(
            sub,
            format!("assign {} = {};", interner.resolve(port), interner.resolve(sig)),
        );

        let out = rewrite(&design, &[(file_id, parsed)], &source_db, &interner, &cs, &sink);
        assert_eq!(out.len(), 1);
        let text = &out[0].text;
        assert!(out[0].succeeded);
        assert!(text.contains("wire __xmr__u_sub_sig;"));
        assert!(text.contains("assign r = __xmr__u_sub_sig;"));
        assert!(text.contains(".__xmr__u_sub_sig(__xmr__u_sub_sig)"));
        assert!(text.contains("module sub(__xmr__u_sub_sig);"));
        assert!(text.contains("output wire __xmr__u_sub_sig;"));
        assert!(text.contains("assign __xmr__u_sub_sig = sig;"));
    }

    #[test]
    fn self_reference_is_a_plain_rename_with_no_ports() {
        let source = "module top;\n  reg sig;\n  assign r = top.sig;\nendmodule\n";
        let (source_db, interner, file_id, parsed, design, sink) = elaborate_one(source);
        let top = interner.get_or_intern("top");

        let mut cs = ChangeSet::new();
        cs.xmr_replacements
            .insert((top, "top.sig".to_string()), "sig".to_string());

        let out = rewrite(&design, &[(file_id, parsed)], &source_db, &interner, &cs, &sink);
        assert_eq!(out[0].text, "module top;\n  reg sig;\n  assign r = sig;\nendmodule\n");
    }

    #[test]
    fn wire_already_present_as_port_is_not_redeclared_in_body() {
        // An absolute XMR whose root instance is its own source module (e.g.
        // `tb_top.uut.counter` written inside `tb_top`) plans both an input
        // port and, via `paths_to(source_module)` resolving to the empty
        // root path, a same-named wire on that module. Declaring both is a
        // duplicate identifier in SystemVerilog; Pass 1 must skip the wire.
        let source = "module top;\nendmodule\n";
        let (source_db, interner, file_id, parsed, design, sink) = elaborate_one(source);
        let top = interner.get_or_intern("top");
        let port = interner.get_or_intern("__xmr__tb_top_uut_counter");

        let mut cs = ChangeSet::new();
        cs.add_port(
            top,
            PlannedPort {
                name: port,
                direction: PortDirection::Input,
                width: 4,
                kind: DeclKind::Net,
                local_driver_signal: None,
            },
        );
        cs.add_wire(
            top,
            PlannedWire {
                name: port,
                width: 4,
                kind: DeclKind::Net,
            },
        );

        let out = rewrite(&design, &[(file_id, parsed)], &source_db, &interner, &cs, &sink);
        assert!(out[0].succeeded);
        let text = &out[0].text;
        assert!(text.contains("input wire [3:0] __xmr__tb_top_uut_counter;"));
        assert!(
            !text.contains("  wire [3:0] __xmr__tb_top_uut_counter;\n"),
            "body must not redeclare the port as a plain wire: {text}"
        );
    }

    #[test]
    fn no_changes_returns_original_text() {
        let source = "module top;\nendmodule\n";
        let (source_db, interner, file_id, parsed, design, sink) = elaborate_one(source);
        let cs = ChangeSet::new();
        let out = rewrite(&design, &[(file_id, parsed)], &source_db, &interner, &cs, &sink);
        assert_eq!(out[0].text, source);
        assert!(out[0].succeeded);
    }
}
