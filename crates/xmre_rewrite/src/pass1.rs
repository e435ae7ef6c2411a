//! Pass 1: every per-module textual addition a `ChangeSet` calls for —
//! new ports appended to the header, new wires declared at the top of the
//! body, new continuous assigns and pipeline register blocks appended
//! before `endmodule`, and the scoped-name substitution edits from
//! [`crate::substitute`].
//!
//! Pass 1 never touches an instantiation's connection list; that is
//! Pass 2's job, and the two must not interleave (an instance's
//! `.portName(...)` list can only grow correctly once every module's own
//! port additions are already decided).

use std::collections::HashMap;

use xmre_common::{Ident, Interner};
use xmre_ir::{Design, DeclKind};
use xmre_plan::ChangeSet;
use xmre_source::{FileId, SourceDb, Span};
use xmre_sv::ast::{PortStyle, SvItem, SvModuleDecl, SvSourceFile};

use crate::edit::Edit;
use crate::substitute::collect_substitutions;

/// Builds every Pass 1 edit for every module in `design`, keyed by the
/// file each edit applies to.
pub fn build_pass1_edits(
    design: &Design,
    files: &[(FileId, SvSourceFile)],
    source_db: &SourceDb,
    interner: &Interner,
    change_set: &ChangeSet,
) -> HashMap<FileId, Vec<Edit>> {
    let mut edits: HashMap<FileId, Vec<Edit>> = HashMap::new();

    for (_, module) in design.iter() {
        let Some((_, file)) = files.iter().find(|(id, _)| *id == module.file) else {
            continue;
        };
        let Some(SvItem::Module(decl)) = file.items.get(module.item_index) else {
            continue;
        };

        let file_edits = edits.entry(module.file).or_default();

        file_edits.extend(collect_substitutions(
            module.name,
            &decl.items,
            source_db,
            &change_set.xmr_replacements,
        ));

        let header_semi = find_header_semicolon(source_db, decl.span);
        let body_insertion = header_semi + 1;

        let new_ports = change_set.ports_to_add.get(&module.name);
        if let Some(ports) = new_ports {
            if let Some(edit) = header_port_edit(decl, header_semi, source_db, ports, interner) {
                file_edits.push(edit);
            }
            if !matches!(decl.port_style, PortStyle::Ansi) {
                let decls: String = ports
                    .iter()
                    .map(|p| {
                        format!(
                            "  {} {};\n",
                            direction_keyword(p.direction),
                            decl_text(p.kind, p.width, interner.resolve(p.name)),
                        )
                    })
                    .collect();
                if !decls.is_empty() {
                    file_edits.push(Edit::insert(body_insertion, decls));
                }
            }
        }

        if let Some(wires) = change_set.wires_to_add.get(&module.name) {
            let decls: String = wires
                .iter()
                .filter(|w| !new_ports.is_some_and(|ports| ports.iter().any(|p| p.name == w.name)))
                .map(|w| {
                    format!(
                        "  {};\n",
                        decl_text(w.kind, w.width, interner.resolve(w.name))
                    )
                })
                .collect();
            if !decls.is_empty() {
                file_edits.push(Edit::insert(body_insertion, decls));
            }
        }

        let endmodule_at = find_endmodule(source_db, decl.span);
        let mut tail = String::new();
        if let Some(assigns) = change_set.assigns_to_add.get(&module.name) {
            for a in assigns {
                tail.push_str("  ");
                tail.push_str(a);
                tail.push('\n');
            }
        }
        if let Some(stages) = change_set.pipe_regs_to_add.get(&module.name) {
            for stage in stages {
                tail.push_str(&pipeline_stage_text(stage, interner));
            }
        }
        if !tail.is_empty() {
            file_edits.push(Edit::insert(endmodule_at, tail));
        }
    }

    edits
}

/// Finds the byte offset of the semicolon that terminates a module's
/// header (after the optional parameter port list and the port list, ANSI
/// or not). Scans for the first top-level `;` outside any paren nesting,
/// which is exactly the one `parse_module` consumes there.
fn find_header_semicolon(source_db: &SourceDb, module_span: Span) -> u32 {
    let text = source_db.snippet(module_span);
    let mut depth = 0i32;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b';' if depth == 0 => return module_span.start + i as u32 + 1,
            _ => {}
        }
    }
    module_span.start
}

/// Finds the byte offset of the start of the module's closing `endmodule`
/// keyword, i.e. where appended body text should be inserted.
fn find_endmodule(source_db: &SourceDb, module_span: Span) -> u32 {
    let text = source_db.snippet(module_span);
    match text.rfind("endmodule") {
        Some(i) => module_span.start + i as u32,
        None => module_span.end,
    }
}

/// Builds the edit that appends new ports to a module's header paren
/// list. For `Ansi` modules the new text is a full port declaration; for
/// `NonAnsi` and `Empty` modules it is a bare name (the matching
/// `input`/`output` declaration is added to the body separately, since
/// that is how those two styles always work).
fn header_port_edit(
    decl: &SvModuleDecl,
    header_semi: u32,
    source_db: &SourceDb,
    ports: &[xmre_plan::PlannedPort],
    interner: &Interner,
) -> Option<Edit> {
    if ports.is_empty() {
        return None;
    }

    match decl.port_style {
        PortStyle::Ansi => {
            let last = decl.ports.last()?;
            let text: String = ports
                .iter()
                .map(|p| {
                    format!(
                        ", {} {}",
                        direction_keyword(p.direction),
                        decl_text(p.kind, p.width, interner.resolve(p.name)),
                    )
                })
                .collect();
            Some(Edit::insert(last.span.end, text))
        }
        PortStyle::NonAnsi | PortStyle::Empty => {
            let close_paren = find_port_list_close_paren(source_db, decl.span, header_semi);
            let names: Vec<&str> = ports.iter().map(|p| interner.resolve(p.name)).collect();
            match close_paren {
                Some((pos, had_ports)) => {
                    let joined = names.join(", ");
                    let text = if had_ports {
                        format!(", {joined}")
                    } else {
                        joined
                    };
                    Some(Edit::insert(pos, text))
                }
                None => {
                    // `module m;` with no parens at all: synthesize one
                    // right before the header's terminating semicolon.
                    let text = format!("({})", names.join(", "));
                    Some(Edit::insert(header_semi - 1, text))
                }
            }
        }
    }
}

/// Looks backward from `header_semi` (the offset just past the header's
/// terminating `;`) for a `(...)` pair immediately preceding it, skipping
/// whitespace. Returns the offset of the closing `)` and whether the list
/// already had at least one name in it. `None` if the header has no
/// parens at all (`module m;`).
fn find_port_list_close_paren(
    source_db: &SourceDb,
    module_span: Span,
    header_semi: u32,
) -> Option<(u32, bool)> {
    let text = source_db.snippet(module_span);
    let local_semi = (header_semi - module_span.start) as usize;
    let before_semi = text[..local_semi].trim_end();
    if !before_semi.ends_with(')') {
        return None;
    }

    let close_local = before_semi.len() - 1;
    let mut depth = 0i32;
    let mut open_local = None;
    for (i, b) in before_semi.bytes().enumerate().rev() {
        match b {
            b')' => depth += 1,
            b'(' => {
                depth -= 1;
                if depth == 0 {
                    open_local = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let open_local = open_local?;
    let had_ports = before_semi[open_local + 1..close_local].trim().len() > 0;
    Some((module_span.start + close_local as u32, had_ports))
}

fn direction_keyword(direction: xmre_ir::PortDirection) -> &'static str {
    match direction {
        xmre_ir::PortDirection::Input => "input",
        xmre_ir::PortDirection::Output => "output",
        xmre_ir::PortDirection::InOut => "inout",
    }
}

fn decl_text(kind: DeclKind, width: u32, name: &str) -> String {
    let kind_kw = match kind {
        DeclKind::Net => "wire",
        DeclKind::Variable => "logic",
    };
    if width > 1 {
        format!("{kind_kw} [{}:0] {name}", width - 1)
    } else {
        format!("{kind_kw} {name}")
    }
}

fn pipeline_stage_text(stage: &xmre_plan::PipelineStage, interner: &Interner) -> String {
    let output = interner.resolve(stage.output_signal);
    let input = interner.resolve(stage.input_signal);
    let clock = interner.resolve(stage.clock);
    let reset = interner.resolve(stage.reset);
    let range = if stage.width > 1 {
        format!("[{}:0] ", stage.width - 1)
    } else {
        String::new()
    };

    let mut out = String::new();
    for i in 0..stage.stage_count {
        out.push_str(&format!("  reg {range}{output}_pipe_{i};\n"));
    }

    let (reset_edge, reset_cond) = if stage.reset_active_low {
        ("negedge", format!("!{reset}"))
    } else {
        ("posedge", reset.to_string())
    };

    out.push_str(&format!(
        "  always @(posedge {clock} or {reset_edge} {reset}) begin\n"
    ));
    out.push_str(&format!("    if ({reset_cond}) begin\n"));
    for i in 0..stage.stage_count {
        out.push_str(&format!("      {output}_pipe_{i} <= '0;\n"));
    }
    out.push_str("    end else begin\n");
    out.push_str(&format!("      {output}_pipe_0 <= {input};\n"));
    for i in 1..stage.stage_count {
        out.push_str(&format!(
            "      {output}_pipe_{i} <= {output}_pipe_{};\n",
            i - 1
        ));
    }
    out.push_str("    end\n");
    out.push_str("  end\n");
    out.push_str(&format!(
        "  assign {output} = {output}_pipe_{};\n",
        stage.stage_count - 1
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_semicolon_found_after_ansi_ports() {
        let interner = Interner::new();
        let source_db = {
            let mut db = SourceDb::new();
            db.add_source("m.sv".into(), "module m(input a, output b);\nendmodule\n".into());
            db
        };
        let span = Span::new(FileId::from_raw(0), 0, source_db.get_file(FileId::from_raw(0)).content.len() as u32);
        let semi = find_header_semicolon(&source_db, span);
        assert_eq!(&source_db.snippet(span)[..semi as usize], "module m(input a, output b);");
        let _ = interner;
    }

    #[test]
    fn endmodule_found_at_end() {
        let mut db = SourceDb::new();
        db.add_source("m.sv".into(), "module m;\n  wire x;\nendmodule\n".into());
        let span = Span::new(FileId::from_raw(0), 0, db.get_file(FileId::from_raw(0)).content.len() as u32);
        let at = find_endmodule(&db, span);
        assert!(db.snippet(Span::new(FileId::from_raw(0), at, at + 9)) == "endmodule");
    }

    #[test]
    fn decl_text_single_bit_has_no_range() {
        assert_eq!(decl_text(DeclKind::Net, 1, "foo"), "wire foo");
    }

    #[test]
    fn decl_text_multi_bit_has_range() {
        assert_eq!(decl_text(DeclKind::Variable, 8, "foo"), "logic [7:0] foo");
    }

    #[test]
    fn pipeline_text_has_one_register_per_stage() {
        let interner = Interner::new();
        let stage = xmre_plan::PipelineStage {
            input_signal: interner.get_or_intern("sig"),
            output_signal: interner.get_or_intern("__xmr__u_sub_sig"),
            width: 8,
            stage_count: 2,
            clock: interner.get_or_intern("clk"),
            reset: interner.get_or_intern("rst_n"),
            reset_active_low: true,
        };
        let text = pipeline_stage_text(&stage, &interner);
        assert_eq!(text.matches("reg ").count(), 2);
        assert!(text.contains("negedge rst_n"));
        assert!(text.contains("!rst_n"));
        assert!(text.contains("__xmr__u_sub_sig_pipe_1"));
    }
}
