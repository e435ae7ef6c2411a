//! Per-argument direction lookup for declared functions and tasks.
//!
//! `xmre_sv` has no DPI import grammar at all, so there is no notion of a
//! "foreign" function distinct from an ordinary one. This registry scans
//! every function/task declaration in the input file set uniformly: if a
//! call's argument lands on a formal declared `output` or `inout`, the
//! argument is treated as a write regardless of whether the callee is
//! actually foreign. That is the one shape of write-XMR this tool
//! recognizes, matching the narrowed scope of write detection.

use std::collections::HashMap;

use xmre_common::Ident;
use xmre_source::FileId;
use xmre_sv::ast::{Direction, ModuleItem, SvItem, SvSourceFile};

/// Per-position argument directions for every declared function/task,
/// keyed by callee name.
#[derive(Debug, Default)]
pub struct CallableDirections {
    by_name: HashMap<Ident, Vec<Direction>>,
}

impl CallableDirections {
    /// Scans every module and package body across `files` for function and
    /// task declarations, including those nested inside `generate` blocks.
    pub fn build(files: &[(FileId, SvSourceFile)]) -> Self {
        let mut by_name = HashMap::new();
        for (_, file) in files {
            for item in &file.items {
                match item {
                    SvItem::Module(m) => collect_items(&m.items, &mut by_name),
                    SvItem::Package(p) => collect_items(&p.items, &mut by_name),
                    _ => {}
                }
            }
        }
        Self { by_name }
    }

    /// Direction of the `index`-th formal argument of `name`, if known.
    pub fn direction_of(&self, name: Ident, index: usize) -> Option<Direction> {
        self.by_name.get(&name)?.get(index).copied()
    }
}

fn collect_items(items: &[ModuleItem], by_name: &mut HashMap<Ident, Vec<Direction>>) {
    for item in items {
        match item {
            ModuleItem::FunctionDecl(f) => {
                by_name.insert(f.name, f.inputs.iter().map(|p| p.direction).collect());
            }
            ModuleItem::TaskDecl(t) => {
                by_name.insert(t.name, t.ports.iter().map(|p| p.direction).collect());
            }
            ModuleItem::GenerateBlock(g) => match g {
                xmre_sv::ast::GenerateBlock::For { items, .. } => collect_items(items, by_name),
                xmre_sv::ast::GenerateBlock::If {
                    then_items,
                    else_items,
                    ..
                } => {
                    collect_items(then_items, by_name);
                    collect_items(else_items, by_name);
                }
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmre_common::Interner;
    use xmre_diagnostics::DiagnosticSink;
    use xmre_source::SourceDb;
    use xmre_sv::parse_file;

    #[test]
    fn finds_output_argument_direction() {
        let interner = Interner::new();
        let mut db = SourceDb::new();
        let sink = DiagnosticSink::new();
        let file_id = db.add_source(
            "dpi.sv",
            "module top; function automatic void poke(input int a, output int b); endfunction endmodule"
                .to_string(),
        );
        let parsed = parse_file(file_id, &db, &interner, &sink);
        let callables = CallableDirections::build(&[(file_id, parsed)]);
        let poke = interner.get_or_intern("poke");
        assert_eq!(callables.direction_of(poke, 0), Some(Direction::Input));
        assert_eq!(callables.direction_of(poke, 1), Some(Direction::Output));
        assert_eq!(callables.direction_of(poke, 2), None);
    }

    #[test]
    fn unknown_callee_is_none() {
        let callables = CallableDirections::default();
        let interner = Interner::new();
        let name = interner.get_or_intern("nope");
        assert_eq!(callables.direction_of(name, 0), None);
    }
}
