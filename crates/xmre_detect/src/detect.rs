//! The XMR Detector (C3).
//!
//! Walks every module declaration's parsed body and records one
//! [`XmrOccurrence`] per hierarchical-value expression it finds, in
//! `always`/`initial`/`generate`/function/task bodies, continuous
//! assignments, and instantiation connections alike.
//!
//! Two structural gaps between what the spec's XMR Detector assumes of its
//! frontend and what `xmre_sv` actually parses are bridged here rather than
//! in a lower layer:
//!
//! - There is no upward/downward resolution annotation on a parsed
//!   `Expr::HierarchicalName` — it is just a flat list of dotted
//!   identifiers. Absolute vs. relative vs. self-reference classification
//!   is inferred structurally: a leading segment that names a direct child
//!   instance of the enclosing module is relative/downward; a leading
//!   segment equal to the enclosing module's own name with nothing else
//!   following is a self-reference; anything else is treated as an
//!   absolute path rooted at that leading segment.
//! - There is no DPI import grammar, so "foreign function call" has no
//!   semantic meaning here. [`crate::callables::CallableDirections`] is
//!   used in its place: any call whose argument lands on a declared
//!   `output`/`inout` formal is the one write-XMR shape this tool
//!   recognizes, regardless of whether the callee is actually foreign.

use std::collections::HashSet;

use xmre_common::{Ident, Interner};
use xmre_diagnostics::DiagnosticSink;
use xmre_hierarchy::HierarchyIndex;
use xmre_ir::{Design, ModuleDefinition};
use xmre_source::{FileId, SourceDb, Span};
use xmre_sv::ast::{
    Direction, Expr, GenerateBlock, ModuleItem, SensitivityList, Statement, SvItem, SvSourceFile,
};

use crate::callables::CallableDirections;
use crate::errors;
use crate::occurrence::{XmrDirection, XmrOccurrence};

/// Walks every module declaration in `files` and returns every hierarchical
/// reference found, deduplicated by `(sourceModule, fullPath)`.
///
/// `module_filter`, when non-empty, restricts detection to the named
/// modules, mirroring the orchestrator's `-m/--module` option; an empty
/// filter detects everywhere.
pub fn detect_xmrs(
    design: &Design,
    hierarchy: &HierarchyIndex,
    files: &[(FileId, SvSourceFile)],
    source_db: &SourceDb,
    interner: &Interner,
    module_filter: &HashSet<Ident>,
    sink: &DiagnosticSink,
) -> Vec<XmrOccurrence> {
    let callables = CallableDirections::build(files);
    let mut out = Vec::new();
    let mut seen: HashSet<(Ident, String)> = HashSet::new();

    for (_, file) in files {
        for item in &file.items {
            let SvItem::Module(decl) = item else {
                continue;
            };
            if !module_filter.is_empty() && !module_filter.contains(&decl.name) {
                continue;
            }
            let Some(module_id) = design.get_by_name(decl.name) else {
                continue;
            };
            let def = design.modules.get(module_id);
            let mut ctx = DetectCtx {
                design,
                hierarchy,
                interner,
                source_db,
                callables: &callables,
                sink,
                source_module: def,
                seen: &mut seen,
                out: &mut out,
            };
            ctx.walk_items(&decl.items);
        }
    }

    out
}

struct DetectCtx<'a> {
    design: &'a Design,
    hierarchy: &'a HierarchyIndex,
    interner: &'a Interner,
    source_db: &'a SourceDb,
    callables: &'a CallableDirections,
    sink: &'a DiagnosticSink,
    source_module: &'a ModuleDefinition,
    seen: &'a mut HashSet<(Ident, String)>,
    out: &'a mut Vec<XmrOccurrence>,
}

impl<'a> DetectCtx<'a> {
    fn walk_items(&mut self, items: &[ModuleItem]) {
        for item in items {
            self.walk_item(item);
        }
    }

    fn walk_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::NetDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref(), XmrDirection::Read);
                }
            }
            ModuleItem::RegDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref(), XmrDirection::Read);
                }
            }
            ModuleItem::VarDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref(), XmrDirection::Read);
                }
            }
            ModuleItem::IntegerDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref(), XmrDirection::Read);
                }
            }
            ModuleItem::RealDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref(), XmrDirection::Read);
                }
            }
            ModuleItem::DefparamDecl(d) => {
                self.visit_expr(&d.target, XmrDirection::Read);
                self.visit_expr(&d.value, XmrDirection::Read);
            }
            ModuleItem::ContinuousAssign(a) => {
                self.visit_expr(&a.target, XmrDirection::Read);
                self.visit_expr(&a.value, XmrDirection::Read);
            }
            ModuleItem::AlwaysBlock(a) => self.walk_statement(&a.body),
            ModuleItem::AlwaysComb(a) => self.walk_statement(&a.body),
            ModuleItem::AlwaysLatch(a) => self.walk_statement(&a.body),
            ModuleItem::AlwaysFf(a) => {
                self.walk_sensitivity(&a.sensitivity);
                self.walk_statement(&a.body);
            }
            ModuleItem::InitialBlock(i) => self.walk_statement(&i.body),
            ModuleItem::Instantiation(inst) => {
                for c in &inst.param_overrides {
                    self.visit_opt(c.actual.as_ref(), XmrDirection::Read);
                }
                for instance in &inst.instances {
                    for c in &instance.connections {
                        self.visit_opt(c.actual.as_ref(), XmrDirection::Read);
                    }
                }
            }
            ModuleItem::GateInst(g) => {
                for p in &g.ports {
                    self.visit_expr(p, XmrDirection::Read);
                }
            }
            ModuleItem::GenerateBlock(g) => match g {
                GenerateBlock::For {
                    init,
                    condition,
                    step,
                    items,
                    ..
                } => {
                    self.walk_statement(init);
                    self.visit_expr(condition, XmrDirection::Read);
                    self.walk_statement(step);
                    self.walk_items(items);
                }
                GenerateBlock::If {
                    condition,
                    then_items,
                    else_items,
                    ..
                } => {
                    self.visit_expr(condition, XmrDirection::Read);
                    self.walk_items(then_items);
                    self.walk_items(else_items);
                }
            },
            ModuleItem::FunctionDecl(f) => {
                self.walk_items(&f.decls);
                for s in &f.body {
                    self.walk_statement(s);
                }
            }
            ModuleItem::TaskDecl(t) => {
                self.walk_items(&t.decls);
                for s in &t.body {
                    self.walk_statement(s);
                }
            }
            ModuleItem::ParameterDecl(_)
            | ModuleItem::LocalparamDecl(_)
            | ModuleItem::PortDecl(_)
            | ModuleItem::GenvarDecl(_)
            | ModuleItem::TypedefDecl(_)
            | ModuleItem::Import(_)
            | ModuleItem::ModportDecl(_)
            | ModuleItem::Error(_) => {}
            ModuleItem::Assertion(a) => {
                self.visit_expr(&a.condition, XmrDirection::Read);
                if let Some(s) = &a.pass_stmt {
                    self.walk_statement(s);
                }
                if let Some(s) = &a.fail_stmt {
                    self.walk_statement(s);
                }
            }
        }
    }

    fn walk_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Blocking { target, value, .. }
            | Statement::NonBlocking { target, value, .. } => {
                self.visit_expr(target, XmrDirection::Read);
                self.visit_expr(value, XmrDirection::Read);
            }
            Statement::CompoundAssign { target, value, .. } => {
                self.visit_expr(target, XmrDirection::Read);
                self.visit_expr(value, XmrDirection::Read);
            }
            Statement::IncrDecr { operand, .. } => {
                self.visit_expr(operand, XmrDirection::Read);
            }
            Statement::Block { decls, stmts, .. } => {
                self.walk_items(decls);
                for s in stmts {
                    self.walk_statement(s);
                }
            }
            Statement::If {
                condition,
                then_stmt,
                else_stmt,
                ..
            } => {
                self.visit_expr(condition, XmrDirection::Read);
                self.walk_statement(then_stmt);
                if let Some(s) = else_stmt {
                    self.walk_statement(s);
                }
            }
            Statement::Case { expr, arms, .. } => {
                self.visit_expr(expr, XmrDirection::Read);
                for arm in arms {
                    for p in &arm.patterns {
                        self.visit_expr(p, XmrDirection::Read);
                    }
                    self.walk_statement(&arm.body);
                }
            }
            Statement::For {
                init,
                condition,
                step,
                body,
                ..
            } => {
                self.walk_statement(init);
                self.visit_expr(condition, XmrDirection::Read);
                self.walk_statement(step);
                self.walk_statement(body);
            }
            Statement::While { condition, body, .. } => {
                self.visit_expr(condition, XmrDirection::Read);
                self.walk_statement(body);
            }
            Statement::DoWhile { body, condition, .. } => {
                self.walk_statement(body);
                self.visit_expr(condition, XmrDirection::Read);
            }
            Statement::Forever { body, .. } => self.walk_statement(body),
            Statement::Repeat { count, body, .. } => {
                self.visit_expr(count, XmrDirection::Read);
                self.walk_statement(body);
            }
            Statement::Foreach { array, body, .. } => {
                self.visit_expr(array, XmrDirection::Read);
                self.walk_statement(body);
            }
            Statement::Wait {
                condition, body, ..
            } => {
                self.visit_expr(condition, XmrDirection::Read);
                if let Some(s) = body {
                    self.walk_statement(s);
                }
            }
            Statement::EventControl {
                sensitivity, body, ..
            } => {
                self.walk_sensitivity(sensitivity);
                self.walk_statement(body);
            }
            Statement::Delay { delay, body, .. } => {
                self.visit_expr(delay, XmrDirection::Read);
                self.walk_statement(body);
            }
            Statement::TaskCall { name, args, .. } => {
                // The statement grammar folds a procedural call's argument
                // list into `name` as an `Expr::FuncCall` (it cannot tell a
                // task call from a function call used as a statement
                // without consulting declarations); `args` here is always
                // empty. Visiting `name` dispatches into the `FuncCall`
                // case below, which does the real per-argument direction
                // lookup.
                self.visit_expr(name, XmrDirection::Read);
                for a in args {
                    self.visit_expr(a, XmrDirection::Read);
                }
            }
            Statement::SystemTaskCall { args, .. } => {
                for a in args {
                    self.visit_expr(a, XmrDirection::Read);
                }
            }
            Statement::Return { value, .. } => {
                self.visit_opt(value.as_ref(), XmrDirection::Read);
            }
            Statement::Assertion(a) => {
                self.visit_expr(&a.condition, XmrDirection::Read);
                if let Some(s) = &a.pass_stmt {
                    self.walk_statement(s);
                }
                if let Some(s) = &a.fail_stmt {
                    self.walk_statement(s);
                }
            }
            Statement::LocalVarDecl(v) => {
                for n in &v.names {
                    self.visit_opt(n.init.as_ref(), XmrDirection::Read);
                }
            }
            Statement::Disable { .. }
            | Statement::Break { .. }
            | Statement::Continue { .. }
            | Statement::Null { .. }
            | Statement::Error(_) => {}
        }
    }

    fn walk_sensitivity(&mut self, sensitivity: &SensitivityList) {
        if let SensitivityList::List(items) = sensitivity {
            for item in items {
                self.visit_expr(&item.signal, XmrDirection::Read);
            }
        }
    }

    fn visit_opt(&mut self, expr: Option<&Expr>, dir: XmrDirection) {
        if let Some(e) = expr {
            self.visit_expr(e, dir);
        }
    }

    fn visit_call(&mut self, name: &Expr, args: &[Expr]) {
        let callee = callee_ident(name);
        for (i, arg) in args.iter().enumerate() {
            let dir = callee
                .and_then(|c| self.callables.direction_of(c, i))
                .map(|d| match d {
                    Direction::Output | Direction::Inout => XmrDirection::Write,
                    Direction::Input => XmrDirection::Read,
                })
                .unwrap_or(XmrDirection::Read);
            self.visit_expr(arg, dir);
        }
    }

    fn visit_expr(&mut self, expr: &Expr, dir: XmrDirection) {
        match expr {
            Expr::HierarchicalName { parts, span } => self.record(parts, *span, dir),
            Expr::Identifier { .. }
            | Expr::ScopedIdent { .. }
            | Expr::Literal { .. }
            | Expr::RealLiteral { .. }
            | Expr::StringLiteral { .. }
            | Expr::Error(_) => {}
            Expr::Index { base, index, .. } => {
                self.visit_expr(base, dir);
                self.visit_expr(index, XmrDirection::Read);
            }
            Expr::RangeSelect { base, msb, lsb, .. } => {
                self.visit_expr(base, dir);
                self.visit_expr(msb, XmrDirection::Read);
                self.visit_expr(lsb, XmrDirection::Read);
            }
            Expr::PartSelect {
                base, index, width, ..
            } => {
                self.visit_expr(base, dir);
                self.visit_expr(index, XmrDirection::Read);
                self.visit_expr(width, XmrDirection::Read);
            }
            Expr::Concat { elements, .. } => {
                for e in elements {
                    self.visit_expr(e, XmrDirection::Read);
                }
            }
            Expr::Repeat {
                count, elements, ..
            } => {
                self.visit_expr(count, XmrDirection::Read);
                for e in elements {
                    self.visit_expr(e, XmrDirection::Read);
                }
            }
            Expr::Unary { operand, .. } => self.visit_expr(operand, XmrDirection::Read),
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left, XmrDirection::Read);
                self.visit_expr(right, XmrDirection::Read);
            }
            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                self.visit_expr(condition, XmrDirection::Read);
                self.visit_expr(then_expr, dir);
                self.visit_expr(else_expr, dir);
            }
            Expr::Inside { expr, ranges, .. } => {
                self.visit_expr(expr, XmrDirection::Read);
                for r in ranges {
                    self.visit_expr(r, XmrDirection::Read);
                }
            }
            Expr::Cast { expr, .. } => self.visit_expr(expr, XmrDirection::Read),
            Expr::FuncCall { name, args, .. } => {
                self.visit_call(name, args);
                self.visit_expr(name, XmrDirection::Read);
            }
            Expr::SystemCall { args, .. } => {
                for a in args {
                    self.visit_expr(a, XmrDirection::Read);
                }
            }
            Expr::Paren { inner, .. } => self.visit_expr(inner, dir),
        }
    }

    fn record(&mut self, parts: &[Ident], span: Span, direction: XmrDirection) {
        let full_path = self.source_db.snippet(span).to_string();
        let key = (self.source_module.name, full_path.clone());
        if !self.seen.insert(key) {
            self.sink.emit(errors::warning_duplicate_detection(
                self.interner.resolve(self.source_module.name),
                &full_path,
                span,
            ));
            return;
        }

        let first = parts[0];
        let target_signal = *parts.last().expect("HierarchicalName has >= 2 parts");

        let is_local_instance = self
            .source_module
            .instances
            .iter()
            .any(|i| i.instance_name == first);

        let (path_segments, absolute) = if is_local_instance {
            (parts[..parts.len() - 1].to_vec(), false)
        } else if first == self.source_module.name && parts.len() == 2 {
            (Vec::new(), false)
        } else {
            (parts[..parts.len() - 1].to_vec(), true)
        };

        let target_module = self.resolve_chain(&path_segments, absolute);
        let resolved = target_module
            .and_then(|m| self.design.get_by_name(m))
            .map(|id| self.design.modules.get(id))
            .and_then(|def| def.resolve_symbol(target_signal));

        if resolved.is_none() {
            self.sink.emit(errors::warning_unresolved_target(
                self.interner.resolve(self.source_module.name),
                &full_path,
                span,
            ));
        }
        let bit_width = resolved.map(|(w, _)| w).unwrap_or(1);

        self.out.push(XmrOccurrence {
            source_module: self.source_module.name,
            path_segments,
            target_signal,
            target_module,
            full_path,
            bit_width,
            direction,
            absolute,
            span,
        });
    }

    /// Walks `path_segments` through the hierarchy index and returns the
    /// name of the module they resolve to, or `None` if any hop fails or
    /// the path refers to the source module itself (a self-reference).
    fn resolve_chain(&self, path_segments: &[Ident], absolute: bool) -> Option<Ident> {
        if path_segments.is_empty() {
            return Some(self.source_module.name);
        }
        let (start, hops): (Ident, &[Ident]) = if absolute {
            (path_segments[0], &path_segments[1..])
        } else {
            (self.source_module.name, path_segments)
        };
        let mut current = start;
        for &hop in hops {
            current = self.hierarchy.child_of(current, hop, self.interner).ok()?;
        }
        Some(current)
    }
}

fn callee_ident(expr: &Expr) -> Option<Ident> {
    match expr {
        Expr::Identifier { name, .. } => Some(*name),
        Expr::ScopedIdent { name, .. } => Some(*name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmre_diagnostics::DiagnosticSink;
    use xmre_source::SourceDb;
    use xmre_sv::parse_file;

    struct Fixture {
        design: Design,
        hierarchy: HierarchyIndex,
        files: Vec<(FileId, SvSourceFile)>,
        source_db: SourceDb,
        interner: Interner,
    }

    fn build(sources: &[(&str, &str)]) -> Fixture {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let mut source_db = SourceDb::new();
        let mut files = Vec::new();
        for (name, text) in sources {
            let id = source_db.add_source(*name, (*text).to_string());
            let parsed = parse_file(id, &source_db, &interner, &sink);
            files.push((id, parsed));
        }
        let design = xmre_elaborate::elaborate(&files, &source_db, &interner, &sink);
        let hierarchy = HierarchyIndex::build(&design);
        Fixture {
            design,
            hierarchy,
            files,
            source_db,
            interner,
        }
    }

    fn path_text(occ: &XmrOccurrence, fixture: &Fixture) -> Vec<String> {
        occ.path_segments
            .iter()
            .map(|i| fixture.interner.resolve(*i).to_string())
            .collect()
    }

    #[test]
    fn downward_reference_resolves_target_and_width() {
        let fx = build(&[(
            "t.sv",
            "module sub(input logic clk);
                logic [7:0] data;
            endmodule

            module top(input logic clk);
                sub u_sub(.clk(clk));
                logic [7:0] snoop;
                always_comb snoop = u_sub.data;
            endmodule",
        )]);
        let sink = DiagnosticSink::new();
        let filter = HashSet::new();
        let occs = detect_xmrs(
            &fx.design,
            &fx.hierarchy,
            &fx.files,
            &fx.source_db,
            &fx.interner,
            &filter,
            &sink,
        );
        let hit = occs
            .iter()
            .find(|o| o.full_path == "u_sub.data")
            .expect("u_sub.data detected");
        assert!(!hit.absolute);
        assert_eq!(path_text(hit, &fx), vec!["u_sub"]);
        assert_eq!(hit.bit_width, 8);
        assert_eq!(hit.direction, XmrDirection::Read);
        assert_eq!(
            fx.interner.resolve(hit.target_module.unwrap()),
            "sub"
        );
        assert!(!sink.has_errors());
    }

    #[test]
    fn absolute_reference_to_testbench_root() {
        let fx = build(&[(
            "tb.sv",
            "module dut(input logic clk);
                logic [3:0] counter;
            endmodule

            module tb_top;
                logic clock;
                logic reset;
                dut uut(.clk(clock));
                initial begin
                    if (tb_top.uut.counter == 0) clock = 0;
                end
            endmodule",
        )]);
        let sink = DiagnosticSink::new();
        let filter = HashSet::new();
        let occs = detect_xmrs(
            &fx.design,
            &fx.hierarchy,
            &fx.files,
            &fx.source_db,
            &fx.interner,
            &filter,
            &sink,
        );
        let hit = occs
            .iter()
            .find(|o| o.full_path == "tb_top.uut.counter")
            .expect("tb_top.uut.counter detected");
        assert!(hit.absolute);
        assert_eq!(path_text(hit, &fx), vec!["tb_top", "uut"]);
        assert_eq!(hit.bit_width, 4);
    }

    #[test]
    fn self_reference_has_no_path_segments() {
        let fx = build(&[(
            "top.sv",
            "module top;
                logic clock;
                initial begin
                    if (top.clock) clock = 0;
                end
            endmodule",
        )]);
        let sink = DiagnosticSink::new();
        let filter = HashSet::new();
        let occs = detect_xmrs(
            &fx.design,
            &fx.hierarchy,
            &fx.files,
            &fx.source_db,
            &fx.interner,
            &filter,
            &sink,
        );
        let hit = occs
            .iter()
            .find(|o| o.full_path == "top.clock")
            .expect("top.clock detected");
        assert!(hit.is_self_reference());
        assert!(!hit.absolute);
    }

    #[test]
    fn array_suffix_is_excluded_from_full_path() {
        let fx = build(&[(
            "t.sv",
            "module sub;
                logic [7:0] data;
            endmodule

            module top;
                sub u_sub();
                logic b;
                always_comb b = u_sub.data[3];
            endmodule",
        )]);
        let sink = DiagnosticSink::new();
        let filter = HashSet::new();
        let occs = detect_xmrs(
            &fx.design,
            &fx.hierarchy,
            &fx.files,
            &fx.source_db,
            &fx.interner,
            &filter,
            &sink,
        );
        let hit = occs
            .iter()
            .find(|o| o.full_path == "u_sub.data")
            .expect("u_sub.data detected without the array suffix");
        assert_eq!(hit.target_signal, fx.interner.get_or_intern("data"));
    }

    #[test]
    fn output_argument_of_call_is_classified_as_write() {
        let fx = build(&[(
            "t.sv",
            "module sub;
                logic [7:0] data;
            endmodule

            module top;
                sub u_sub();
                function automatic void poke(output logic [7:0] v);
                endfunction
                initial poke(u_sub.data);
            endmodule",
        )]);
        let sink = DiagnosticSink::new();
        let filter = HashSet::new();
        let occs = detect_xmrs(
            &fx.design,
            &fx.hierarchy,
            &fx.files,
            &fx.source_db,
            &fx.interner,
            &filter,
            &sink,
        );
        let hit = occs
            .iter()
            .find(|o| o.full_path == "u_sub.data")
            .expect("u_sub.data detected");
        assert_eq!(hit.direction, XmrDirection::Write);
    }

    #[test]
    fn duplicate_occurrence_in_same_module_is_dropped() {
        let fx = build(&[(
            "t.sv",
            "module sub;
                logic [7:0] data;
            endmodule

            module top;
                sub u_sub();
                logic a, b;
                always_comb begin
                    a = u_sub.data;
                    b = u_sub.data;
                end
            endmodule",
        )]);
        let sink = DiagnosticSink::new();
        let filter = HashSet::new();
        let occs = detect_xmrs(
            &fx.design,
            &fx.hierarchy,
            &fx.files,
            &fx.source_db,
            &fx.interner,
            &filter,
            &sink,
        );
        let hits: Vec<_> = occs.iter().filter(|o| o.full_path == "u_sub.data").collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn module_filter_restricts_detection() {
        let fx = build(&[(
            "t.sv",
            "module sub;
                logic [7:0] data;
            endmodule

            module top;
                sub u_sub();
                logic a;
                always_comb a = u_sub.data;
            endmodule",
        )]);
        let sink = DiagnosticSink::new();
        let mut filter = HashSet::new();
        filter.insert(fx.interner.get_or_intern("sub"));
        let occs = detect_xmrs(
            &fx.design,
            &fx.hierarchy,
            &fx.files,
            &fx.source_db,
            &fx.interner,
            &filter,
            &sink,
        );
        assert!(occs.is_empty());
    }
}
