//! Pass 1's per-scoped-name-expression substitution: an independent walk
//! over a module's body that finds every `Expr::HierarchicalName` and, if
//! its exact source text is a key in the planner's replacement map,
//! queues an [`Edit`] swapping it for the generated port/signal name.
//!
//! This cannot reuse `XmrOccurrence::span`: the Detector dedups by
//! `(sourceModule, fullPath)` and drops the span of every repeat
//! occurrence of the same text, but every one of those repeats is a
//! separate token range in the source that still needs rewriting. So
//! this walk mirrors the Detector's own traversal shape instead of
//! consuming its output.

use std::collections::HashMap;

use xmre_common::Ident;
use xmre_source::SourceDb;
use xmre_sv::ast::{Expr, GenerateBlock, ModuleItem, SensitivityList, Statement};

use crate::edit::Edit;

/// Walks `items` (a module's, function's, or generate block's body) and
/// returns one [`Edit`] per hierarchical-name expression whose text has a
/// recorded replacement for `module_name`.
pub fn collect_substitutions(
    module_name: Ident,
    items: &[ModuleItem],
    source_db: &SourceDb,
    replacements: &HashMap<(Ident, String), String>,
) -> Vec<Edit> {
    let mut ctx = SubstCtx {
        module_name,
        source_db,
        replacements,
        edits: Vec::new(),
    };
    ctx.walk_items(items);
    ctx.edits
}

struct SubstCtx<'a> {
    module_name: Ident,
    source_db: &'a SourceDb,
    replacements: &'a HashMap<(Ident, String), String>,
    edits: Vec<Edit>,
}

impl<'a> SubstCtx<'a> {
    fn walk_items(&mut self, items: &[ModuleItem]) {
        for item in items {
            self.walk_item(item);
        }
    }

    fn walk_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::NetDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref());
                }
            }
            ModuleItem::RegDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref());
                }
            }
            ModuleItem::VarDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref());
                }
            }
            ModuleItem::IntegerDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref());
                }
            }
            ModuleItem::RealDecl(d) => {
                for n in &d.names {
                    self.visit_opt(n.init.as_ref());
                }
            }
            ModuleItem::DefparamDecl(d) => {
                self.visit_expr(&d.target);
                self.visit_expr(&d.value);
            }
            ModuleItem::ContinuousAssign(a) => {
                self.visit_expr(&a.target);
                self.visit_expr(&a.value);
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
                    self.visit_opt(c.actual.as_ref());
                }
                for instance in &inst.instances {
                    for c in &instance.connections {
                        self.visit_opt(c.actual.as_ref());
                    }
                }
            }
            ModuleItem::GateInst(g) => {
                for p in &g.ports {
                    self.visit_expr(p);
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
                    self.visit_expr(condition);
                    self.walk_statement(step);
                    self.walk_items(items);
                }
                GenerateBlock::If {
                    condition,
                    then_items,
                    else_items,
                    ..
                } => {
                    self.visit_expr(condition);
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
                self.visit_expr(&a.condition);
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
                self.visit_expr(target);
                self.visit_expr(value);
            }
            Statement::CompoundAssign { target, value, .. } => {
                self.visit_expr(target);
                self.visit_expr(value);
            }
            Statement::IncrDecr { operand, .. } => self.visit_expr(operand),
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
                self.visit_expr(condition);
                self.walk_statement(then_stmt);
                if let Some(s) = else_stmt {
                    self.walk_statement(s);
                }
            }
            Statement::Case { expr, arms, .. } => {
                self.visit_expr(expr);
                for arm in arms {
                    for p in &arm.patterns {
                        self.visit_expr(p);
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
                self.visit_expr(condition);
                self.walk_statement(step);
                self.walk_statement(body);
            }
            Statement::While { condition, body, .. } => {
                self.visit_expr(condition);
                self.walk_statement(body);
            }
            Statement::DoWhile { body, condition, .. } => {
                self.walk_statement(body);
                self.visit_expr(condition);
            }
            Statement::Forever { body, .. } => self.walk_statement(body),
            Statement::Repeat { count, body, .. } => {
                self.visit_expr(count);
                self.walk_statement(body);
            }
            Statement::Foreach { array, body, .. } => {
                self.visit_expr(array);
                self.walk_statement(body);
            }
            Statement::Wait { condition, body, .. } => {
                self.visit_expr(condition);
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
                self.visit_expr(delay);
                self.walk_statement(body);
            }
            Statement::TaskCall { name, args, .. } => {
                self.visit_expr(name);
                for a in args {
                    self.visit_expr(a);
                }
            }
            Statement::SystemTaskCall { args, .. } => {
                for a in args {
                    self.visit_expr(a);
                }
            }
            Statement::Return { value, .. } => self.visit_opt(value.as_ref()),
            Statement::Assertion(a) => {
                self.visit_expr(&a.condition);
                if let Some(s) = &a.pass_stmt {
                    self.walk_statement(s);
                }
                if let Some(s) = &a.fail_stmt {
                    self.walk_statement(s);
                }
            }
            Statement::LocalVarDecl(v) => {
                for n in &v.names {
                    self.visit_opt(n.init.as_ref());
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
                self.visit_expr(&item.signal);
            }
        }
    }

    fn visit_opt(&mut self, expr: Option<&Expr>) {
        if let Some(e) = expr {
            self.visit_expr(e);
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::HierarchicalName { span, .. } => {
                let text = self.source_db.snippet(*span).to_string();
                if let Some(replacement) = self
                    .replacements
                    .get(&(self.module_name, text))
                {
                    self.edits.push(Edit::replace(*span, replacement.clone()));
                }
            }
            Expr::Identifier { .. }
            | Expr::ScopedIdent { .. }
            | Expr::Literal { .. }
            | Expr::RealLiteral { .. }
            | Expr::StringLiteral { .. }
            | Expr::Error(_) => {}
            Expr::Index { base, index, .. } => {
                self.visit_expr(base);
                self.visit_expr(index);
            }
            Expr::RangeSelect { base, msb, lsb, .. } => {
                self.visit_expr(base);
                self.visit_expr(msb);
                self.visit_expr(lsb);
            }
            Expr::PartSelect {
                base, index, width, ..
            } => {
                self.visit_expr(base);
                self.visit_expr(index);
                self.visit_expr(width);
            }
            Expr::Concat { elements, .. } => {
                for e in elements {
                    self.visit_expr(e);
                }
            }
            Expr::Repeat {
                count, elements, ..
            } => {
                self.visit_expr(count);
                for e in elements {
                    self.visit_expr(e);
                }
            }
            Expr::Unary { operand, .. } => self.visit_expr(operand),
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                self.visit_expr(condition);
                self.visit_expr(then_expr);
                self.visit_expr(else_expr);
            }
            Expr::Inside { expr, ranges, .. } => {
                self.visit_expr(expr);
                for r in ranges {
                    self.visit_expr(r);
                }
            }
            Expr::Cast { expr, .. } => self.visit_expr(expr),
            Expr::FuncCall { name, args, .. } => {
                self.visit_expr(name);
                for a in args {
                    self.visit_expr(a);
                }
            }
            Expr::SystemCall { args, .. } => {
                for a in args {
                    self.visit_expr(a);
                }
            }
            Expr::Paren { inner, .. } => self.visit_expr(inner),
        }
    }
}
