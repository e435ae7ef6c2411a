//! The Elaboration Facade (C1).
//!
//! Wraps the hand-rolled SystemVerilog frontend and produces a flat
//! [`Design`]: one [`ModuleDefinition`] per module declaration found across
//! the input file set, with port/signal bit widths resolved as far as
//! constant folding allows and direct child instances linked to their
//! defining [`ModuleId`] wherever the instantiated module type is itself
//! part of the input set.
//!
//! This facade does not expand `generate` blocks, does not follow
//! `defparam`, and does not resolve interface modports — none of those
//! affect which signals are reachable by a hierarchical reference, which is
//! all downstream stages need from elaboration here.

use std::collections::{HashMap, HashSet};

use xmre_common::{Ident, Interner};
use xmre_diagnostics::DiagnosticSink;
use xmre_ir::{DeclKind, Design, Instance, ModuleDefinition, ModuleId, Port, PortDirection, Signal};
use xmre_source::{FileId, SourceDb, Span};
use xmre_sv::ast::{
    Direction, ModuleItem, PortStyle, Range, SvItem, SvModuleDecl, SvPortDecl, SvPortType,
    SvSourceFile, VarDecl, VarType,
};

use crate::const_eval::{self, ConstEnv};
use crate::errors;

/// Elaborates a set of parsed source files into a flat [`Design`].
pub fn elaborate(
    files: &[(FileId, SvSourceFile)],
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Design {
    let mut design = Design::new();
    let mut seen_names: HashSet<Ident> = HashSet::new();

    for (file_id, source_file) in files {
        for (item_index, item) in source_file.items.iter().enumerate() {
            let SvItem::Module(decl) = item else {
                continue;
            };
            if !seen_names.insert(decl.name) {
                sink.emit(errors::warning_duplicate_module(
                    interner.resolve(decl.name),
                    decl.span,
                ));
            }
            let def = elaborate_module(decl, *file_id, item_index, source_db, interner, sink);
            design.insert(def);
        }
    }

    link_instances(&mut design);
    design
}

/// Second pass: resolves every instance's `module_name` against the set of
/// module names now known to `design`, leaving `None` for module types that
/// were never declared in the input set (external IP, blackboxes).
fn link_instances(design: &mut Design) {
    let name_to_id: HashMap<Ident, ModuleId> =
        design.iter().map(|(id, m)| (m.name, id)).collect();
    let ids: Vec<ModuleId> = design.iter().map(|(id, _)| id).collect();

    for id in ids {
        let resolved: Vec<Option<ModuleId>> = design
            .modules
            .get(id)
            .instances
            .iter()
            .map(|inst| name_to_id.get(&inst.module_name).copied())
            .collect();
        let def = design.modules.get_mut(id);
        for (inst, module) in def.instances.iter_mut().zip(resolved) {
            inst.module = module;
        }
    }
}

fn elaborate_module(
    decl: &SvModuleDecl,
    file: FileId,
    item_index: usize,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> ModuleDefinition {
    let mut const_env = ConstEnv::new();
    for param in &decl.params {
        let value = param
            .value
            .as_ref()
            .and_then(|v| const_eval::eval_const_expr(v, source_db, interner, &const_env))
            .unwrap_or(0);
        const_eval::bind_parameter(&mut const_env, param.name, value);
    }

    let ports = build_ports(decl, source_db, interner, &const_env, sink);

    let mut signals = Vec::new();
    let mut instances = Vec::new();
    for item in &decl.items {
        elaborate_item(
            item,
            source_db,
            interner,
            &const_env,
            &mut signals,
            &mut instances,
            sink,
        );
    }

    ModuleDefinition {
        id: ModuleId::from_raw(0),
        name: decl.name,
        file,
        item_index,
        ports,
        signals,
        instances,
        span: decl.span,
    }
}

/// Builds the port list, covering both ANSI (`decl.ports`) and non-ANSI
/// (`decl.port_names` + body `ModuleItem::PortDecl`s) header styles.
fn build_ports(
    decl: &SvModuleDecl,
    source_db: &SourceDb,
    interner: &Interner,
    const_env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Vec<Port> {
    let mut ports = Vec::new();

    if decl.port_style == PortStyle::NonAnsi {
        let mut body_decls: HashMap<Ident, &SvPortDecl> = HashMap::new();
        for item in &decl.items {
            if let ModuleItem::PortDecl(pd) = item {
                for &name in &pd.names {
                    body_decls.insert(name, pd);
                }
            }
        }
        for &name in &decl.port_names {
            // A header name with no matching body declaration is a
            // frontend/user error this facade does not police.
            if let Some(pd) = body_decls.get(&name) {
                ports.push(build_port(pd, name, source_db, interner, const_env, sink));
            }
        }
    } else {
        for pd in &decl.ports {
            for &name in &pd.names {
                ports.push(build_port(pd, name, source_db, interner, const_env, sink));
            }
        }
    }

    ports
}

fn build_port(
    pd: &SvPortDecl,
    name: Ident,
    source_db: &SourceDb,
    interner: &Interner,
    const_env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Port {
    let direction = match pd.direction {
        Direction::Input => PortDirection::Input,
        Direction::Output => PortDirection::Output,
        Direction::Inout => PortDirection::InOut,
    };
    let kind = match pd.port_type {
        SvPortType::Net(_) | SvPortType::Implicit => DeclKind::Net,
        SvPortType::Var(_) | SvPortType::InterfacePort { .. } => DeclKind::Variable,
    };
    let width = resolve_range_width(
        &pd.range,
        source_db,
        interner,
        const_env,
        interner.resolve(name),
        pd.span,
        sink,
    );
    Port {
        name,
        direction,
        width,
        kind,
        span: pd.span,
    }
}

fn elaborate_item(
    item: &ModuleItem,
    source_db: &SourceDb,
    interner: &Interner,
    const_env: &ConstEnv,
    signals: &mut Vec<Signal>,
    instances: &mut Vec<Instance>,
    sink: &DiagnosticSink,
) {
    match item {
        ModuleItem::NetDecl(net) => {
            let width = resolve_range_width(
                &net.range,
                source_db,
                interner,
                const_env,
                "net declaration",
                net.span,
                sink,
            );
            for dn in &net.names {
                signals.push(Signal {
                    name: dn.name,
                    width,
                    kind: DeclKind::Net,
                    span: dn.span,
                });
            }
        }
        ModuleItem::RegDecl(reg) => {
            let width = resolve_range_width(
                &reg.range,
                source_db,
                interner,
                const_env,
                "reg declaration",
                reg.span,
                sink,
            );
            for dn in &reg.names {
                signals.push(Signal {
                    name: dn.name,
                    width,
                    kind: DeclKind::Variable,
                    span: dn.span,
                });
            }
        }
        ModuleItem::VarDecl(vd) => {
            let width = resolve_var_width(vd, source_db, interner, const_env, sink);
            for dn in &vd.names {
                signals.push(Signal {
                    name: dn.name,
                    width,
                    kind: DeclKind::Variable,
                    span: dn.span,
                });
            }
        }
        ModuleItem::IntegerDecl(idecl) => {
            for dn in &idecl.names {
                signals.push(Signal {
                    name: dn.name,
                    width: 32,
                    kind: DeclKind::Variable,
                    span: dn.span,
                });
            }
        }
        ModuleItem::RealDecl(rdecl) => {
            for dn in &rdecl.names {
                signals.push(Signal {
                    name: dn.name,
                    width: 64,
                    kind: DeclKind::Variable,
                    span: dn.span,
                });
            }
        }
        ModuleItem::Instantiation(inst) => {
            for instance in &inst.instances {
                instances.push(Instance {
                    instance_name: instance.name,
                    module_name: inst.module_name,
                    module: None,
                    span: instance.span,
                });
            }
        }
        _ => {}
    }
}

fn resolve_var_width(
    vd: &VarDecl,
    source_db: &SourceDb,
    interner: &Interner,
    const_env: &ConstEnv,
    sink: &DiagnosticSink,
) -> u32 {
    match vd.var_type {
        VarType::Byte => 8,
        VarType::Shortint => 16,
        VarType::Int | VarType::Integer => 32,
        VarType::Longint => 64,
        VarType::Real => 64,
        VarType::Logic | VarType::Bit | VarType::Reg => resolve_range_width(
            &vd.range,
            source_db,
            interner,
            const_env,
            "variable declaration",
            vd.span,
            sink,
        ),
    }
}

fn resolve_range_width(
    range: &Option<Range>,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    decl_label: &str,
    span: Span,
    sink: &DiagnosticSink,
) -> u32 {
    let Some(r) = range else {
        return 1;
    };
    let msb = const_eval::eval_const_expr(&r.msb, source_db, interner, env);
    let lsb = const_eval::eval_const_expr(&r.lsb, source_db, interner, env);
    match (msb, lsb) {
        (Some(m), Some(l)) => (m - l).unsigned_abs() as u32 + 1,
        _ => {
            sink.emit(errors::warning_unresolved_width(decl_label, span));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmre_sv::parse_file;

    fn parse_one(source: &str) -> (SourceDb, Interner, DiagnosticSink, FileId) {
        let mut db = SourceDb::new();
        let file_id = db.add_source("t.sv", source.to_string());
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        (db, interner, sink, file_id)
    }

    #[test]
    fn resolves_ansi_port_widths() {
        let (db, interner, sink, file_id) = parse_one(
            "module counter #(parameter int WIDTH = 8)(
                input logic clk,
                input logic rst,
                output logic [WIDTH-1:0] count
            );
            endmodule",
        );
        let ast = parse_file(file_id, &db, &interner, &sink);
        let design = elaborate(&[(file_id, ast)], &db, &interner, &sink);
        assert!(!sink.has_errors());
        let (_, m) = design.iter().next().unwrap();
        assert_eq!(m.ports.len(), 3);
        let count = m.ports.iter().find(|p| interner.resolve(p.name) == "count").unwrap();
        assert_eq!(count.width, 8);
        assert_eq!(count.direction, PortDirection::Output);
    }

    #[test]
    fn resolves_non_ansi_ports() {
        let (db, interner, sink, file_id) = parse_one(
            "module counter(clk, rst, count);
                input logic clk;
                input logic rst;
                output logic [7:0] count;
            endmodule",
        );
        let ast = parse_file(file_id, &db, &interner, &sink);
        let design = elaborate(&[(file_id, ast)], &db, &interner, &sink);
        let (_, m) = design.iter().next().unwrap();
        assert_eq!(m.ports.len(), 3);
        let count = m.ports.iter().find(|p| interner.resolve(p.name) == "count").unwrap();
        assert_eq!(count.width, 8);
    }

    #[test]
    fn links_resolvable_instance() {
        let (db, interner, sink, file_id) = parse_one(
            "module sub(input logic a);
            endmodule

            module top;
                logic x;
                sub u_sub(.a(x));
            endmodule",
        );
        let ast = parse_file(file_id, &db, &interner, &sink);
        let design = elaborate(&[(file_id, ast)], &db, &interner, &sink);
        let top_name = interner.get_or_intern("top");
        let top_id = design.get_by_name(top_name).unwrap();
        let top = design.modules.get(top_id);
        assert_eq!(top.instances.len(), 1);
        assert!(top.instances[0].module.is_some());
    }

    #[test]
    fn unresolvable_instance_is_none() {
        let (db, interner, sink, file_id) = parse_one(
            "module top;
                vendor_ip u_ip();
            endmodule",
        );
        let ast = parse_file(file_id, &db, &interner, &sink);
        let design = elaborate(&[(file_id, ast)], &db, &interner, &sink);
        let (_, m) = design.iter().next().unwrap();
        assert_eq!(m.instances.len(), 1);
        assert!(m.instances[0].module.is_none());
    }

    #[test]
    fn duplicate_module_name_warns() {
        let (db, interner, sink, file_id) = parse_one(
            "module top; endmodule
             module top; endmodule",
        );
        let ast = parse_file(file_id, &db, &interner, &sink);
        elaborate(&[(file_id, ast)], &db, &interner, &sink);
        assert!(!sink.has_errors());
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn internal_signal_widths_resolve_via_resolve_symbol() {
        let (db, interner, sink, file_id) = parse_one(
            "module top;
                wire [15:0] data;
            endmodule",
        );
        let ast = parse_file(file_id, &db, &interner, &sink);
        let design = elaborate(&[(file_id, ast)], &db, &interner, &sink);
        let (_, m) = design.iter().next().unwrap();
        let data = interner.get_or_intern("data");
        assert_eq!(m.resolve_symbol(data), Some((16, DeclKind::Net)));
    }
}
