//! The Change Planner (C4).
//!
//! Turns a list of [`XmrOccurrence`]s into a frozen [`ChangeSet`]: the ports,
//! wires, assigns, pipeline stages, and instance connections the Syntax
//! Rewriter needs to add, plus the textual substitution map for every
//! hierarchical-name expression the Detector found.
//!
//! Two notes on how this maps onto `xmre_detect`'s actual output:
//!
//! - The spec's `basePath = stripArraySuffix(fullPath)` is the identity
//!   function here: `XmrOccurrence::full_path` never carries an array
//!   suffix to begin with (`xmre_sv` models a bit/range/part select as a
//!   node wrapping a `HierarchicalName`, not as trailing text on it), so
//!   every "array-suffix round trip" the spec worries about is handled
//!   entirely by the Rewriter leaving that wrapping node's own brackets
//!   untouched. This crate never constructs or strips one.
//! - Two occurrences that disagree on direction but are textually
//!   identical can never reach this planner: `xmre_detect` already
//!   deduplicates by `(sourceModule, fullPath)` before producing its
//!   output. The `MixedDirectionConflict` check below keys on the
//!   *generated port name* instead, so it still catches two spellings of
//!   the same base path (e.g. differing only in incidental whitespace
//!   around the dots) that resolve to the same port.

use std::collections::HashMap;

use xmre_common::{Ident, Interner};
use xmre_diagnostics::DiagnosticSink;
use xmre_hierarchy::HierarchyIndex;
use xmre_ir::{DeclKind, PortDirection};
use xmre_source::Span;

use crate::change_set::{ChangeSet, ConnectionChange, PipelineStage, PlannedPort, PlannedWire};
use crate::config::{PipeRegMode, PlanConfig};
use crate::errors;
use xmre_detect::{XmrDirection, XmrOccurrence};

/// Plans a [`ChangeSet`] for every occurrence, in detection order.
///
/// Non-fatal planning failures (an unresolvable path segment, a
/// read/write conflict on a shared base path) are emitted to `sink` and
/// leave the affected occurrence partially or entirely unplanned; they
/// never abort planning of the remaining occurrences.
pub fn plan(
    occurrences: &[XmrOccurrence],
    hierarchy: &HierarchyIndex,
    config: &PlanConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> ChangeSet {
    let mut cs = ChangeSet::new();
    let mut planned: HashMap<(Ident, Ident), XmrDirection> = HashMap::new();

    for occ in occurrences {
        let port_name = port_ident(interner, &occ.full_path);

        cs.xmr_replacements.insert(
            (occ.source_module, occ.full_path.clone()),
            interner.resolve(port_name).to_string(),
        );

        if occ.is_self_reference() {
            // Overrides the entry just inserted: a self-reference rewrites
            // to the plain signal name, never to a generated port.
            cs.xmr_replacements.insert(
                (occ.source_module, occ.full_path.clone()),
                interner.resolve(occ.target_signal).to_string(),
            );
            continue;
        }

        let key = (occ.source_module, port_name);
        if let Some(&prev_direction) = planned.get(&key) {
            if prev_direction != occ.direction {
                sink.emit(errors::error_mixed_direction_conflict(
                    interner.resolve(occ.source_module),
                    &occ.full_path,
                    occ.span,
                ));
            }
            continue;
        }
        planned.insert(key, occ.direction);

        // A write-direction occurrence (or anything sharing its base path)
        // must be procedurally assignable; everything else can stay a
        // plain wire. Since same-base-path conflicts were just rejected
        // above, the single retained occurrence's own direction settles it.
        let kind = if occ.direction == XmrDirection::Write {
            DeclKind::Variable
        } else {
            DeclKind::Net
        };

        if occ.absolute {
            plan_upward(&mut cs, occ, port_name, hierarchy, config, interner, sink, kind);
        } else {
            plan_downward(&mut cs, occ, port_name, hierarchy, config, interner, sink, kind);
        }
    }

    cs
}

fn port_ident(interner: &Interner, base_path: &str) -> Ident {
    interner.get_or_intern(&format!("__xmr__{}", slug(base_path)))
}

/// Replaces every run of `.` and whitespace with a single `_`.
fn slug(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut in_sep = false;
    for c in path.chars() {
        if c == '.' || c.is_whitespace() {
            if !out.is_empty() {
                in_sep = true;
            }
        } else {
            if in_sep {
                out.push('_');
                in_sep = false;
            }
            out.push(c);
        }
    }
    out
}

/// `pathSegments` walked from `sourceModule`: a read threads an `output`
/// pass-through port through every intermediate module; a write threads
/// `input`.
fn plan_downward(
    cs: &mut ChangeSet,
    occ: &XmrOccurrence,
    port_name: Ident,
    hierarchy: &HierarchyIndex,
    config: &PlanConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
    kind: DeclKind,
) {
    cs.add_wire(
        occ.source_module,
        PlannedWire {
            name: port_name,
            width: occ.bit_width,
            kind,
        },
    );

    let intermediate_dir = if occ.direction == XmrDirection::Read {
        PortDirection::Output
    } else {
        PortDirection::Input
    };

    let Some(target) = walk_chain(
        cs,
        sink,
        interner,
        hierarchy,
        occ.source_module,
        &occ.path_segments,
        port_name,
        occ.bit_width,
        kind,
        intermediate_dir,
        occ.span,
    ) else {
        return;
    };

    apply_terminal(cs, occ, port_name, target, kind, config, interner);
}

/// `pathSegments[0]` walked as a root instance: an input port is added
/// directly to `sourceModule`, fed by a wire in the root module that is in
/// turn threaded down to `sourceModule`'s own instance; separately, an
/// output pass-through port is threaded from the root down to
/// `targetModule` across the rest of the path.
fn plan_upward(
    cs: &mut ChangeSet,
    occ: &XmrOccurrence,
    port_name: Ident,
    hierarchy: &HierarchyIndex,
    config: &PlanConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
    kind: DeclKind,
) {
    cs.add_port(
        occ.source_module,
        PlannedPort {
            name: port_name,
            direction: PortDirection::Input,
            width: occ.bit_width,
            kind,
            local_driver_signal: None,
        },
    );

    let root = occ.path_segments[0];

    match hierarchy.paths_to(occ.source_module).first().cloned() {
        Some(path) => {
            cs.add_wire(
                root,
                PlannedWire {
                    name: port_name,
                    width: occ.bit_width,
                    kind,
                },
            );
            walk_chain(
                cs,
                sink,
                interner,
                hierarchy,
                root,
                &path,
                port_name,
                occ.bit_width,
                kind,
                PortDirection::Input,
                occ.span,
            );
        }
        None => {
            sink.emit(errors::error_unknown_child_instance(
                interner.resolve(root),
                interner.resolve(occ.source_module),
                occ.span,
            ));
        }
    }

    let Some(target) = walk_chain(
        cs,
        sink,
        interner,
        hierarchy,
        root,
        &occ.path_segments[1..],
        port_name,
        occ.bit_width,
        kind,
        PortDirection::Output,
        occ.span,
    ) else {
        return;
    };

    apply_terminal(cs, occ, port_name, target, kind, config, interner);
}

/// Walks `hops` starting at `start`, adding a pass-through port of
/// `intermediate_dir` to every module except the last hop's child, and a
/// connection change at every hop. Returns the module reached by the last
/// hop, or `None` (after emitting a diagnostic) if any hop fails to
/// resolve.
#[allow(clippy::too_many_arguments)]
fn walk_chain(
    cs: &mut ChangeSet,
    sink: &DiagnosticSink,
    interner: &Interner,
    hierarchy: &HierarchyIndex,
    start: Ident,
    hops: &[Ident],
    port_name: Ident,
    width: u32,
    kind: DeclKind,
    intermediate_dir: PortDirection,
    span: Span,
) -> Option<Ident> {
    let mut current = start;
    let last = hops.len().saturating_sub(1);
    for (i, &seg) in hops.iter().enumerate() {
        let child = match hierarchy.child_of(current, seg, interner) {
            Ok(c) => c,
            Err(_) => {
                sink.emit(errors::error_unknown_child_instance(
                    interner.resolve(current),
                    interner.resolve(seg),
                    span,
                ));
                return None;
            }
        };
        if i != last {
            cs.add_port(
                child,
                PlannedPort {
                    name: port_name,
                    direction: intermediate_dir,
                    width,
                    kind,
                    local_driver_signal: None,
                },
            );
        }
        cs.add_connection(ConnectionChange {
            parent_module: current,
            instance_name: seg,
            child_module: child,
            port_name,
            local_signal: port_name,
        });
        current = child;
    }
    Some(current)
}

/// Adds the terminal port in `target_module` and either a driving assign or
/// a pipeline stage chain, per §4.3 step 6.
fn apply_terminal(
    cs: &mut ChangeSet,
    occ: &XmrOccurrence,
    port_name: Ident,
    target_module: Ident,
    kind: DeclKind,
    config: &PlanConfig,
    interner: &Interner,
) {
    match occ.direction {
        XmrDirection::Read => {
            cs.add_port(
                target_module,
                PlannedPort {
                    name: port_name,
                    direction: PortDirection::Output,
                    width: occ.bit_width,
                    kind,
                    local_driver_signal: None,
                },
            );
            let stage_count = pipeline_stage_count(occ, port_name, config);
            if stage_count > 0 {
                cs.add_pipe_reg(
                    target_module,
                    PipelineStage {
                        input_signal: occ.target_signal,
                        output_signal: port_name,
                        width: occ.bit_width,
                        stage_count,
                        clock: config.clock,
                        reset: config.reset,
                        reset_active_low: config.reset_active_low,
                    },
                );
            } else {
                cs.add_assign(
                    target_module,
                    format!(
                        "assign {} = {};",
                        interner.resolve(port_name),
                        interner.resolve(occ.target_signal)
                    ),
                );
            }
        }
        XmrDirection::Write => {
            cs.add_port(
                target_module,
                PlannedPort {
                    name: port_name,
                    direction: PortDirection::Input,
                    width: occ.bit_width,
                    kind,
                    local_driver_signal: None,
                },
            );
            cs.add_assign(
                target_module,
                format!(
                    "assign {} = {};",
                    interner.resolve(occ.target_signal),
                    interner.resolve(port_name)
                ),
            );
        }
    }
}

/// Resolves `Config.pipeRegConfigMap[sourceModule]` to a concrete stage
/// count. Only read-direction occurrences may be pipelined: the pipeline
/// body contract (`inputSignal -> ... -> outputSignal`) only matches the
/// data-flow direction of a read; nothing in the spec describes pipelining
/// a write.
fn pipeline_stage_count(occ: &XmrOccurrence, port_name: Ident, config: &PlanConfig) -> u32 {
    if occ.direction != XmrDirection::Read {
        return 0;
    }
    match config.pipe_reg_mode(occ.source_module) {
        PipeRegMode::None => 0,
        PipeRegMode::Global(n) => n,
        PipeRegMode::PerModule => occ.path_segments.len() as u32,
        PipeRegMode::Selective(entries) => entries
            .iter()
            .filter(|e| {
                e.signals.is_empty()
                    || e.signals.contains(&port_name)
                    || e.signals.contains(&occ.target_signal)
            })
            .map(|e| e.reg_count)
            .sum(),
    }
}
