//! The `ChangeSet`: the Change Planner's frozen, per-module description of
//! every port, wire, assign, pipeline, and instance connection the Syntax
//! Rewriter (C5) needs to add.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use xmre_common::Ident;
use xmre_ir::DeclKind;
use xmre_ir::PortDirection;

/// A port the Rewriter must add to a module's declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPort {
    /// The generated port name (`__xmr__...`).
    pub name: Ident,
    /// `Input` or `Output`; a planner never generates an `InOut` port.
    pub direction: PortDirection,
    /// Declared width of the underlying target signal.
    pub width: u32,
    /// Net (`wire`) or variable (`logic`) declaration kind.
    pub kind: DeclKind,
    /// An existing local signal this port should be pre-wired from/to,
    /// distinct from the port's own name. Always `None` in this
    /// implementation: every generated port, wire, and connection shares
    /// the same name end to end, so there is never a separate driver to
    /// name here. Kept so the type mirrors the spec's tuple shape.
    pub local_driver_signal: Option<Ident>,
}

/// A wire the Rewriter must declare at the top of a module body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedWire {
    /// The generated wire name.
    pub name: Ident,
    /// Declared width.
    pub width: u32,
    /// Net or variable declaration kind.
    pub kind: DeclKind,
}

/// A generated pipeline register chain, per the §4.3 step 6 body contract:
/// for each stage `i`, a flip-flop `<outputSignal>_pipe_<i>` clocked on
/// `posedge clock` with asynchronous reset, stage 0 fed by `inputSignal` and
/// each later stage by the previous one, and a final continuous assign
/// `outputSignal = <outputSignal>_pipe_<stageCount - 1>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStage {
    /// The signal driving stage 0 (the XMR's target signal).
    pub input_signal: Ident,
    /// The generated port the final stage drives.
    pub output_signal: Ident,
    /// Width of every stage register.
    pub width: u32,
    /// Number of pipeline stages (>= 1; a mode that resolves to 0 never
    /// reaches the `ChangeSet` — the terminal assign is used instead).
    pub stage_count: u32,
    /// Clock signal name.
    pub clock: Ident,
    /// Reset signal name.
    pub reset: Ident,
    /// `true` for an active-low (`negedge`) asynchronous reset.
    pub reset_active_low: bool,
}

/// One `.portName(localSignal)` connection the Rewriter must append to an
/// instantiation's named-port-connection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionChange {
    /// The module containing the instantiation.
    pub parent_module: Ident,
    /// The instance name being connected to.
    pub instance_name: Ident,
    /// The module type of that instance.
    pub child_module: Ident,
    /// The port being connected.
    pub port_name: Ident,
    /// The local signal (in `parent_module`) fed into/out of that port.
    pub local_signal: Ident,
}

/// The frozen output of the Change Planner (C4): every per-module addition
/// the Syntax Rewriter (C5) needs, plus the substitution map for every
/// hierarchical-name expression found by the Detector.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Ports to add, per module, in insertion order.
    pub ports_to_add: HashMap<Ident, Vec<PlannedPort>>,
    /// Wires to add, per module, in insertion order.
    pub wires_to_add: HashMap<Ident, Vec<PlannedWire>>,
    /// Textual continuous-assignment statements to append, per module.
    pub assigns_to_add: HashMap<Ident, Vec<String>>,
    /// Pipeline register chains to append, per module.
    pub pipe_regs_to_add: HashMap<Ident, Vec<PipelineStage>>,
    /// Connection changes to apply at instantiation sites, in insertion
    /// order, at most one per `(parentModule, instanceName, portName)`.
    pub connection_changes: Vec<ConnectionChange>,
    /// `(sourceModule, originalPathText) -> replacementText`, consumed by
    /// the Rewriter's per-scoped-name-expression substitution pass.
    pub xmr_replacements: HashMap<(Ident, String), String>,
}

impl ChangeSet {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a port to `module`, deduplicating by `(name, direction)`.
    pub fn add_port(&mut self, module: Ident, port: PlannedPort) {
        let ports = self.ports_to_add.entry(module).or_default();
        if !ports
            .iter()
            .any(|p| p.name == port.name && p.direction == port.direction)
        {
            ports.push(port);
        }
    }

    /// Adds a wire to `module`, deduplicating by name.
    pub fn add_wire(&mut self, module: Ident, wire: PlannedWire) {
        let wires = self.wires_to_add.entry(module).or_default();
        if !wires.iter().any(|w| w.name == wire.name) {
            wires.push(wire);
        }
    }

    /// Appends a continuous-assignment statement to `module`.
    pub fn add_assign(&mut self, module: Ident, assign: String) {
        let assigns = self.assigns_to_add.entry(module).or_default();
        if !assigns.contains(&assign) {
            assigns.push(assign);
        }
    }

    /// Adds a pipeline register chain to `module`, deduplicating by the
    /// output signal it drives.
    pub fn add_pipe_reg(&mut self, module: Ident, stage: PipelineStage) {
        let stages = self.pipe_regs_to_add.entry(module).or_default();
        if !stages.iter().any(|s| s.output_signal == stage.output_signal) {
            stages.push(stage);
        }
    }

    /// Adds a connection change, deduplicating by
    /// `(parentModule, instanceName, portName)`.
    pub fn add_connection(&mut self, change: ConnectionChange) {
        let exists = self.connection_changes.iter().any(|c| {
            c.parent_module == change.parent_module
                && c.instance_name == change.instance_name
                && c.port_name == change.port_name
        });
        if !exists {
            self.connection_changes.push(change);
        }
    }
}
