//! The elaborated module definition: ports, internal signals, and direct
//! child instances, as resolved by the Elaboration Facade.

use serde::{Deserialize, Serialize};
use xmre_common::Ident;
use xmre_source::{FileId, Span};

use crate::ids::ModuleId;

/// The direction of a port on a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// An input port (data flows into the module).
    Input,
    /// An output port (data flows out of the module).
    Output,
    /// A bidirectional port (data flows both ways).
    InOut,
}

/// Whether a declared symbol is a net (`wire`, `tri`, ...) or a variable
/// (`logic`, `reg`, `bit`, ...). Mirrors the spec's port/signal "kind".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    /// A net-type declaration (`wire`, `tri`, `supply0`, `supply1`).
    Net,
    /// A variable-type declaration (`logic`, `reg`, `bit`, `int`, ...).
    Variable,
}

/// A declared port on a module's external interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// The port name.
    pub name: Ident,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// The declared bit width (at least 1).
    pub width: u32,
    /// Net vs. variable declaration kind.
    pub kind: DeclKind,
    /// Where the port was declared.
    pub span: Span,
}

/// An internally declared net or variable (not a port) within a module body.
///
/// Used by the XMR Detector and Change Planner to resolve the declared width
/// and kind of a referenced signal that is not itself a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The signal name.
    pub name: Ident,
    /// The declared bit width (at least 1).
    pub width: u32,
    /// Net vs. variable declaration kind.
    pub kind: DeclKind,
    /// Where the signal was declared.
    pub span: Span,
}

/// A direct child instance of a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// The instance name (e.g., `u_sub`).
    pub instance_name: Ident,
    /// The name of the instantiated module type.
    pub module_name: Ident,
    /// The resolved child module, or `None` if the module type could not be
    /// found in the design (an external/blackbox module, not elaborated).
    pub module: Option<ModuleId>,
    /// Where the instance was declared.
    pub span: Span,
}

/// An elaborated module definition: its declared interface, internal signal
/// declarations (for width/kind resolution), and direct child instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDefinition {
    /// This module's own ID in the owning [`Design`](crate::Design).
    pub id: ModuleId,
    /// The module's declaration name.
    pub name: Ident,
    /// The file this module was declared in.
    pub file: FileId,
    /// Index of this module's `SvItem` within that file's parsed item list,
    /// so the Syntax Rewriter can locate the original declaration again.
    pub item_index: usize,
    /// Declared ports, in source order.
    pub ports: Vec<Port>,
    /// Internally declared nets/variables, in source order.
    pub signals: Vec<Signal>,
    /// Direct child instances, in source order.
    pub instances: Vec<Instance>,
    /// Source span of the whole module declaration.
    pub span: Span,
}

impl ModuleDefinition {
    /// Looks up the declared width and kind of a symbol by name, checking
    /// ports first (their backing signal is what the width actually refers
    /// to) and then internally declared signals.
    pub fn resolve_symbol(&self, name: Ident) -> Option<(u32, DeclKind)> {
        if let Some(p) = self.ports.iter().find(|p| p.name == name) {
            return Some((p.width, p.kind));
        }
        self.signals
            .iter()
            .find(|s| s.name == name)
            .map(|s| (s.width, s.kind))
    }
}
