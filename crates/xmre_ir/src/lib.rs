//! The elaborated data model: module definitions, ports, internal signal
//! declarations, and the instance tree, as produced by the Elaboration
//! Facade and consumed by every downstream pipeline stage.

#![warn(missing_docs)]

pub mod arena;
pub mod design;
pub mod ids;
pub mod module;

pub use design::Design;
pub use ids::ModuleId;
pub use module::{DeclKind, Instance, ModuleDefinition, Port, PortDirection, Signal};
