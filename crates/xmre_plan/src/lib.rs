//! The Change Planner (C4): turns detected [`xmre_detect::XmrOccurrence`]s
//! into a [`ChangeSet`] of ports, wires, assigns, pipeline stages, and
//! instance connections for the Syntax Rewriter to apply.

#![warn(missing_docs)]

mod change_set;
mod config;
/// Diagnostic codes raised while planning changes for detected XMRs.
pub mod errors;
mod plan;

pub use change_set::{ChangeSet, ConnectionChange, PipelineStage, PlannedPort, PlannedWire};
pub use config::{PipeRegMode, PlanConfig, SelectiveRegEntry};
pub use plan::plan;
