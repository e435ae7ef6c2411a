//! The Elaboration Facade: wraps the SystemVerilog frontend and produces the
//! flat [`xmre_ir::Design`] that every downstream pipeline stage operates on.

#![warn(missing_docs)]

mod const_eval;
mod elaborate;
/// Diagnostic codes for elaboration-time warnings.
pub mod errors;

pub use elaborate::elaborate;
