//! Typed planner configuration, assembled by the CLI from its
//! `--pipe-reg-mode`/`--pipe-reg-count`/`--clock`/`--reset` flags.

use std::collections::HashMap;

use xmre_common::Ident;

/// Per-source-module pipeline-register insertion policy for read XMRs.
///
/// Looked up as `Config.pipeRegConfigMap[sourceModule]`; a module with no
/// entry gets no pipeline at all, equivalent to [`PipeRegMode::None`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipeRegMode {
    /// The terminal module drives the port directly with a continuous
    /// assign; no flip-flops are inserted.
    None,
    /// A single pipeline of depth `N`, applied to every read XMR sourced
    /// from the configured module.
    Global(u32),
    /// A pipeline whose depth equals the number of hops in each
    /// occurrence's own path (`len(pathSegments)`).
    PerModule,
    /// The sum of independently configured stage counts, each optionally
    /// restricted to a set of matching signal names.
    Selective(Vec<SelectiveRegEntry>),
}

/// One entry of a [`PipeRegMode::Selective`] configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectiveRegEntry {
    /// Number of pipeline stages this entry contributes.
    pub reg_count: u32,
    /// Restricts this entry to occurrences whose generated port name or
    /// target signal name appears here. Empty matches every occurrence.
    pub signals: Vec<Ident>,
}

/// Planner-wide configuration threaded through from the CLI.
///
/// `clock`/`reset` always hold a concrete name: the CLI resolves its
/// `--clock`/`--reset` flags (default `clk`/`rst_n`) before building this,
/// and the Orchestrator has already verified both signals are visible in
/// every module that requests a pipeline (§4.6 step 7) before C4 runs.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Pipeline register policy, keyed by source module.
    pub pipe_reg_config: HashMap<Ident, PipeRegMode>,
    /// Clock signal name threaded into generated pipeline stages.
    pub clock: Ident,
    /// Reset signal name threaded into generated pipeline stages.
    pub reset: Ident,
    /// `true` for an active-low (`negedge`) asynchronous reset.
    pub reset_active_low: bool,
}

impl PlanConfig {
    /// The pipeline mode configured for `source_module`, or
    /// [`PipeRegMode::None`] if unconfigured.
    pub fn pipe_reg_mode(&self, source_module: Ident) -> PipeRegMode {
        self.pipe_reg_config
            .get(&source_module)
            .cloned()
            .unwrap_or(PipeRegMode::None)
    }
}
