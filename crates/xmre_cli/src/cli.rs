//! The command-line surface: flags and positional arguments, parsed by
//! `clap`'s derive API the same way `aion_cli` builds its own `Cli`.

use clap::{Parser, ValueEnum};

/// `xmre` — eliminates cross-module references from a SystemVerilog design
/// by threading explicit ports through the instance hierarchy.
#[derive(Parser, Debug)]
#[command(name = "xmre", version, about = "SystemVerilog XMR elimination")]
pub struct Cli {
    /// Input source paths. A path ending in `.f` is read as a
    /// line-delimited file list instead of a source file.
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Output directory.
    #[arg(short, long, default_value = ".xmrEliminate")]
    pub output: String,

    /// Restrict XMR detection to these module definitions.
    #[arg(short, long, value_delimiter = ',')]
    pub module: Vec<String>,

    /// User-chosen top module.
    #[arg(short, long)]
    pub top: Option<String>,

    /// Include directories. Accepted for interface compatibility; this
    /// frontend has no preprocessor, so no include expansion is performed.
    #[arg(short = 'I', long = "include-directory", value_delimiter = ',')]
    pub include_directory: Vec<String>,

    /// System include directories. Same no-op note as `--include-directory`.
    #[arg(long, value_delimiter = ',')]
    pub isystem: Vec<String>,

    /// Macro definitions. Same no-op note as `--include-directory`.
    #[arg(short = 'D', long = "define-macro")]
    pub define_macro: Vec<String>,

    /// Macro undefinitions. Same no-op note as `--include-directory`.
    #[arg(short = 'U', long = "undefine-macro")]
    pub undefine_macro: Vec<String>,

    /// Pipeline register insertion policy for read XMRs.
    #[arg(long, value_enum, default_value_t = PipeRegModeArg::None)]
    pub pipe_reg_mode: PipeRegModeArg,

    /// Stage count for `global`/`selective` pipeline register modes.
    #[arg(long, default_value_t = 1)]
    pub pipe_reg_count: u32,

    /// Clock signal name threaded into generated pipeline stages.
    #[arg(long, default_value = "clk")]
    pub clock: String,

    /// Reset signal name threaded into generated pipeline stages.
    #[arg(long, default_value = "rst_n")]
    pub reset: String,

    /// Treat the reset signal as active-high (`posedge`) rather than the
    /// default active-low (`negedge`).
    #[arg(long)]
    pub reset_active_high: bool,

    /// Re-parse and re-elaborate the rewritten output and fail on any
    /// resulting diagnostic. Also enabled by `CHECK_OUTPUT=1`.
    #[arg(long = "co", visible_alias = "check-output")]
    pub check_output: bool,

    /// Print a per-module breakdown of detected and eliminated XMRs.
    #[arg(long)]
    pub dump_hierarchy: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Pipeline register insertion policy, as selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PipeRegModeArg {
    /// No flip-flops; the terminal module drives the port directly.
    None,
    /// A single pipeline of depth `--pipe-reg-count`, applied everywhere.
    Global,
    /// A pipeline whose depth equals each occurrence's own hop count.
    #[value(name = "permodule")]
    PerModule,
    /// Same depth as `global`, applied to every module with a detected
    /// read XMR (this CLI has no finer per-signal or per-module selection
    /// surface, so it cannot express `-m/--module`-scoped selectivity).
    Selective,
}
