//! `xmre` — the command-line Orchestrator (C7) for the XMR elimination
//! pipeline: parses its flags, resolves the input file list, drives the
//! elaborate/detect/plan/rewrite/validate stages in order, writes the
//! rewritten output, and reports a summary.

#![warn(missing_docs)]

mod cli;
mod errors;
mod file_list;
mod run;

use std::process;

use clap::Parser;
use xmre_plan::{PipeRegMode, SelectiveRegEntry};

use cli::{Cli, PipeRegModeArg};
use run::{orchestrate, Config};

fn main() {
    let cli = Cli::parse();

    let check_output = cli.check_output || std::env::var("CHECK_OUTPUT").as_deref() == Ok("1");

    let pipe_reg_mode = match cli.pipe_reg_mode {
        PipeRegModeArg::None => PipeRegMode::None,
        PipeRegModeArg::Global => PipeRegMode::Global(cli.pipe_reg_count),
        PipeRegModeArg::PerModule => PipeRegMode::PerModule,
        PipeRegModeArg::Selective => PipeRegMode::Selective(vec![SelectiveRegEntry {
            reg_count: cli.pipe_reg_count,
            signals: Vec::new(),
        }]),
    };

    let config = Config {
        output_dir: cli.output.clone().into(),
        modules: cli.module.clone(),
        top: cli.top.clone(),
        pipe_reg_mode,
        clock: cli.clock.clone(),
        reset: cli.reset.clone(),
        reset_active_low: !cli.reset_active_high,
        check_output,
    };

    let inputs = match file_list::resolve_inputs(&cli.inputs) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if cli.verbose {
        eprintln!("xmre: {} input file(s) resolved", inputs.len());
    }

    let result = orchestrate(&inputs, &config);

    if cli.dump_hierarchy {
        eprintln!(
            "detected top modules: {}",
            if result.detected_tops.is_empty() {
                "(none)".to_string()
            } else {
                result.detected_tops.join(", ")
            }
        );
    }

    println!("{}", result.summary());

    process::exit(if result.success() { 0 } else { 1 });
}
