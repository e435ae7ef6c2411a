//! The Orchestrator (C7): drives C1 through C6 end to end, in the order
//! laid out for each stage's own crate, and assembles the result the CLI
//! reports back to the user.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use xmre_common::{Ident, Interner};
use xmre_diagnostics::{Diagnostic, DiagnosticSink};
use xmre_hierarchy::HierarchyIndex;
use xmre_plan::{PipeRegMode, PlanConfig};
use xmre_source::SourceDb;

use crate::errors;

/// Resolved configuration for one orchestration run, built from the CLI's
/// own flags.
pub struct Config {
    /// Output directory for rewritten files.
    pub output_dir: PathBuf,
    /// Restricts XMR detection to these module names; empty detects
    /// everywhere.
    pub modules: Vec<String>,
    /// User-chosen top module name, if given.
    pub top: Option<String>,
    /// Pipeline register policy applied to every module with at least one
    /// read XMR, or `None` to drive ports directly with no flip-flops.
    pub pipe_reg_mode: PipeRegMode,
    /// Clock signal name.
    pub clock: String,
    /// Reset signal name.
    pub reset: String,
    /// `true` for an active-low (`negedge`) asynchronous reset.
    pub reset_active_low: bool,
    /// Re-parse and re-elaborate the rewritten output before returning.
    pub check_output: bool,
}

/// The outcome of one orchestration run.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Every diagnostic collected across every stage, in the order each
    /// stage produced them.
    pub diagnostics: Vec<Diagnostic>,
    /// Every root module the Hierarchy Index found.
    pub detected_tops: Vec<String>,
    /// The module chosen as `usedTopModule`, if any.
    pub used_top: Option<String>,
    /// The directory rewritten files were (or would be) written to.
    pub output_dir: PathBuf,
    /// Total number of XMR occurrences eliminated.
    pub eliminated_count: usize,
    /// Eliminated occurrence count, keyed by the module the reference
    /// textually appeared in.
    pub by_source_module: HashMap<String, usize>,
    /// Every module whose declaration was modified (new ports threaded,
    /// or an instantiation site given a new connection).
    pub target_modules: HashSet<String>,
}

impl RunResult {
    /// `true` iff no error-severity diagnostic was collected.
    pub fn success(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// A human-readable report of the run: detected tops, the used top,
    /// the output directory, how many XMRs were eliminated and where, which
    /// modules were touched, and every warning and error collected.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "detected top modules: {}", join_or_none(&self.detected_tops));
        let _ = writeln!(
            out,
            "used top module: {}",
            self.used_top.as_deref().unwrap_or("(none)")
        );
        let _ = writeln!(out, "output directory: {}", self.output_dir.display());
        let _ = writeln!(out, "XMRs eliminated: {}", self.eliminated_count);

        if !self.by_source_module.is_empty() {
            let mut modules: Vec<_> = self.by_source_module.iter().collect();
            modules.sort_by_key(|(name, _)| name.clone());
            out.push_str("  by source module:\n");
            for (module, count) in modules {
                let _ = writeln!(out, "    {module}: {count}");
            }
        }

        if !self.target_modules.is_empty() {
            let mut targets: Vec<_> = self.target_modules.iter().cloned().collect();
            targets.sort();
            let _ = writeln!(out, "target modules touched: {}", targets.join(", "));
        }

        let warnings: Vec<_> = self.diagnostics.iter().filter(|d| !d.severity.is_error()).collect();
        let errors: Vec<_> = self.diagnostics.iter().filter(|d| d.severity.is_error()).collect();
        let _ = writeln!(out, "warnings: {}", warnings.len());
        for w in &warnings {
            let _ = writeln!(out, "  warning[{}]: {}", w.code, w.message);
        }
        let _ = writeln!(out, "errors: {}", errors.len());
        for e in &errors {
            let _ = writeln!(out, "  error[{}]: {}", e.code, e.message);
        }

        out
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

/// Runs the full pipeline against `input_paths` with `config`.
pub fn orchestrate(input_paths: &[PathBuf], config: &Config) -> RunResult {
    let mut result = RunResult {
        output_dir: config.output_dir.clone(),
        ..RunResult::default()
    };

    // Step 1: validate the input file list.
    if input_paths.is_empty() {
        result.diagnostics.push(errors::error_no_inputs());
        return result;
    }
    let mut missing = false;
    for path in input_paths {
        if !path.exists() {
            result
                .diagnostics
                .push(errors::error_input_missing(&path.display().to_string()));
            missing = true;
        }
    }
    if missing {
        return result;
    }

    // Step 2: elaborate (C1). Parsing and elaboration share one sink so a
    // syntax error and a later elaboration error are both surfaced.
    let mut source_db = SourceDb::new();
    let interner = Interner::new();
    let sink = DiagnosticSink::new();

    let mut files = Vec::with_capacity(input_paths.len());
    let load_result: std::io::Result<()> = (|| {
        for path in input_paths {
            let file_id = source_db.load_file(path)?;
            let parsed = xmre_sv::parse_file(file_id, &source_db, &interner, &sink);
            files.push((file_id, parsed));
        }
        Ok(())
    })();
    if let Err(e) = load_result {
        result
            .diagnostics
            .push(errors::error_input_missing(&e.to_string()));
        return result;
    }

    let design = xmre_elaborate::elaborate(&files, &source_db, &interner, &sink);

    let frontend_diagnostics = sink.take_all();
    let frontend_failed = frontend_diagnostics.iter().any(|d| d.severity.is_error());
    result.diagnostics.extend(frontend_diagnostics);
    if frontend_failed {
        return result;
    }

    // Step 3: build the Hierarchy Index (C2).
    let hierarchy = HierarchyIndex::build(&design);
    result.detected_tops = hierarchy
        .top_modules()
        .iter()
        .map(|&m| interner.resolve(m).to_string())
        .collect();

    // Step 4: choose usedTopModule.
    let used_top = match &config.top {
        Some(name) => Some(name.clone()),
        None if hierarchy.top_modules().len() == 1 => {
            Some(interner.resolve(hierarchy.top_modules()[0]).to_string())
        }
        None => {
            if hierarchy.top_modules().len() > 1 {
                result
                    .diagnostics
                    .push(errors::warning_multiple_tops(&result.detected_tops));
            }
            None
        }
    };
    result.used_top = used_top;

    // Step 5: detect XMRs (C3), restricted to Config.modules if given.
    let module_filter: HashSet<Ident> = config
        .modules
        .iter()
        .map(|m| interner.get_or_intern(m))
        .collect();
    let sink = DiagnosticSink::new();
    let occurrences = xmre_detect::detect_xmrs(
        &design,
        &hierarchy,
        &files,
        &source_db,
        &interner,
        &module_filter,
        &sink,
    );
    result.diagnostics.extend(sink.take_all());

    // Step 6: nothing detected — emit the originals unchanged.
    if occurrences.is_empty() {
        result.diagnostics.push(errors::warning_no_xmrs_found());
        let originals: Vec<xmre_rewrite::RewrittenFile> = files
            .iter()
            .map(|(file_id, parsed)| xmre_rewrite::RewrittenFile {
                file: *file_id,
                text: source_db.snippet(parsed.span).to_string(),
                succeeded: true,
            })
            .collect();
        write_outputs(&config.output_dir, input_paths, &originals, &mut result.diagnostics);
        return result;
    }

    // Step 7: if pipeline registers are requested, every source module with
    // a read occurrence must have the configured clock and reset visible.
    let clock = interner.get_or_intern(&config.clock);
    let reset = interner.get_or_intern(&config.reset);
    let mut pipe_reg_config: HashMap<Ident, PipeRegMode> = HashMap::new();
    if !matches!(config.pipe_reg_mode, PipeRegMode::None) {
        let mut source_modules: HashSet<Ident> = HashSet::new();
        for occ in &occurrences {
            if matches!(occ.direction, xmre_detect::XmrDirection::Read) {
                source_modules.insert(occ.source_module);
            }
        }
        let mut missing_signal = false;
        for &module_name in &source_modules {
            let Some(module_id) = design.get_by_name(module_name) else {
                continue;
            };
            let def = design.modules.get(module_id);
            if def.resolve_symbol(clock).is_none() {
                result.diagnostics.push(errors::error_missing_clock_or_reset(
                    interner.resolve(module_name),
                    &config.clock,
                ));
                missing_signal = true;
            }
            if def.resolve_symbol(reset).is_none() {
                result.diagnostics.push(errors::error_missing_clock_or_reset(
                    interner.resolve(module_name),
                    &config.reset,
                ));
                missing_signal = true;
            }
            pipe_reg_config.insert(module_name, config.pipe_reg_mode.clone());
        }
        if missing_signal {
            return result;
        }
    }

    // Step 8: compute the ChangeSet (C4), rewrite (C5), optionally validate
    // (C6).
    let plan_config = PlanConfig {
        pipe_reg_config,
        clock,
        reset,
        reset_active_low: config.reset_active_low,
    };
    let sink = DiagnosticSink::new();
    let change_set = xmre_plan::plan(&occurrences, &hierarchy, &plan_config, &interner, &sink);
    result.diagnostics.extend(sink.take_all());

    result.eliminated_count = occurrences.len();
    for occ in &occurrences {
        *result
            .by_source_module
            .entry(interner.resolve(occ.source_module).to_string())
            .or_insert(0) += 1;
        if let Some(target) = occ.target_module {
            result.target_modules.insert(interner.resolve(target).to_string());
        }
    }
    for module_name in change_set.ports_to_add.keys() {
        result.target_modules.insert(interner.resolve(*module_name).to_string());
    }

    let sink = DiagnosticSink::new();
    let rewritten = xmre_rewrite::rewrite(
        &design,
        &files,
        &source_db,
        &interner,
        &change_set,
        &sink,
    );
    result.diagnostics.extend(sink.take_all());

    if config.check_output {
        let rewritten_texts: Vec<(PathBuf, String)> = input_paths
            .iter()
            .zip(&rewritten)
            .map(|(path, file)| (path.clone(), file.text.clone()))
            .collect();
        let report = xmre_validate::validate(&rewritten_texts);
        result.diagnostics.extend(report.diagnostics);
    }

    // Step 9: write output files.
    write_outputs(&config.output_dir, input_paths, &rewritten, &mut result.diagnostics);

    result
}

/// Writes every rewritten file to `output_dir`, wrapped in the `//BEGIN:`/
/// `//END:` provenance markers, via a short-lived `.work` scratch copy that
/// is removed once every file has been written.
fn write_outputs(
    output_dir: &Path,
    original_paths: &[PathBuf],
    rewritten: &[xmre_rewrite::RewrittenFile],
    diagnostics: &mut Vec<Diagnostic>,
) {
    if let Err(e) = std::fs::create_dir_all(output_dir) {
        diagnostics.push(errors::error_output_write(&output_dir.display().to_string(), &e.to_string()));
        return;
    }
    let work_dir = output_dir.join(".work");
    if let Err(e) = std::fs::create_dir_all(&work_dir) {
        diagnostics.push(errors::error_output_write(&work_dir.display().to_string(), &e.to_string()));
        return;
    }

    for (path, file) in original_paths.iter().zip(rewritten) {
        let marker = format!(
            "//BEGIN:{}\n{}//END:{}\n",
            path.display(),
            file.text,
            path.display()
        );
        let Some(file_name) = path.file_name() else {
            continue;
        };

        if let Err(e) = std::fs::write(work_dir.join(file_name), &marker) {
            diagnostics.push(errors::error_output_write(&path.display().to_string(), &e.to_string()));
            continue;
        }
        if let Err(e) = std::fs::write(output_dir.join(file_name), &marker) {
            diagnostics.push(errors::error_output_write(&path.display().to_string(), &e.to_string()));
        }
    }

    let _ = std::fs::remove_dir_all(&work_dir);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn base_config(output_dir: PathBuf) -> Config {
        Config {
            output_dir,
            modules: Vec::new(),
            top: None,
            pipe_reg_mode: PipeRegMode::None,
            clock: "clk".to_string(),
            reset: "rst_n".to_string(),
            reset_active_low: true,
            check_output: false,
        }
    }

    #[test]
    fn empty_input_list_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let result = orchestrate(&[], &base_config(tmp.path().join("out")));
        assert!(!result.success());
    }

    #[test]
    fn missing_input_path_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let result = orchestrate(
            &[tmp.path().join("nonexistent.sv")],
            &base_config(tmp.path().join("out")),
        );
        assert!(!result.success());
    }

    #[test]
    fn no_xmrs_emits_warning_and_writes_originals() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("top.sv");
        fs::write(&src, "module top;\nendmodule\n").unwrap();

        let out_dir = tmp.path().join("out");
        let result = orchestrate(&[src.clone()], &base_config(out_dir.clone()));
        assert!(result.success());
        assert_eq!(result.eliminated_count, 0);

        let written = fs::read_to_string(out_dir.join("top.sv")).unwrap();
        assert!(written.contains("module top;"));
        assert!(!out_dir.join(".work").exists());
    }

    #[test]
    fn downward_xmr_is_eliminated_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("design.sv");
        fs::write(
            &src,
            "module top;\n  sub u_sub();\n  assign r = u_sub.sig;\nendmodule\nmodule sub;\n  reg sig;\nendmodule\n",
        )
        .unwrap();

        let out_dir = tmp.path().join("out");
        let result = orchestrate(&[src.clone()], &base_config(out_dir.clone()));
        assert!(result.success(), "unexpected errors: {:?}", result.diagnostics);
        assert_eq!(result.eliminated_count, 1);
        assert_eq!(result.by_source_module.get("top"), Some(&1));
        assert!(result.target_modules.contains("sub"));

        let written = fs::read_to_string(out_dir.join("design.sv")).unwrap();
        assert!(written.contains("//BEGIN:"));
        assert!(written.contains("//END:"));
        assert!(written.contains("wire __xmr__u_sub_sig;"));
    }

    #[test]
    fn summary_mentions_used_top_and_counts() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("design.sv");
        fs::write(
            &src,
            "module top;\n  sub u_sub();\n  assign r = u_sub.sig;\nendmodule\nmodule sub;\n  reg sig;\nendmodule\n",
        )
        .unwrap();

        let out_dir = tmp.path().join("out");
        let result = orchestrate(&[src], &base_config(out_dir));
        let summary = result.summary();
        assert!(summary.contains("used top module: top"));
        assert!(summary.contains("XMRs eliminated: 1"));
    }
}
