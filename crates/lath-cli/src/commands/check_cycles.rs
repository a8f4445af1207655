//! `lath check-cycles`: circular import detection over the ESM output.
//!
//! Walks the generated ES modules' static default imports, records cycles,
//! and runs the risk heuristics over every cycle. Findings are
//! informational: the command reports them all and still exits zero —
//! only filesystem failures are errors.

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use lath_graph::{Cycle, CycleDiagnostic, GraphRegistry, ImportGraphWalker, analyze_cycles};
use lath_store::StagedFileStore;

use crate::cli::CheckCyclesArgs;
use crate::commands::utils;
use crate::config::{LathConfig, Layout};
use crate::error::Result;
use crate::ui;

/// JSON payload for `--json` mode.
#[derive(Debug, Serialize)]
struct CycleReport<'a> {
    cycles: Vec<String>,
    diagnostics: &'a [CycleDiagnostic],
}

/// Execute the check-cycles command.
pub fn execute(args: CheckCyclesArgs) -> Result<()> {
    let shared = args.shared;
    let config = LathConfig::resolve(&shared)?;
    let layout = Layout::new(&shared.root, &config);
    let mut store = StagedFileStore::new();

    ui::info("Checking ES-module output for circular imports...");

    let roots = utils::list_files(&layout.esm_gen_dir, "js");
    if roots.is_empty() {
        ui::warning("No generated ES modules found; run gen-esm first");
        return Ok(());
    }
    debug!(count = roots.len(), "walk roots discovered");

    let mut walker = ImportGraphWalker::new(&mut store);
    for root in &roots {
        walker.walk_root(Path::new(root))?;
    }
    let (registry, cycles) = walker.into_parts();
    let diagnostics = analyze_cycles(&registry, &cycles);

    if shared.json {
        let report = CycleReport {
            cycles: cycles.iter().map(|c| c.render(&registry)).collect(),
            diagnostics: &diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_findings(&registry, &cycles, &diagnostics);
    Ok(())
}

fn print_findings(registry: &GraphRegistry, cycles: &[Cycle], diagnostics: &[CycleDiagnostic]) {
    for cycle in cycles {
        ui::warning(&format!("import cycle: {}", cycle.render(registry)));
    }
    for diagnostic in diagnostics {
        println!("{}", diagnostic.message());
        println!("{}", diagnostic.cycle_path);
    }

    if cycles.is_empty() {
        ui::success(&format!(
            "No import cycles across {} modules",
            registry.len()
        ));
    } else {
        ui::info(&format!(
            "{} cycles, {} possible runtime errors across {} modules",
            cycles.len(),
            diagnostics.len(),
            registry.len()
        ));
    }
}
