//! `lath fix-libs`: external-namespace require rewriting.
//!
//! Walks the same source listing as `gen-lib` to derive each canonical
//! generated module's path, reads the module, and rewrites deep relative
//! requires into configured external namespaces onto the namespace's own
//! module object. A missing generated module is fatal: it means `gen-lib`
//! (or the emitter) has not produced the tree this phase fixes up.

use std::path::Path;
use tracing::debug;

use lath_gen::paths::{dir_name, strip_extension};
use lath_gen::{apply_namespace_fixups, should_skip_source};
use lath_store::{StagedFileStore, WriteOptions, normalize_key};

use crate::cli::FixLibsArgs;
use crate::commands::utils;
use crate::config::{LathConfig, Layout};
use crate::error::Result;
use crate::ui;

/// Execute the fix-libs command.
pub fn execute(args: FixLibsArgs) -> Result<()> {
    let shared = args.shared;
    let config = LathConfig::resolve(&shared)?;
    let layout = Layout::new(&shared.root, &config);
    let mut store = StagedFileStore::new();

    ui::info("Rewriting external namespace requires...");
    if config.external_namespaces.is_empty() {
        ui::warning("No external namespaces configured; nothing to rewrite");
    }

    let src_dir_key = normalize_key(&layout.src_dir);
    let lib_dir_key = normalize_key(&layout.lib_dir);
    let lib_gen_key = normalize_key(&layout.lib_gen_dir);

    let sources = utils::list_files(&layout.src_package_dir, &config.source_ext);
    debug!(count = sources.len(), "source modules discovered");

    for source in &sources {
        let content = store.read_tagged(Path::new(source), Some("source"))?;
        if should_skip_source(source, &content) {
            continue;
        }

        let cjs_path = format!(
            "{}.js",
            strip_extension(&utils::map_tree(source, &src_dir_key, &lib_dir_key))
        );
        let gen_path = utils::map_tree(&cjs_path, &lib_dir_key, &lib_gen_key);

        let module = store.read(Path::new(&gen_path))?;
        let fixed = apply_namespace_fixups(&module, &config.external_namespaces);

        store.request_dir(Path::new(dir_name(&gen_path)));
        store.write(
            Path::new(&gen_path),
            fixed,
            WriteOptions::tagged("cjs-module"),
        );
    }

    let summary = store.commit(shared.dry_run)?;
    utils::report_summary(&summary, shared.dry_run, shared.json)?;

    ui::success(&format!(
        "Complete! {} files were created or modified",
        summary.total_files_changed()
    ));
    Ok(())
}
