//! `lath gen-lib`: CommonJS distribution generation.
//!
//! Two passes over one staged store. The first stages a re-export shim in
//! the public layer for every source module the emitter produced output
//! for; the second groups the committed public layer by directory and
//! stages one `index.js` barrel per directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

use lath_gen::paths::{base_name, dir_name, strip_extension};
use lath_gen::{cjs_barrel, cjs_reexport_shim, should_skip_source};
use lath_store::{StagedFileStore, WriteOptions, normalize_key};

use crate::cli::GenLibArgs;
use crate::commands::utils;
use crate::config::{LathConfig, Layout};
use crate::error::Result;
use crate::ui;

/// Execute the gen-lib command.
pub fn execute(args: GenLibArgs) -> Result<()> {
    let shared = args.shared;
    let config = LathConfig::resolve(&shared)?;
    let layout = Layout::new(&shared.root, &config);
    let mut store = StagedFileStore::new();

    ui::info("Generating CommonJS distribution...");

    stage_shims(&mut store, &layout, &config)?;
    let summary = store.commit(shared.dry_run)?;
    utils::report_summary(&summary, shared.dry_run, shared.json)?;

    stage_barrels(&mut store, &layout)?;
    let summary = store.commit(shared.dry_run)?;
    utils::report_summary(&summary, shared.dry_run, shared.json)?;

    ui::success(&format!(
        "Complete! {} files were created or modified",
        summary.total_files_changed()
    ));
    Ok(())
}

/// Stage one public-layer shim per source module.
///
/// Shims are staged create-only: a consumer who hand-customized a shallow
/// module keeps their edits, and the commit summary lists the file as
/// ignored instead of clobbering it.
fn stage_shims(store: &mut StagedFileStore, layout: &Layout, config: &LathConfig) -> Result<()> {
    let src_dir_key = normalize_key(&layout.src_dir);
    let lib_dir_key = normalize_key(&layout.lib_dir);
    let lib_gen_key = normalize_key(&layout.lib_gen_dir);

    let sources = utils::list_files(&layout.src_package_dir, &config.source_ext);
    debug!(count = sources.len(), "source modules discovered");

    for source in &sources {
        let content = store.read_tagged(Path::new(source), Some("source"))?;
        if should_skip_source(source, &content) {
            debug!(path = %source, "no runtime representation, skipped");
            continue;
        }

        let cjs_path = format!(
            "{}.js",
            strip_extension(&utils::map_tree(source, &src_dir_key, &lib_dir_key))
        );
        let gen_path = utils::map_tree(&cjs_path, &lib_dir_key, &lib_gen_key);
        let shim = cjs_reexport_shim(&cjs_path, &gen_path);

        store.request_dir(Path::new(dir_name(&cjs_path)));
        store.write(
            Path::new(&cjs_path),
            shim,
            WriteOptions::tagged("cjs-module")
                .tag("rexport")
                .create_only(true),
        );
    }

    Ok(())
}

/// Group the public layer by directory and stage one barrel per directory.
fn stage_barrels(store: &mut StagedFileStore, layout: &Layout) -> Result<()> {
    let package_dir_key = normalize_key(&layout.lib_package_dir);
    let files = utils::list_files(&layout.lib_package_dir, "js");

    let mut dir_to_files: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut dir_to_packages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    // The package root always gets a barrel, even when empty.
    dir_to_files.entry(package_dir_key.clone()).or_default();

    for file in files {
        if base_name(&file) == "index.js" {
            // Previously generated barrels re-enter the listing on the
            // second run; they are output, not members.
            continue;
        }
        let dir = dir_name(&file).to_string();
        let parent = dir_name(&dir).to_string();
        dir_to_files.entry(dir.clone()).or_default().insert(file);
        dir_to_packages.entry(parent).or_default().insert(dir);
    }

    for (dir, files) in &dir_to_files {
        let files: Vec<String> = files.iter().cloned().collect();
        let packages: Vec<String> = dir_to_packages
            .get(dir)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();

        let barrel = cjs_barrel(dir, &files, &packages);
        store.request_dir(Path::new(dir));
        store.write(
            Path::new(&format!("{dir}/index.js")),
            barrel,
            WriteOptions::tagged("index"),
        );
    }

    Ok(())
}
