//! `lath gen-esm`: ES-module distribution generation.
//!
//! Reads every canonical generated CommonJS module, runs the conversion
//! pipeline, and stages the result under the ESM tree together with a
//! public-layer shim; a second pass stages the ESM barrels. Runs after
//! `gen-lib` and before `fix-libs`: the converter expects the emitter's
//! relative requires, and rewrites external-namespace specifiers itself.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

use lath_gen::paths::{base_name, dir_name};
use lath_gen::{BarrelTarget, convert_cjs_to_esm, esm_barrel, esm_reexport_shim};
use lath_store::{StagedFileStore, WriteOptions, normalize_key};

use crate::cli::GenEsmArgs;
use crate::commands::utils;
use crate::config::{LathConfig, Layout};
use crate::error::Result;
use crate::ui;

/// Execute the gen-esm command.
pub fn execute(args: GenEsmArgs) -> Result<()> {
    let shared = args.shared;
    let config = LathConfig::resolve(&shared)?;
    let layout = Layout::new(&shared.root, &config);
    let mut store = StagedFileStore::new();

    ui::info("Converting generated modules to ES modules...");

    stage_converted_modules(&mut store, &layout, &config)?;
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

/// Convert each canonical CommonJS module and stage it plus its shim.
fn stage_converted_modules(
    store: &mut StagedFileStore,
    layout: &Layout,
    config: &LathConfig,
) -> Result<()> {
    let lib_gen_key = normalize_key(&layout.lib_gen_dir);
    let esm_dir_key = normalize_key(&layout.esm_dir);
    let esm_gen_key = normalize_key(&layout.esm_gen_dir);

    let modules = utils::list_files(&layout.lib_gen_dir, "js");
    debug!(count = modules.len(), "generated modules discovered");

    for module in &modules {
        let content = store.read_tagged(Path::new(module), Some("cjs-module"))?;
        let converted = convert_cjs_to_esm(&content, &config.external_namespaces);

        let esm_path = utils::map_tree(module, &lib_gen_key, &esm_gen_key);
        store.request_dir(Path::new(dir_name(&esm_path)));
        store.write(
            Path::new(&esm_path),
            converted,
            WriteOptions::tagged("esm-module"),
        );

        let public_path = utils::map_tree(&esm_path, &esm_gen_key, &esm_dir_key);
        let shim = esm_reexport_shim(&public_path, &esm_path);
        store.request_dir(Path::new(dir_name(&public_path)));
        store.write(
            Path::new(&public_path),
            shim,
            WriteOptions::tagged("esm-module")
                .tag("rexport")
                .create_only(true),
        );
    }

    Ok(())
}

/// Group the public ESM layer by directory and stage one barrel each.
///
/// Subdirectory entries probe the filesystem at generation time: a sibling
/// `<name>.js` file means the entry aliases that module's default export,
/// otherwise the entry wildcard-re-exports the subdirectory's own barrel.
fn stage_barrels(store: &mut StagedFileStore, layout: &Layout) -> Result<()> {
    let package_dir_key = normalize_key(&layout.esm_package_dir);
    let files = utils::list_files(&layout.esm_package_dir, "js");

    let mut dir_to_files: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut dir_to_packages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    dir_to_files.entry(package_dir_key.clone()).or_default();

    for file in files {
        if base_name(&file) == "index.js" {
            continue;
        }
        let dir = dir_name(&file).to_string();
        let parent = dir_name(&dir).to_string();
        dir_to_files.entry(dir.clone()).or_default().insert(file);
        dir_to_packages.entry(parent).or_default().insert(dir);
    }

    for (dir, files) in &dir_to_files {
        let files: Vec<String> = files.iter().cloned().collect();
        let packages: Vec<(String, BarrelTarget)> = dir_to_packages
            .get(dir)
            .map(|set| {
                set.iter()
                    .map(|package| {
                        let target = if Path::new(&format!("{package}.js")).is_file() {
                            BarrelTarget::File
                        } else {
                            BarrelTarget::Directory
                        };
                        (package.clone(), target)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let barrel = esm_barrel(dir, &files, &packages);
        store.request_dir(Path::new(dir));
        store.write(
            Path::new(&format!("{dir}/index.js")),
            barrel,
            WriteOptions::tagged("index"),
        );
    }

    Ok(())
}
