//! Shared helpers for the phase commands.

use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use lath_store::{ChangeSummary, normalize_key};

use crate::error::Result;

/// Tags the reporting breaks statistics down by.
pub const REPORT_TAGS: [&str; 4] = ["cjs-module", "esm-module", "index", "rexport"];

/// Recursively list files under `dir` with the given extension, as sorted
/// normalized keys. A missing directory yields an empty listing.
///
/// Sorting fixes discovery order, which downstream determines barrel
/// ordering and cycle reporting order.
pub fn list_files(dir: &Path, ext: &str) -> Vec<String> {
    let mut paths: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == ext)
        })
        .map(|entry| normalize_key(entry.path()))
        .collect();
    paths.sort();
    paths
}

/// Re-root a normalized key from one tree into another.
///
/// `map_tree("/p/src/ui/X.hx", "/p/src", "/p/lib")` → `/p/lib/ui/X.hx`.
/// Keys outside `from_dir` pass through unchanged.
pub fn map_tree(key: &str, from_dir: &str, to_dir: &str) -> String {
    match key.strip_prefix(from_dir) {
        Some(rest) if rest.starts_with('/') => format!("{to_dir}{rest}"),
        _ => key.to_string(),
    }
}

/// Print one commit's change summary.
///
/// Per-tag statistics and the byte/directory counters are debug-level
/// detail; the always-visible report is the added/unmodified counts, the
/// ignored-file notice, and the modified-file list.
pub fn report_summary(summary: &ChangeSummary, dry_run: bool, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    for tag in REPORT_TAGS {
        let added = summary.added(Some(tag)).len();
        let modified = summary.modified(Some(tag)).len();
        let unmodified = summary.unmodified(Some(tag)).len();
        if added > 0 || modified > 0 || unmodified > 0 {
            debug!(tag, added, modified, unmodified, "commit stats");
        }
    }
    debug!(
        directories_created = summary.directories_created,
        total_bytes_written = summary.total_bytes_written,
        "commit totals"
    );

    let added = summary.added(None);
    let modified = summary.modified(None);
    let unmodified = summary.unmodified(None);
    let ignored = summary.ignored(None);

    if !added.is_empty() {
        if dry_run {
            println!("{} files will be created", added.len());
        } else {
            println!("{} files created", added.len());
        }
    }
    if !unmodified.is_empty() {
        if dry_run {
            println!("{} files will not be modified", unmodified.len());
        } else {
            println!("{} files were not modified", unmodified.len());
        }
    }
    if !ignored.is_empty() {
        println!("The following modules are left alone since they contain custom modifications:");
        for path in &ignored {
            println!("{path}");
        }
    }
    if !modified.is_empty() {
        if dry_run {
            println!("{} files will be modified. Here is the list:", modified.len());
        } else {
            println!("{} files modified. Here is the list:", modified.len());
        }
        for path in &modified {
            println!("{path}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("ui/controls")).unwrap();
        fs::write(tmp.path().join("ui/Zed.hx"), "").unwrap();
        fs::write(tmp.path().join("ui/Alpha.hx"), "").unwrap();
        fs::write(tmp.path().join("ui/readme.md"), "").unwrap();
        fs::write(tmp.path().join("ui/controls/Check.hx"), "").unwrap();

        let files = list_files(tmp.path(), "hx");
        assert_eq!(files.len(), 3);
        assert!(files[0].ends_with("ui/Alpha.hx"));
        assert!(files[1].ends_with("ui/Zed.hx"));
        assert!(files[2].ends_with("ui/controls/Check.hx"));
    }

    #[test]
    fn test_list_files_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(list_files(&tmp.path().join("absent"), "hx").is_empty());
    }

    #[test]
    fn test_map_tree() {
        assert_eq!(
            map_tree("/p/src/ui/X.hx", "/p/src", "/p/lib"),
            "/p/lib/ui/X.hx"
        );
        assert_eq!(
            map_tree("/elsewhere/X.hx", "/p/src", "/p/lib"),
            "/elsewhere/X.hx"
        );
    }
}
