//! The staged filesystem overlay and its commit pass.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::path::normalize_key;
use crate::summary::ChangeSummary;
use crate::{Result, StoreError};

/// One staged entry, created on first read-or-write of a path and mutated
/// additively by every subsequent touch within the run. Entries are never
/// deleted; the store lives for exactly one invocation.
#[derive(Debug, Clone)]
pub struct StagedFile {
    content: String,
    original_content: Option<String>,
    perform_write: bool,
    create_only: bool,
    tags: Vec<String>,
}

impl StagedFile {
    /// Latest content, whether freshly read or newly written.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content observed on the real filesystem at first touch; `None` if the
    /// path was only ever written as new.
    pub fn original_content(&self) -> Option<&str> {
        self.original_content.as_deref()
    }

    /// True once any writer requested persistence for this path.
    pub fn perform_write(&self) -> bool {
        self.perform_write
    }

    /// Tags accumulated across all writers, in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Options for [`StagedFileStore::write`].
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    tags: Vec<String>,
    create_only: bool,
}

impl WriteOptions {
    /// Options with no tags and no create-only protection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying a single category tag.
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self::new().tag(tag)
    }

    /// Append a category tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Protect an existing divergent file from being overwritten. Once set
    /// true for a path the flag is sticky for the rest of the run.
    pub fn create_only(mut self, create_only: bool) -> Self {
        self.create_only = create_only;
        self
    }
}

/// In-memory overlay over the real filesystem.
///
/// Reads fall through to disk on first touch and are cached; writes stage
/// content without any disk I/O until [`commit`](Self::commit). Keys are
/// normalized with [`normalize_key`], so the same file reached through
/// different spellings maps to one entry.
#[derive(Debug, Default)]
pub struct StagedFileStore {
    files: IndexMap<String, StagedFile>,
    dirs_to_create: IndexSet<String>,
}

impl StagedFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file through the overlay.
    ///
    /// Staged content wins over disk content, which makes writes from an
    /// earlier phase visible to later phases before any commit.
    pub fn read(&mut self, path: &Path) -> Result<String> {
        self.read_tagged(path, None)
    }

    /// Read a file through the overlay, recording a category tag if this is
    /// the first touch of the path.
    pub fn read_tagged(&mut self, path: &Path, tag: Option<&str>) -> Result<String> {
        let key = normalize_key(path);

        if let Some(file) = self.files.get(&key) {
            trace!(path = %key, "overlay read");
            return Ok(file.content.clone());
        }

        let content = match fs::read_to_string(&key) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path.to_path_buf()));
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(StoreError::NotUtf8(path.to_path_buf()));
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        trace!(path = %key, bytes = content.len(), "disk read");
        self.files.insert(
            key,
            StagedFile {
                content: content.clone(),
                original_content: Some(content.clone()),
                perform_write: false,
                create_only: false,
                tags: tag.map(String::from).into_iter().collect(),
            },
        );

        Ok(content)
    }

    /// Stage new content for a path. No disk I/O happens here.
    pub fn write(&mut self, path: &Path, content: impl Into<String>, options: WriteOptions) {
        let key = normalize_key(path);
        let entry = self.files.entry(key).or_insert_with(|| StagedFile {
            content: String::new(),
            original_content: None,
            perform_write: false,
            create_only: false,
            tags: Vec::new(),
        });

        entry.content = content.into();
        entry.perform_write = true;
        entry.tags.extend(options.tags);
        if options.create_only {
            entry.create_only = true;
        }
    }

    /// Record that a directory (and implicitly all of its ancestors) must
    /// exist before any staged write lands.
    pub fn request_dir(&mut self, path: &Path) {
        self.dirs_to_create.insert(normalize_key(path));
    }

    /// Look up a staged entry without touching the filesystem.
    pub fn staged(&self, path: &Path) -> Option<&StagedFile> {
        self.files.get(&normalize_key(path))
    }

    /// Materialize requested directories and staged writes in one
    /// deterministic pass, classifying every touched path.
    ///
    /// In dry-run mode nothing on disk changes but the returned summary
    /// reports what a real commit would have done.
    pub fn commit(&mut self, dry_run: bool) -> Result<ChangeSummary> {
        let mut summary = ChangeSummary::default();

        // Directory materialization first, with a memoized existence check
        // so each directory is probed at most once per commit.
        let mut existing: FxHashSet<String> = FxHashSet::default();
        for dir in &self.dirs_to_create {
            create_dir_chain(dir, dry_run, &mut existing, &mut summary)?;
        }

        for (key, file) in &self.files {
            // Anything that was read from the real filesystem is reported,
            // written or not.
            if file.original_content.is_some() {
                summary.record_read(key.clone(), file.tags.clone());
            }

            if !file.perform_write {
                continue;
            }

            let path = Path::new(key);
            let prior = match &file.original_content {
                Some(original) => Some(original.clone()),
                None if path.exists() => match fs::read_to_string(path) {
                    Ok(content) => Some(content),
                    Err(e) if e.kind() == ErrorKind::InvalidData => {
                        return Err(StoreError::NotUtf8(PathBuf::from(key)));
                    }
                    Err(e) => return Err(StoreError::io(path, e)),
                },
                None => None,
            };

            match prior {
                None => {
                    debug!(path = %key, "added");
                    summary.record_added(key.clone(), file.tags.clone());
                    summary.total_bytes_written += file.content.len();
                    if !dry_run {
                        fs::write(path, &file.content).map_err(|e| StoreError::io(path, e))?;
                    }
                }
                Some(original) if original == file.content => {
                    summary.record_unmodified(key.clone(), file.tags.clone(), false);
                }
                Some(_) if file.create_only => {
                    // Divergent content under create-only protection: the
                    // manual edits win, and the summary says so.
                    debug!(path = %key, "ignored (create-only)");
                    summary.record_unmodified(key.clone(), file.tags.clone(), true);
                }
                Some(_) => {
                    debug!(path = %key, "modified");
                    summary.record_modified(key.clone(), file.tags.clone());
                    summary.total_bytes_written += file.content.len();
                    if !dry_run {
                        fs::write(path, &file.content).map_err(|e| StoreError::io(path, e))?;
                    }
                }
            }
        }

        Ok(summary)
    }
}

/// Create `target` and every missing ancestor, one component at a time.
///
/// Directory creation is idempotent: an `AlreadyExists` race (the path was
/// created concurrently by an ancestor's side effect or an earlier request)
/// is swallowed.
fn create_dir_chain(
    target: &str,
    dry_run: bool,
    existing: &mut FxHashSet<String>,
    summary: &mut ChangeSummary,
) -> Result<()> {
    let mut prefix = String::with_capacity(target.len());

    for segment in target.split('/') {
        if segment.is_empty() {
            // Leading root on absolute paths.
            if prefix.is_empty() {
                prefix.push('/');
            }
            continue;
        }
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        prefix.push_str(segment);

        if existing.contains(&prefix) {
            continue;
        }
        if Path::new(&prefix).exists() {
            existing.insert(prefix.clone());
            continue;
        }

        if dry_run {
            summary.directories_created += 1;
        } else {
            match fs::create_dir(&prefix) {
                Ok(()) => summary.directories_created += 1,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => return Err(StoreError::io(&prefix, e)),
            }
        }
        existing.insert(prefix.clone());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_disk(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = StagedFileStore::new();

        let err = store.read(&dir.path().join("absent.js")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_read_after_write_sees_staged_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gen.js");
        let mut store = StagedFileStore::new();

        store.write(&path, "staged", WriteOptions::tagged("cjs-module"));
        assert_eq!(store.read(&path).unwrap(), "staged");
        // Nothing on disk yet.
        assert!(!path.exists());
    }

    #[test]
    fn test_read_caches_original_content() {
        let dir = TempDir::new().unwrap();
        let path = write_disk(&dir, "mod.js", "on disk");
        let mut store = StagedFileStore::new();

        assert_eq!(store.read(&path).unwrap(), "on disk");
        let staged = store.staged(&path).unwrap();
        assert_eq!(staged.original_content(), Some("on disk"));
        assert!(!staged.perform_write());
    }

    #[test]
    fn test_commit_classifies_added() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.js");
        let mut store = StagedFileStore::new();

        store.write(&path, "fresh", WriteOptions::tagged("cjs-module"));
        let summary = store.commit(false).unwrap();

        assert_eq!(summary.added(None).len(), 1);
        assert!(summary.modified(None).is_empty());
        assert!(summary.unmodified(None).is_empty());
        assert_eq!(summary.total_bytes_written, "fresh".len());
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_commit_classifies_modified_and_unmodified() {
        let dir = TempDir::new().unwrap();
        let same = write_disk(&dir, "same.js", "alpha");
        let changed = write_disk(&dir, "changed.js", "alpha");
        let mut store = StagedFileStore::new();

        store.read(&same).unwrap();
        store.read(&changed).unwrap();
        store.write(&same, "alpha", WriteOptions::new());
        store.write(&changed, "beta", WriteOptions::new());

        let summary = store.commit(false).unwrap();
        assert_eq!(summary.unmodified(None).len(), 1);
        assert_eq!(summary.modified(None).len(), 1);
        assert_eq!(summary.total_files_changed(), 1);
        assert_eq!(fs::read_to_string(&changed).unwrap(), "beta");
        assert_eq!(fs::read_to_string(&same).unwrap(), "alpha");
    }

    #[test]
    fn test_create_only_preserves_customized_file() {
        let dir = TempDir::new().unwrap();
        let path = write_disk(&dir, "custom.js", "hand edited");
        let mut store = StagedFileStore::new();

        store.write(
            &path,
            "regenerated",
            WriteOptions::tagged("rexport").create_only(true),
        );
        let summary = store.commit(false).unwrap();

        assert_eq!(summary.ignored(None).len(), 1);
        assert!(summary.modified(None).is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hand edited");
    }

    #[test]
    fn test_create_only_still_creates_new_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shim.js");
        let mut store = StagedFileStore::new();

        store.write(&path, "shim body", WriteOptions::new().create_only(true));
        let summary = store.commit(false).unwrap();

        assert_eq!(summary.added(None).len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "shim body");
    }

    #[test]
    fn test_commit_is_idempotent_across_runs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gen.js");

        let mut first = StagedFileStore::new();
        first.write(&path, "generated", WriteOptions::tagged("cjs-module"));
        let summary = first.commit(false).unwrap();
        assert_eq!(summary.added(None).len(), 1);

        // Second run with identical generation output: everything
        // unmodified, nothing rewritten.
        let mut second = StagedFileStore::new();
        second.write(&path, "generated", WriteOptions::tagged("cjs-module"));
        let summary = second.commit(false).unwrap();
        assert!(summary.added(None).is_empty());
        assert!(summary.modified(None).is_empty());
        assert_eq!(summary.unmodified(None).len(), 1);
        assert_eq!(summary.total_files_changed(), 0);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let existing = write_disk(&dir, "mod.js", "old");
        let fresh = dir.path().join("sub/new.js");
        let mut store = StagedFileStore::new();

        store.request_dir(&dir.path().join("sub"));
        store.read(&existing).unwrap();
        store.write(&existing, "new", WriteOptions::new());
        store.write(&fresh, "body", WriteOptions::new());

        let summary = store.commit(true).unwrap();
        assert_eq!(summary.added(None).len(), 1);
        assert_eq!(summary.modified(None).len(), 1);
        assert_eq!(summary.directories_created, 1);
        assert_eq!(summary.total_bytes_written, "new".len() + "body".len());

        assert_eq!(fs::read_to_string(&existing).unwrap(), "old");
        assert!(!fresh.exists());
        assert!(!dir.path().join("sub").exists());
    }

    #[test]
    fn test_directory_creation_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        let mut store = StagedFileStore::new();

        // The same directory requested repeatedly, plus an ancestor.
        store.request_dir(&nested);
        store.request_dir(&nested);
        store.request_dir(&dir.path().join("a"));

        let summary = store.commit(false).unwrap();
        assert_eq!(summary.directories_created, 3);
        assert!(nested.is_dir());

        // A fresh commit over the now-existing tree creates nothing.
        let mut again = StagedFileStore::new();
        again.request_dir(&nested);
        let summary = again.commit(false).unwrap();
        assert_eq!(summary.directories_created, 0);
    }

    #[test]
    fn test_read_list_includes_unwritten_reads() {
        let dir = TempDir::new().unwrap();
        let path = write_disk(&dir, "input.hx", "class Widget {}");
        let mut store = StagedFileStore::new();

        store.read_tagged(&path, Some("source")).unwrap();
        let summary = store.commit(false).unwrap();

        assert_eq!(summary.read(Some("source")).len(), 1);
        assert!(summary.added(None).is_empty());
    }

    #[test]
    fn test_tags_accumulate_across_writers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mod.js");
        let mut store = StagedFileStore::new();

        store.write(&path, "v1", WriteOptions::tagged("cjs-module"));
        store.write(&path, "v2", WriteOptions::tagged("rexport"));

        let staged = store.staged(&path).unwrap();
        assert_eq!(staged.tags(), ["cjs-module", "rexport"]);
        assert_eq!(staged.content(), "v2");
    }
}
