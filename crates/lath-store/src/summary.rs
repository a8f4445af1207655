//! Commit classification report.

use serde::Serialize;

/// One classified path from a commit pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Normalized absolute path.
    pub path: String,
    /// Category tags accumulated by every writer that touched the path,
    /// in insertion order, duplicates allowed.
    pub tags: Vec<String>,
    /// True when the path was left alone because it is create-only and the
    /// on-disk content diverged (a manually customized file).
    pub ignored: bool,
}

/// Result of one [`commit`](crate::StagedFileStore::commit) pass.
///
/// Every staged path with a pending write lands in exactly one of `added`,
/// `modified`, or `unmodified`; every path that was read from the real
/// filesystem appears in `read` regardless of write status. The accessors
/// filter by tag so the driver can report per-category statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeSummary {
    added: Vec<FileRecord>,
    modified: Vec<FileRecord>,
    unmodified: Vec<FileRecord>,
    read: Vec<FileRecord>,
    /// Number of directories the commit pass had to create.
    pub directories_created: usize,
    /// Total byte length of content written (added and modified files only;
    /// in dry-run mode this counts what would have been written).
    pub total_bytes_written: usize,
    total_files_changed: usize,
}

impl ChangeSummary {
    /// Paths classified as newly created, optionally filtered by tag.
    pub fn added(&self, tag: Option<&str>) -> Vec<&str> {
        filter_paths(&self.added, tag)
    }

    /// Paths classified as rewritten with new content.
    pub fn modified(&self, tag: Option<&str>) -> Vec<&str> {
        filter_paths(&self.modified, tag)
    }

    /// Paths whose staged content matched the disk content, plus the
    /// ignored (create-only protected) paths.
    pub fn unmodified(&self, tag: Option<&str>) -> Vec<&str> {
        filter_paths(&self.unmodified, tag)
    }

    /// The create-only protected subset of `unmodified`.
    pub fn ignored(&self, tag: Option<&str>) -> Vec<&str> {
        self.unmodified
            .iter()
            .filter(|r| r.ignored && matches_tag(r, tag))
            .map(|r| r.path.as_str())
            .collect()
    }

    /// Paths that were read from the real filesystem during the run.
    pub fn read(&self, tag: Option<&str>) -> Vec<&str> {
        filter_paths(&self.read, tag)
    }

    /// Count of files added or modified by this commit.
    pub fn total_files_changed(&self) -> usize {
        self.total_files_changed
    }

    pub(crate) fn record_added(&mut self, path: String, tags: Vec<String>) {
        self.total_files_changed += 1;
        self.added.push(FileRecord {
            path,
            tags,
            ignored: false,
        });
    }

    pub(crate) fn record_modified(&mut self, path: String, tags: Vec<String>) {
        self.total_files_changed += 1;
        self.modified.push(FileRecord {
            path,
            tags,
            ignored: false,
        });
    }

    pub(crate) fn record_unmodified(&mut self, path: String, tags: Vec<String>, ignored: bool) {
        self.unmodified.push(FileRecord {
            path,
            tags,
            ignored,
        });
    }

    pub(crate) fn record_read(&mut self, path: String, tags: Vec<String>) {
        self.read.push(FileRecord {
            path,
            tags,
            ignored: false,
        });
    }
}

fn matches_tag(record: &FileRecord, tag: Option<&str>) -> bool {
    match tag {
        None => true,
        Some(tag) => record.tags.iter().any(|t| t == tag),
    }
}

fn filter_paths<'a>(records: &'a [FileRecord], tag: Option<&str>) -> Vec<&'a str> {
    records
        .iter()
        .filter(|r| matches_tag(r, tag))
        .map(|r| r.path.as_str())
        .collect()
}
