//! Error types for staged filesystem operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the staged file store.
///
/// Filesystem failures are fatal and propagate to the driver; the one
/// expected non-error condition (a directory that already exists when the
/// commit pass creates it) is swallowed inside the store and never surfaces
/// here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A read was requested for a path that is neither staged nor present
    /// on the real filesystem.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not valid UTF-8. Generated modules are always
    /// UTF-8 text, so this indicates the path points at something else.
    #[error("file is not valid UTF-8 text: {}", .0.display())]
    NotUtf8(PathBuf),

    /// Underlying I/O failure (permissions, disk full, …) while reading,
    /// writing, or creating directories.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path the operation was acting on.
        path: PathBuf,
        /// The originating filesystem error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Attach a path to a raw I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
