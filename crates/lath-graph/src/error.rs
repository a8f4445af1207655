//! Error types for graph walking.

use thiserror::Error;

/// Errors produced while building the import graph.
///
/// Cycle findings are never errors — they come back as data. The only
/// failure modes are filesystem-level, surfaced through the staged store.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Reading a module through the staged store failed.
    #[error(transparent)]
    Store(#[from] lath_store::StoreError),
}
