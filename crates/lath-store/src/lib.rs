//! # lath-store
//!
//! Staged filesystem overlay for the lath module generator.
//!
//! Every generation phase reads and writes through a [`StagedFileStore`]
//! instead of touching the real filesystem. Writes accumulate in memory and
//! land on disk in a single [`StagedFileStore::commit`] pass, which also
//! classifies every touched path into a [`ChangeSummary`]. This gives the
//! pipeline three properties the phases rely on:
//!
//! - **Read-after-write**: a later phase observes an earlier phase's
//!   uncommitted output, so phases compose without any particular ordering
//!   relative to disk state.
//! - **Diff-aware writes**: a file is only physically rewritten when its
//!   content actually changed, so repeated runs leave timestamps (and watch
//!   tooling) alone.
//! - **Customization protection**: paths staged create-only are never
//!   overwritten when they already exist with divergent content; they are
//!   surfaced in the summary's ignored list instead.
//!
//! The store is an explicit owned value passed `&mut` into every operation.
//! There is exactly one logical writer, so no locking is involved.

mod error;
mod path;
mod store;
mod summary;

pub use error::StoreError;
pub use path::normalize_key;
pub use store::{StagedFile, StagedFileStore, WriteOptions};
pub use summary::{ChangeSummary, FileRecord};

/// Convenience result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
