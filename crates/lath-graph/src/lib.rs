//! # lath-graph
//!
//! Import graph construction and circular-dependency analysis for the
//! generated ES-module output.
//!
//! CommonJS requires resolve lazily, so the emitter's deferred-require
//! pattern makes import cycles harmless there. The ES-module output binds
//! eagerly: importing a module executes its whole top-level body first,
//! and a cycle means some module observes a half-initialized dependency.
//! This crate walks the generated modules' static default imports into a
//! directed multigraph ([`GraphRegistry`]), records cycles found during an
//! explicit-stack depth-first traversal ([`ImportGraphWalker`]), and runs
//! textual heuristics over the participating modules to flag the cycles
//! likely to break at runtime ([`analyze_cycles`]).
//!
//! Reads go through the staged store, so the walker sees generation output
//! that has not been committed yet.

mod analyzer;
mod cycle;
mod error;
mod registry;
mod walker;

pub use analyzer::{CycleDiagnostic, EXPORT_MARKER, INIT_MARKER, RiskKind, analyze_cycles};
pub use cycle::Cycle;
pub use error::GraphError;
pub use registry::{GraphRegistry, ImportEdge, ModuleNode};
pub use walker::ImportGraphWalker;

/// Convenience result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
