//! # lath-gen
//!
//! Pure text-to-text module transforms for the lath generator.
//!
//! Every transformation in this crate is a named function mapping source
//! text (plus path context) to destination text. There is deliberately no
//! parser and no AST: the input is the regular, machine-emitted output of a
//! module emitter, and the rules are narrow, enumerable rewrites over that
//! known shape. The functions here never touch the filesystem — callers
//! read and write through the staged store and hand text in and out.
//!
//! The transformation kinds:
//!
//! - [`shim`] — minimal modules forwarding to a generated module at a
//!   computed relative path (CJS and ESM flavors).
//! - [`barrel`] — per-directory `index` modules re-exporting every sibling
//!   file's default symbol and every child package.
//! - [`convert`] — CommonJS → ES-module conversion, a fixed pipeline of
//!   rewrite rules.
//! - [`fixups`] — external-namespace require rewriting for the CJS output
//!   (deep relative requires collapse onto the namespace's own module).
//! - [`skip`] — exclusion rules for source modules with no runtime
//!   representation.

pub mod barrel;
pub mod convert;
pub mod fixups;
pub mod paths;
pub mod shim;
pub mod skip;

pub use barrel::{BarrelTarget, cjs_barrel, esm_barrel};
pub use convert::convert_cjs_to_esm;
pub use fixups::apply_namespace_fixups;
pub use shim::{cjs_reexport_shim, esm_reexport_shim};
pub use skip::should_skip_source;
