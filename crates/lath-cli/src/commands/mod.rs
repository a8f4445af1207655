//! Phase command implementations.
//!
//! Each submodule is one subcommand's `execute` entry point. The phases
//! share a staged store per invocation, commit in one or two passes, and
//! report the resulting change summary through [`utils::report_summary`].

pub mod check_cycles;
pub mod fix_libs;
pub mod gen_esm;
pub mod gen_lib;
pub mod utils;
