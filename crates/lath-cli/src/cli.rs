//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Distribution module generator for the component library.
///
/// Phases must run in dependency order: `gen-lib` first, then `gen-esm`
/// (it converts the canonical CommonJS tree before `fix-libs` rewrites it),
/// then `fix-libs`; `check-cycles` inspects the ES-module output that
/// `gen-esm` produced.
#[derive(Debug, Parser)]
#[command(name = "lath", version, about)]
pub struct Cli {
    /// Enable debug-level logging for lath crates
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Only show error-level logs
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available phase commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the CommonJS distribution: per-module re-export shims and
    /// per-directory index barrels
    GenLib(GenLibArgs),

    /// Convert the generated CommonJS modules to ES modules, with ESM
    /// shims and barrels
    GenEsm(GenEsmArgs),

    /// Rewrite requires into external package namespaces across the
    /// generated CommonJS modules
    FixLibs(FixLibsArgs),

    /// Walk the ES-module import graph and report circular import chains
    /// likely to fail at runtime
    CheckCycles(CheckCyclesArgs),
}

/// Options every phase shares.
#[derive(Debug, Clone, Args)]
pub struct SharedArgs {
    /// Project root the configured directories resolve against
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Path to the config file (defaults to <root>/lath.config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Stage and classify everything without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the change summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Override the configured package root directory name
    #[arg(long)]
    pub package_root: Option<String>,

    /// External package namespace (repeatable; overrides the configured
    /// list when given)
    #[arg(long = "namespace")]
    pub namespaces: Vec<String>,
}

/// Arguments for `lath gen-lib`.
#[derive(Debug, Args)]
pub struct GenLibArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
}

/// Arguments for `lath gen-esm`.
#[derive(Debug, Args)]
pub struct GenEsmArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
}

/// Arguments for `lath fix-libs`.
#[derive(Debug, Args)]
pub struct FixLibsArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
}

/// Arguments for `lath check-cycles`.
#[derive(Debug, Args)]
pub struct CheckCyclesArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
}
