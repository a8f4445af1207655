//! lath - distribution module generator for the component library.
//!
//! Entry point: parses arguments, initializes logging and colors, and
//! dispatches to the selected phase command.

use clap::Parser;
use lath_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    let result = match args.command {
        cli::Command::GenLib(gen_args) => commands::gen_lib::execute(gen_args),
        cli::Command::GenEsm(esm_args) => commands::gen_esm::execute(esm_args),
        cli::Command::FixLibs(fix_args) => commands::fix_libs::execute(fix_args),
        cli::Command::CheckCycles(cycle_args) => commands::check_cycles::execute(cycle_args),
    };

    result.map_err(error::cli_error_to_miette)
}
