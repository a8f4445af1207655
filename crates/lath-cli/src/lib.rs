//! # lath-cli
//!
//! Command-line driver for the lath module generator.
//!
//! The binary selects which generation phases run and in what order, feeds
//! them a shared [`StagedFileStore`](lath_store::StagedFileStore), reports
//! each commit's change summary, and maps failures to process exit codes.
//! All of the interesting work lives in the library crates; this one is
//! orchestration, configuration, and terminal output.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;
