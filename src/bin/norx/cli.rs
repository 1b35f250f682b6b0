//! # CLI Interface
//!
//! Command-line arguments of the `norx` test-vector tool, using `clap`
//! derive. Three subcommands: `genkat`, `check` and `debug`.

use crate::logging::LogFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// NORX64 test-vector tool.
///
/// Generates and checks the known-answer table of NORX64-4-1 and dumps a
/// worked example of a full seal/open cycle.
#[derive(Parser, Debug)]
#[command(name = "norx", about = "NORX64 test-vector tool", version, propagate_version = true)]
pub struct NorxCli {
    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "NORX_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, global = true, env = "NORX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the known-answer table.
    Genkat(GenkatArgs),
    /// Regenerate the known-answer table and compare it with a reference file.
    Check(CheckArgs),
    /// Seal and open the reference example and dump every buffer.
    Debug(DebugArgs),
}

/// Arguments for the `genkat` subcommand.
#[derive(Parser, Debug)]
pub struct GenkatArgs {
    /// Write the table to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Reference table to compare against. Defaults to the table shipped with the crate.
    #[arg(long, short = 'k')]
    pub kat: Option<PathBuf>,
}

/// Arguments for the `debug` subcommand.
#[derive(Parser, Debug)]
pub struct DebugArgs {
    /// Instance to run.
    #[arg(long, value_enum, default_value_t = Variant::Norx6441)]
    pub variant: Variant,
}

/// NORX64 instance, by round count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// NORX64-4-1
    #[value(name = "6441")]
    Norx6441,
    /// NORX64-6-1
    #[value(name = "6461")]
    Norx6461,
}
