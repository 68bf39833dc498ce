//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "femview",
    version,
    about = "Finite-element post-processor command interpreter",
    long_about = "Run femview commands against a block mesh.\n\n\
                  Commands come from scripts, a single line, or an interactive prompt.\n\
                  The mesh and session options are read from femview.toml."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: femview.toml in the user config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run command scripts in batch mode.
    Run(RunArgs),

    /// Read commands interactively from stdin.
    Repl,

    /// Run one command line in batch mode.
    Exec(ExecArgs),

    /// List every command with its usage.
    Commands,
}

#[derive(Parser)]
pub struct RunArgs {
    #[arg(value_name = "SCRIPT", required = true)]
    pub scripts: Vec<PathBuf>,

    /// Exit with status 1 if any command was invalid.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Print each command before running it.
    #[arg(long = "echo")]
    pub echo: bool,
}

#[derive(Parser)]
pub struct ExecArgs {
    /// Command line; `;` separates commands.
    #[arg(value_name = "LINE", required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub line: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
