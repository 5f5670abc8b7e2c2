//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "qre",
    version,
    about = "Questionnaire response engine - schema checks and session replay",
    long_about = "Validate questionnaire definitions and replay recorded collection\n\
                  sessions through the response validation and navigation engines."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a questionnaire definition and report authoring defects.
    Check(CheckArgs),

    /// Replay a recorded session through validation and navigation.
    Replay(ReplayArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the questionnaire definition JSON.
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,
}

#[derive(Parser)]
pub struct ReplayArgs {
    /// Path to the questionnaire definition JSON.
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Path to the recorded session JSON.
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Print the derived prompting order after the verdict table.
    #[arg(long = "show-prompts")]
    pub show_prompts: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
