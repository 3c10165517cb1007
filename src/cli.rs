use std::path::PathBuf;

use clap::Parser;

/// Top-level argument surface.
///
/// Help is modeled as an explicit flag (clap's built-in one exits 0, but
/// printing usage is an exit-1 path here, matching every other early exit).
#[derive(Parser, Debug)]
#[command(
    name = "lwyi",
    about = "Verify that C/C++ build targets link what they include",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print this help message.
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Path to the directory with input files. Default is the current
    /// directory.
    #[arg(short = 'd', long = "binary_dir", value_name = "DIR")]
    pub binary_dir: Option<PathBuf>,

    /// Limit analysis to the given targets.
    #[arg(short = 't', long, value_name = "TARGETS", num_args = 1..)]
    pub targets: Vec<String>,

    /// Number of threads used to process source files. Default depends on
    /// system.
    #[arg(short = 'j', long, value_name = "COUNT", default_value_t = 0)]
    pub parallel: u32,

    /// Run a tool. All subsequent arguments are passed to the tool.
    #[arg(
        long,
        value_name = "TOOL [ARGS]...",
        num_args = 1..,
        allow_hyphen_values = true
    )]
    pub tool: Vec<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
