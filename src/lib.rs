pub mod checker;
pub mod cli;
pub mod commands;
pub mod error;
pub mod model;
pub mod output;
pub mod parallel;
pub mod path_utils;
pub mod scanner;
pub mod tidy;

pub use error::{LwyiError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Build description produced by the build system, expected in the binary dir.
pub const BUILD_INFO_FILE: &str = "link_what_you_include_info.json";

/// Compilation database, expected next to the build description.
pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";
