//! Build error taxonomy
//!
//! Every failure is fatal for the build that raised it: configuration errors
//! come from malformed environment values, filesystem errors from the
//! temporary build directory, and process errors from `cmake` itself.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid DEBUG value '{value}': expected an integer")]
    InvalidDebugFlag {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("cannot split {var}: unbalanced quotes or trailing escape in '{value}'")]
    ShellSplit { var: &'static str, value: String },

    #[error("ARCHFLAGS ends with '-arch' but no architecture follows it")]
    MissingArchValue,

    #[error("Python interpreter '{name}' not found in PATH")]
    InterpreterNotFound { name: String },

    #[error("invalid extension '{name}': {reason}")]
    InvalidExtension { name: String, reason: String },

    #[error("build directory already exists: {}", path.display())]
    BuildDirExists { path: PathBuf },

    #[error("failed to create build directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command '{program} {}' failed with {}", args.join(" "), describe_exit(*code))]
    ProcessFailed {
        program: String,
        args: Vec<String>,
        code: Option<i32>,
    },
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |c| format!("exit code {c}"),
    )
}

impl BuildError {
    /// Whether the error happened before any child process was started
    #[must_use]
    pub const fn is_preflight(&self) -> bool {
        !matches!(self, Self::Spawn { .. } | Self::ProcessFailed { .. })
    }
}
