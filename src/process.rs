//! Child process invocation
//!
//! `cmake` runs as a blocking child process with inherited stdio, so its
//! progress output reaches the terminal unchanged. The [`CommandRunner`]
//! trait is the seam tests use to observe invocations without spawning.

use crate::error::BuildError;
use serde::Serialize;
use std::path::PathBuf;
use std::process::Command;

/// A single program execution: program, arguments, working directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            cwd,
        }
    }

    /// Render as a shell-quoted command line for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|word| shlex::try_quote(word).map_or_else(|_| word.to_string(), |q| q.into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Executes invocations, failing on spawn errors and non-zero exits
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), BuildError>;
}

/// Runs invocations as real child processes and waits for them
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), BuildError> {
        crate::verbose::echo_invocation(invocation);

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .map_err(|source| BuildError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::ProcessFailed {
                program: invocation.program.clone(),
                args: invocation.args.clone(),
                code: status.code(),
            })
        }
    }
}
