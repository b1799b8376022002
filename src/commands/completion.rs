//! Completion command
//!
//! Generate shell completion scripts

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io;

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
///
/// # Examples
///
/// ```bash
/// # Bash
/// cmake-ext-builder completion bash > /usr/local/share/bash-completion/completions/cmake-ext-builder
///
/// # Zsh
/// cmake-ext-builder completion zsh > /usr/local/share/zsh/site-functions/_cmake-ext-builder
///
/// # Fish
/// cmake-ext-builder completion fish > ~/.config/fish/completions/cmake-ext-builder.fish
/// ```
#[allow(
    clippy::unnecessary_wraps,
    reason = "Result type maintained for consistency with command signature pattern"
)]
pub(crate) fn run(shell: Shell) -> Result<()> {
    let mut cmd = crate::Cli::command();

    generate(shell, &mut cmd, "cmake-ext-builder", &mut io::stdout());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        crate::Cli::command().debug_assert();
    }

    #[test]
    fn completion_bash() {
        assert!(run(Shell::Bash).is_ok());
    }

    #[test]
    fn completion_zsh() {
        assert!(run(Shell::Zsh).is_ok());
    }

    #[test]
    fn completion_fish() {
        assert!(run(Shell::Fish).is_ok());
    }
}
