//! Verbose logging
//!
//! Respects the global `--verbose` flag. When disabled, logging is a
//! single atomic load.

use crate::process::Invocation;
use std::sync::OnceLock;

static VERBOSE_ENABLED: OnceLock<bool> = OnceLock::new();

/// Initialize verbose mode from the command-line flag
pub fn init_verbose(enabled: bool) {
    let _ = VERBOSE_ENABLED.set(enabled);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE_ENABLED.get().copied().unwrap_or(false)
}

/// Print a verbose message if verbose mode is enabled
pub fn verbose_log(message: &str) {
    if is_verbose() {
        eprintln!("[verbose] {message}");
    }
}

/// Echo a command line before it is spawned
pub fn echo_invocation(invocation: &Invocation) {
    if is_verbose() {
        eprintln!(
            "[verbose] (cd {}) {}",
            invocation.cwd.display(),
            invocation.command_line()
        );
    }
}

/// Usage: `verbose!("configuring {}", name)`
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            eprintln!("[verbose] {}", format_args!($($arg)*));
        }
    };
}
