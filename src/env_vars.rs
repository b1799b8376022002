//! Build environment variable handling.
//!
//! All variables are read once into a [`BuildEnv`] snapshot which is then
//! passed to the orchestrator, so nothing downstream touches process state.

use crate::error::BuildError;
use std::collections::BTreeMap;
use std::env;
use std::num::IntErrorKind;

/// Debug build override (integer, non-zero means debug)
pub const DEBUG: &str = "DEBUG";
/// Extra configure arguments, split with POSIX shell rules
pub const CMAKE_ARGS: &str = "CMAKE_ARGS";
/// `-arch` flags for macOS fat binaries
pub const ARCHFLAGS: &str = "ARCHFLAGS";
/// Native parallelism setting understood by `cmake --build` (presence only)
pub const CMAKE_BUILD_PARALLEL_LEVEL: &str = "CMAKE_BUILD_PARALLEL_LEVEL";
/// Overrides the extension filename suffix
pub const SETUPTOOLS_EXT_SUFFIX: &str = "SETUPTOOLS_EXT_SUFFIX";

const CAPTURED: &[&str] = &[
    DEBUG,
    CMAKE_ARGS,
    ARCHFLAGS,
    CMAKE_BUILD_PARALLEL_LEVEL,
    SETUPTOOLS_EXT_SUFFIX,
];

/// Snapshot of the environment variables consumed by a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    vars: BTreeMap<String, String>,
}

impl BuildEnv {
    /// Capture the relevant variables from the current process.
    ///
    /// Values that are not valid Unicode are converted lossily.
    pub fn capture() -> Self {
        Self::from_vars(
            env::vars_os()
                .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned())),
        )
    }

    /// Build a snapshot from explicit pairs; unrelated names are dropped.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| CAPTURED.contains(&k.as_str()))
            .collect();
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// `DEBUG` as a boolean (defaults to "0"; any non-zero integer is true).
    pub fn debug_flag(&self) -> Result<bool, BuildError> {
        let raw = self.get(DEBUG).unwrap_or("0");
        match strip_digit_separators(raw.trim()).parse::<i64>() {
            Ok(n) => Ok(n != 0),
            // Out of range is still a non-zero integer
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Ok(true)
            }
            Err(source) => Err(BuildError::InvalidDebugFlag {
                value: raw.to_string(),
                source,
            }),
        }
    }

    /// `CMAKE_ARGS` split into words (empty when unset).
    pub fn cmake_args(&self) -> Result<Vec<String>, BuildError> {
        self.split_words(CMAKE_ARGS)
    }

    /// `ARCHFLAGS` split into words (empty when unset).
    pub fn archflags(&self) -> Result<Vec<String>, BuildError> {
        self.split_words(ARCHFLAGS)
    }

    /// Whether `cmake --build` already has a parallelism setting.
    pub fn build_parallel_level_set(&self) -> bool {
        self.contains(CMAKE_BUILD_PARALLEL_LEVEL)
    }

    /// Extension suffix override, ignoring empty values.
    pub fn ext_suffix(&self) -> Option<&str> {
        self.get(SETUPTOOLS_EXT_SUFFIX).filter(|s| !s.is_empty())
    }

    fn split_words(&self, var: &'static str) -> Result<Vec<String>, BuildError> {
        let value = self.get(var).unwrap_or_default();
        shlex::split(value).ok_or_else(|| BuildError::ShellSplit {
            var,
            value: value.to_string(),
        })
    }
}

/// Drop `_` only where it sits between two digits, as in `1_000`
fn strip_digit_separators(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let is_digit_at =
        |i: Option<usize>| i.and_then(|i| chars.get(i)).is_some_and(char::is_ascii_digit);
    chars
        .iter()
        .enumerate()
        .filter(|&(i, c)| {
            *c != '_' || !(is_digit_at(i.checked_sub(1)) && is_digit_at(Some(i + 1)))
        })
        .map(|(_, c)| *c)
        .collect()
}
