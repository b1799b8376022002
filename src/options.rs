//! Build command options
//!
//! The state a build command carries into each extension build: the
//! user's flags plus host facts resolved once up front.

use crate::platform::{self, OsFamily};
use std::path::PathBuf;

/// Default root for per-extension temporary build directories
pub const DEFAULT_BUILD_TEMP: &str = "build/temp";
/// Default root for built extension modules
pub const DEFAULT_BUILD_LIB: &str = "build/lib";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Explicit debug flag; `None` defers to the `DEBUG` variable
    pub debug: Option<bool>,
    /// Parallel job count for `cmake --build` (0 means unset)
    pub parallel: Option<usize>,
    /// Distribution platform name (e.g., "win-amd64")
    pub plat_name: String,
    /// Root of per-extension temporary build directories
    pub build_temp: PathBuf,
    /// Root for built extension modules
    pub build_lib: PathBuf,
    /// Place modules next to the sources instead of under `build_lib`
    pub inplace: bool,
    /// Interpreter passed to CMake as `PYTHON_EXECUTABLE`
    pub python: PathBuf,
    /// Extension module filename suffix (e.g., ".so")
    pub ext_suffix: String,
    /// Host OS family
    pub os_family: OsFamily,
    /// `cmake` program to run
    pub cmake: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        let os_family = OsFamily::current();
        Self {
            debug: None,
            parallel: None,
            plat_name: platform::default_plat_name(),
            build_temp: PathBuf::from(DEFAULT_BUILD_TEMP),
            build_lib: PathBuf::from(DEFAULT_BUILD_LIB),
            inplace: false,
            python: PathBuf::from("python3"),
            ext_suffix: platform::fallback_ext_suffix(os_family).to_string(),
            os_family,
            cmake: "cmake".to_string(),
        }
    }
}

impl BuildOptions {
    /// Parallel job count, if one was requested
    pub fn jobs(&self) -> Option<usize> {
        self.parallel.filter(|n| *n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_parallel_is_unset() {
        let options = BuildOptions {
            parallel: Some(0),
            ..BuildOptions::default()
        };
        assert_eq!(options.jobs(), None);
    }

    #[test]
    fn defaults_follow_host() {
        let options = BuildOptions::default();
        assert_eq!(options.debug, None);
        assert_eq!(options.os_family, OsFamily::current());
        assert_eq!(options.plat_name, platform::default_plat_name());
        assert_eq!(options.cmake, "cmake");
    }
}
