//! `CMake` extension building
//!
//! Builds one extension module with `CMake`, the equivalent of:
//! ```bash
//! mkdir build/temp/_ext && cd build/temp/_ext
//! cmake /path/to/src -DCMAKE_BUILD_TYPE=Release \
//!     -DCMAKE_LIBRARY_OUTPUT_DIRECTORY=/path/to/build/lib ...
//! cmake --build . --config Release
//! ```
//!
//! The library output directory is set both generically and per
//! configuration, since multi-configuration generators (Visual Studio,
//! Xcode) only honor the suffixed variable.

use super::builder::{ExtensionBuild, find_artifact};
use super::types::{BuildReport, CMakeExtension};
use crate::env_vars::BuildEnv;
use crate::error::BuildError;
use crate::ext_path;
use crate::options::BuildOptions;
use crate::platform;
use crate::process::{CommandRunner, Invocation, SystemRunner};
use crate::verbose;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// CMake build configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Configuration {
    Debug,
    Release,
}

impl Configuration {
    #[must_use]
    pub const fn from_debug(debug: bool) -> Self {
        if debug { Self::Debug } else { Self::Release }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything needed to build one extension, computed without side effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub extension: String,
    pub configuration: Configuration,
    pub output_dir: PathBuf,
    pub build_dir: PathBuf,
    pub configure: Invocation,
    pub build: Invocation,
}

/// `CMake` extension builder
///
/// Holds the options and environment snapshot for one build command and
/// runs `cmake` through `R`.
#[derive(Debug)]
pub struct CMakeExtensionBuilder<R = SystemRunner> {
    options: BuildOptions,
    env: BuildEnv,
    runner: R,
}

impl CMakeExtensionBuilder<SystemRunner> {
    /// Create a builder that spawns real `cmake` processes
    #[must_use]
    pub fn new(options: BuildOptions, env: BuildEnv) -> Self {
        Self::with_runner(options, env, SystemRunner)
    }
}

impl<R: CommandRunner> CMakeExtensionBuilder<R> {
    pub fn with_runner(options: BuildOptions, env: BuildEnv, runner: R) -> Self {
        Self {
            options,
            env,
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Path the packaging layout expects the built module at
    pub fn ext_fullpath(&self, ext: &CMakeExtension) -> Result<PathBuf, BuildError> {
        let root = if self.options.inplace {
            std::env::current_dir().map_err(BuildError::CurrentDir)?
        } else {
            self.options.build_lib.clone()
        };

        Ok(ext_path::ext_fullpath(
            ext.name(),
            &root,
            &self.options.ext_suffix,
        ))
    }

    /// Absolute directory CMake must write the library into
    pub fn output_dir(&self, ext: &CMakeExtension) -> Result<PathBuf, BuildError> {
        let fullpath = self.ext_fullpath(ext)?;
        let parent = fullpath.parent().unwrap_or_else(|| Path::new("."));
        ext_path::resolve(parent)
    }

    /// Debug or Release: the explicit option wins, then `DEBUG`
    pub fn configuration(&self) -> Result<Configuration, BuildError> {
        let debug = match self.options.debug {
            Some(debug) => debug,
            None => self.env.debug_flag()?,
        };
        Ok(Configuration::from_debug(debug))
    }

    /// Arguments for the configure step (source directory excluded)
    pub fn configure_args(
        &self,
        cfg: Configuration,
        output_dir: &Path,
    ) -> Result<Vec<String>, BuildError> {
        let mut args = vec![
            format!("-DPYTHON_EXECUTABLE={}", self.options.python.display()),
            format!("-DCMAKE_BUILD_TYPE={cfg}"),
            format!("-DCMAKE_LIBRARY_OUTPUT_DIRECTORY={}", output_dir.display()),
            format!(
                "-DCMAKE_LIBRARY_OUTPUT_DIRECTORY_{}={}",
                cfg.label().to_uppercase(),
                output_dir.display()
            ),
        ];
        args.extend(self.env.cmake_args()?);

        if let Some(arch) = platform::cmake_architecture(&self.options.plat_name) {
            args.push("-A".to_string());
            args.push(arch.to_string());
        }

        // Cross compilation for universal2 fat binaries
        if self.options.os_family.is_apple() {
            let archs = platform::parse_archflags(&self.env.archflags()?)?;
            if !archs.is_empty() {
                args.push(format!("-DCMAKE_OSX_ARCHITECTURES={}", archs.join(";")));
            }
        }

        Ok(args)
    }

    /// Arguments for the build step (after `--build .`)
    pub fn build_args(&self, cfg: Configuration) -> Vec<String> {
        let mut args = vec!["--config".to_string(), cfg.label().to_string()];

        if !self.env.build_parallel_level_set()
            && let Some(jobs) = self.options.jobs()
        {
            args.push(format!("-j{jobs}"));
        }

        args
    }

    /// Per-extension temporary build directory
    pub fn build_dir(&self, ext: &CMakeExtension) -> Result<PathBuf, BuildError> {
        let dir = self.options.build_temp.join(ext.name());
        std::path::absolute(&dir).map_err(BuildError::CurrentDir)
    }

    /// Resolve configuration and both command lines without touching disk
    pub fn plan(&self, ext: &CMakeExtension) -> Result<BuildPlan, BuildError> {
        let output_dir = self.output_dir(ext)?;
        let configuration = self.configuration()?;
        let build_dir = self.build_dir(ext)?;

        let mut configure_args = vec![ext.source_dir().display().to_string()];
        configure_args.extend(self.configure_args(configuration, &output_dir)?);

        let mut build_args = vec!["--build".to_string(), ".".to_string()];
        build_args.extend(self.build_args(configuration));

        Ok(BuildPlan {
            extension: ext.name().to_string(),
            configuration,
            configure: Invocation::new(&self.options.cmake, configure_args, build_dir.clone()),
            build: Invocation::new(&self.options.cmake, build_args, build_dir.clone()),
            output_dir,
            build_dir,
        })
    }
}

/// Create the build directory, refusing to reuse an existing one
fn create_build_dir(path: &Path) -> Result<(), BuildError> {
    if path.exists() {
        return Err(BuildError::BuildDirExists {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::create_dir(path).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            BuildError::BuildDirExists {
                path: path.to_path_buf(),
            }
        } else {
            BuildError::CreateDir {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

impl<R: CommandRunner> ExtensionBuild for CMakeExtensionBuilder<R> {
    fn build_extension(&self, ext: &CMakeExtension) -> Result<BuildReport, BuildError> {
        let start_time = Instant::now();
        let plan = self.plan(ext)?;

        crate::verbose!(
            "{}: {} build into {}",
            plan.extension,
            plan.configuration,
            plan.output_dir.display()
        );

        create_build_dir(&plan.build_dir)?;

        // Step 1: configure
        self.runner.run(&plan.configure)?;

        // Step 2: build
        self.runner.run(&plan.build)?;

        let artifact = find_artifact(&plan.output_dir, ext);
        if artifact.is_none() {
            verbose::verbose_log(&format!(
                "{}: no library found in {}",
                plan.extension,
                plan.output_dir.display()
            ));
        }

        Ok(BuildReport {
            name: plan.extension,
            configuration: plan.configuration,
            output_dir: plan.output_dir,
            artifact,
            duration: start_time.elapsed(),
        })
    }
}
