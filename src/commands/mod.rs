//! Subcommand implementations
//!
//! Option resolution shared by the commands lives here. Settings are
//! layered: built-in defaults, then the config file, then command-line
//! flags.

pub(crate) mod build;
pub(crate) mod clean;
pub(crate) mod completion;
pub(crate) mod plan;

use crate::{BuildArgs, ProjectArgs};
use anyhow::{Context, Result, anyhow, bail};
use cmake_ext_builder::{BuildEnv, BuildOptions, CMakeExtension, Config, platform, verbose};
use std::path::PathBuf;

/// Load the config file selected by `--config`/`--norc`
pub(crate) fn load_config(project: &ProjectArgs) -> Result<Config> {
    Config::load_with_options(project.config.as_deref(), project.norc)
}

/// Extensions named on the command line, or else those in the config file
pub(crate) fn resolve_extensions(
    project: &ProjectArgs,
    config: &Config,
) -> Result<Vec<CMakeExtension>> {
    let extensions = if project.extensions.is_empty() {
        config.extensions()?
    } else {
        project
            .extensions
            .iter()
            .map(String::as_str)
            .map(parse_extension_arg)
            .collect::<Result<Vec<_>>>()?
    };

    if extensions.is_empty() {
        bail!(
            "No extensions selected. Pass --extension NAME[=SOURCE_DIR] or list them in {}",
            cmake_ext_builder::config::PROJECT_CONFIG
        );
    }

    Ok(extensions)
}

/// Parse `NAME` or `NAME=SOURCE_DIR`
fn parse_extension_arg(spec: &str) -> Result<CMakeExtension> {
    let (name, source_dir) = spec.split_once('=').unwrap_or((spec, ""));
    CMakeExtension::new(name, source_dir).with_context(|| format!("Invalid --extension '{spec}'"))
}

/// Build root for temporary directories: flag, then config, then default
pub(crate) fn resolve_build_temp(project: &ProjectArgs, config: &Config) -> PathBuf {
    let mut options = BuildOptions::default();
    config.apply_to(&mut options);
    project.build_temp.clone().unwrap_or(options.build_temp)
}

/// Full option set for a build or plan
pub(crate) fn resolve_options(
    args: &BuildArgs,
    config: &Config,
    env: &BuildEnv,
) -> Result<BuildOptions> {
    let mut options = BuildOptions::default();
    config.apply_to(&mut options);

    // -g only ever turns debug on; without it the config or DEBUG decides
    if args.debug {
        options.debug = Some(true);
    }
    if args.parallel.is_some() {
        options.parallel = args.parallel;
    }
    if let Some(plat_name) = &args.plat_name {
        options.plat_name.clone_from(plat_name);
    }
    if let Some(dir) = &args.project.build_temp {
        options.build_temp.clone_from(dir);
    }
    if let Some(dir) = &args.build_lib {
        options.build_lib.clone_from(dir);
    }
    if args.inplace {
        options.inplace = true;
    }
    if let Some(cmake) = &args.cmake {
        options.cmake.clone_from(cmake);
    }

    // CMake gets an absolute interpreter path, never a bare name
    options.python = match (&args.python, &config.python) {
        (Some(python), _) | (None, Some(python)) => platform::resolve_python(python)?,
        (None, None) => platform::find_python()
            .ok_or_else(|| anyhow!("No Python interpreter found in PATH; pass --python"))?,
    };

    options.ext_suffix = resolve_ext_suffix(args, config, env, &options);

    verbose::verbose_log(&format!(
        "platform {} ({:?}), python {}, suffix {}",
        options.plat_name,
        options.os_family,
        options.python.display(),
        options.ext_suffix
    ));

    Ok(options)
}

/// Flag, then `SETUPTOOLS_EXT_SUFFIX`, then config, then the interpreter
fn resolve_ext_suffix(
    args: &BuildArgs,
    config: &Config,
    env: &BuildEnv,
    options: &BuildOptions,
) -> String {
    if let Some(suffix) = &args.ext_suffix {
        return suffix.clone();
    }
    if let Some(suffix) = env.ext_suffix() {
        return suffix.to_string();
    }
    if let Some(suffix) = &config.ext_suffix {
        return suffix.clone();
    }

    platform::detect_ext_suffix(&options.python).unwrap_or_else(|| {
        verbose::verbose_log("interpreter did not report a suffix, using the platform default");
        platform::fallback_ext_suffix(options.os_family).to_string()
    })
}
