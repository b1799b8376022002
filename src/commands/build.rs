//! Build command
//!
//! Configure and build every extension with `CMake`

use crate::BuildArgs;
use anyhow::Result;
use cmake_ext_builder::extensions::summarize;
use cmake_ext_builder::{BuildEnv, BuildError, CMakeExtensionBuilder, build_extensions};

/// Build the selected extensions in order, stopping at the first failure
pub(crate) fn run(args: &BuildArgs) -> Result<()> {
    let config = super::load_config(&args.project)?;
    let env = BuildEnv::capture();
    let options = super::resolve_options(args, &config, &env)?;
    let extensions = super::resolve_extensions(&args.project, &config)?;

    let builder = CMakeExtensionBuilder::new(options, env);

    let reports = build_extensions(&builder, &extensions).map_err(|err| {
        let hint = failure_hint(&err);
        anyhow::Error::new(err).context(hint)
    })?;

    for report in &reports {
        let location = report.artifact.as_deref().unwrap_or(&report.output_dir);
        println!(
            "Built {} ({}) -> {}",
            report.name,
            report.configuration,
            location.display()
        );
    }

    let (count, duration) = summarize(&reports);
    let noun = if count == 1 { "extension" } else { "extensions" };
    println!("\n{count} {noun} built in {:.2}s", duration.as_secs_f64());

    Ok(())
}

fn failure_hint(err: &BuildError) -> String {
    if err.is_preflight() {
        "Build aborted before running CMake".to_string()
    } else {
        "CMake failed; the build directory was kept for inspection \
         (run `cmake-ext-builder clean` before retrying)"
            .to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests can panic")]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn hint_for_existing_directory_mentions_abort() {
        let err = BuildError::BuildDirExists {
            path: PathBuf::from("build/temp/_ext"),
        };
        assert!(failure_hint(&err).contains("before running CMake"));
    }

    #[test]
    fn hint_for_process_failure_mentions_clean() {
        let err = BuildError::ProcessFailed {
            program: "cmake".to_string(),
            args: vec![],
            code: Some(1),
        };
        assert!(failure_hint(&err).contains("clean"));
    }

    #[test]
    fn context_keeps_build_error_as_source() {
        let err = BuildError::MissingArchValue;
        let hint = failure_hint(&err);
        let wrapped = anyhow::Error::new(err).context(hint);
        assert!(wrapped.downcast_ref::<BuildError>().is_some());
    }
}
