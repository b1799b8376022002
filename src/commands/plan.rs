//! Plan command
//!
//! Show what a build would run without creating directories or spawning
//! `cmake`

use crate::BuildArgs;
use anyhow::{Context, Result};
use cmake_ext_builder::{BuildEnv, BuildPlan, CMakeExtensionBuilder};

/// Print the configure and build commands for each extension
pub(crate) fn run(args: &BuildArgs, json: bool) -> Result<()> {
    let config = super::load_config(&args.project)?;
    let env = BuildEnv::capture();
    let options = super::resolve_options(args, &config, &env)?;
    let extensions = super::resolve_extensions(&args.project, &config)?;

    let builder = CMakeExtensionBuilder::new(options, env);

    let plans = extensions
        .iter()
        .map(|ext| {
            builder
                .plan(ext)
                .with_context(|| format!("Failed to plan extension '{}'", ext.name()))
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else {
        for plan in &plans {
            print!("{}", render(plan));
        }
    }

    Ok(())
}

fn render(plan: &BuildPlan) -> String {
    let mut out = format!("{} ({})\n", plan.extension, plan.configuration);
    out.push_str(&format!("  output:    {}\n", plan.output_dir.display()));
    out.push_str(&format!("  build dir: {}\n", plan.build_dir.display()));
    if plan.build_dir.exists() {
        out.push_str("  warning:   build dir exists; `build` will refuse to reuse it\n");
    }
    out.push_str(&format!("  configure: {}\n", plan.configure.command_line()));
    out.push_str(&format!("  build:     {}\n", plan.build.command_line()));
    out
}
