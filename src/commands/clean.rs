//! Clean command
//!
//! Remove temporary build directories so the next build starts fresh

use crate::ProjectArgs;
use anyhow::{Context, Result};
use cmake_ext_builder::verbose;
use std::fs;
use std::path::{Path, PathBuf};

/// Remove each extension's temporary build directory, or the whole root
pub(crate) fn run(project: &ProjectArgs, all: bool) -> Result<()> {
    let config = super::load_config(project)?;
    let build_temp = super::resolve_build_temp(project, &config);

    let targets: Vec<PathBuf> = if all {
        vec![build_temp]
    } else {
        super::resolve_extensions(project, &config)?
            .iter()
            .map(|ext| build_temp.join(ext.name()))
            .collect()
    };

    let mut removed = 0;
    for target in &targets {
        if remove_dir(target)? {
            println!("Removed {}", target.display());
            removed += 1;
        } else {
            verbose::verbose_log(&format!("{} does not exist, skipping", target.display()));
        }
    }

    if removed == 0 {
        println!("Nothing to clean");
    }

    Ok(())
}

/// Remove `path` recursively, returning whether it existed
fn remove_dir(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_dir_all(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    Ok(true)
}
