//! Extension Builder Orchestration
//!
//! The build step is a trait so the command driver does not care how an
//! extension gets built. Extensions are built one at a time, in order, and
//! the first failure aborts the rest.

use super::types::{BuildReport, CMakeExtension};
use crate::error::BuildError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

/// Shared-library filename extensions CMake may produce for a module
const LIBRARY_EXTENSIONS: &[&str] = &["so", "pyd", "dylib", "dll"];

/// Builds a single extension module
pub trait ExtensionBuild {
    fn build_extension(&self, ext: &CMakeExtension) -> Result<BuildReport, BuildError>;
}

/// Build every extension in order, stopping at the first failure
///
/// # Example
///
/// ```no_run
/// use cmake_ext_builder::extensions::{CMakeExtension, CMakeExtensionBuilder, build_extensions};
/// use cmake_ext_builder::{BuildEnv, BuildOptions};
///
/// let builder = CMakeExtensionBuilder::new(BuildOptions::default(), BuildEnv::capture());
/// let exts = vec![CMakeExtension::new("_macposts_ext", ".").unwrap()];
///
/// for report in build_extensions(&builder, &exts).unwrap() {
///     println!("Built {} in {:?}", report.name, report.duration);
/// }
/// ```
pub fn build_extensions<B: ExtensionBuild + ?Sized>(
    builder: &B,
    extensions: &[CMakeExtension],
) -> Result<Vec<BuildReport>, BuildError> {
    let mut reports = Vec::with_capacity(extensions.len());

    for ext in extensions {
        crate::verbose!("building extension '{}'", ext.name());
        reports.push(builder.build_extension(ext)?);
    }

    Ok(reports)
}

/// Count and total duration of a set of builds
#[must_use]
pub fn summarize(reports: &[BuildReport]) -> (usize, Duration) {
    (reports.len(), reports.iter().map(|r| r.duration).sum())
}

/// Locate the library CMake produced for `ext` directly inside `output_dir`
///
/// Matches `<module><anything>.<lib-ext>`, so ABI-tagged names such as
/// `_ext.cpython-312-x86_64-linux-gnu.so` are found too.
pub fn find_artifact(output_dir: &Path, ext: &CMakeExtension) -> Option<PathBuf> {
    let module = ext.module_name();

    let mut matches: Vec<PathBuf> = WalkDir::new(output_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| is_library_for(path, module))
        .collect();

    matches.sort();
    matches.into_iter().next()
}

fn is_library_for(path: &Path, module: &str) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let Some(rest) = file_name.strip_prefix(module) else {
        return false;
    };
    // "_ext.so" or "_ext.cpython-312.so", but not "_ext_helper.so"
    if !rest.starts_with('.') {
        return false;
    }

    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| LIBRARY_EXTENSIONS.contains(&e))
}
