//! Final extension file locations
//!
//! The packaging layout expects `pkg.sub._ext` at
//! `<root>/pkg/sub/_ext<suffix>`, where `root` is the library output
//! directory (or the source tree when building in place).

use crate::error::BuildError;
use std::path::{Path, PathBuf};

/// Make `path` absolute, resolving symlinks when it already exists
pub fn resolve(path: &Path) -> Result<PathBuf, BuildError> {
    if let Ok(canonical) = path.canonicalize() {
        return Ok(canonical);
    }

    std::path::absolute(path).map_err(BuildError::CurrentDir)
}

/// Filename of an extension module: last dotted component plus suffix
#[must_use]
pub fn ext_filename(fullname: &str, suffix: &str) -> String {
    let module = fullname.rsplit('.').next().unwrap_or(fullname);
    format!("{module}{suffix}")
}

/// Full path of the extension file under `root`
#[must_use]
pub fn ext_fullpath(fullname: &str, root: &Path, suffix: &str) -> PathBuf {
    let mut parts: Vec<&str> = fullname.split('.').collect();
    parts.pop();

    let mut path = root.to_path_buf();
    path.extend(parts);
    path.push(ext_filename(fullname, suffix));
    path
}
