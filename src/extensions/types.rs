//! Extension type definitions
//!
//! A CMake extension has no sources of its own from the packaging point of
//! view; it is just a module name plus the directory holding `CMakeLists.txt`.

use super::cmake_extension::Configuration;
use crate::error::BuildError;
use crate::ext_path;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A native extension module built by CMake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeExtension {
    /// Dotted module name (e.g., "macposts._macposts_ext")
    name: String,
    /// Absolute path to the CMake source directory
    source_dir: PathBuf,
}

impl CMakeExtension {
    /// Create a descriptor, resolving `source_dir` to an absolute path.
    ///
    /// An empty `source_dir` means the current directory. Symlinks are
    /// resolved when the directory exists.
    pub fn new(name: &str, source_dir: impl AsRef<Path>) -> Result<Self, BuildError> {
        validate_name(name)?;

        let source_dir = source_dir.as_ref();
        let source_dir = if source_dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            source_dir
        };

        Ok(Self {
            name: name.to_string(),
            source_dir: ext_path::resolve(source_dir)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Last component of the dotted name (the module file stem)
    pub fn module_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

fn validate_name(name: &str) -> Result<(), BuildError> {
    let invalid = |reason: &str| BuildError::InvalidExtension {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.split('.').any(str::is_empty) {
        return Err(invalid("name has an empty dotted component"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name must not contain path separators"));
    }

    Ok(())
}

/// Result of building one extension
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Dotted extension name
    pub name: String,

    /// Debug or Release
    pub configuration: Configuration,

    /// Directory CMake was told to place the library in
    pub output_dir: PathBuf,

    /// Built library found in `output_dir`, if any
    pub artifact: Option<PathBuf>,

    /// Configure plus build time
    pub duration: Duration,
}
