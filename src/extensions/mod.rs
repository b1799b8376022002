//! Native extension building
//!
//! Extensions are native modules described by a dotted name and a `CMake`
//! source directory. Building one runs the `CMake` configure and build steps
//! in a fresh temporary directory and places the shared library where the
//! package layout expects the module.

pub mod builder;
pub mod cmake_extension;
pub mod types;

pub use builder::{ExtensionBuild, build_extensions, find_artifact, summarize};
pub use cmake_extension::{BuildPlan, CMakeExtensionBuilder, Configuration};
pub use types::{BuildReport, CMakeExtension};
