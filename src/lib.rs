//! cmake-ext-builder internal library code
//!
//! Builds native Python extension modules by driving `CMake`'s configure
//! and build steps, placing each shared library where the package layout
//! expects the module.

pub mod config;
pub mod env_vars;
pub mod error;
pub mod ext_path;
pub mod extensions;
pub mod options;
pub mod platform;
pub mod process;
pub mod verbose;

// Re-export common types for convenience
pub use config::{Config, ExtensionEntry};
pub use env_vars::BuildEnv;
pub use error::BuildError;
pub use extensions::{
    BuildPlan, BuildReport, CMakeExtension, CMakeExtensionBuilder, Configuration, ExtensionBuild,
    build_extensions,
};
pub use options::BuildOptions;
pub use platform::{OsFamily, cmake_architecture, default_plat_name};
pub use process::{CommandRunner, Invocation, SystemRunner};
pub use verbose::{init_verbose, is_verbose};
