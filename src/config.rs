//! Configuration file management
//!
//! Reads the TOML file listing the extensions to build and default build
//! options, from the project directory or the user's config directory.

use crate::extensions::CMakeExtension;
use crate::options::BuildOptions;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Project configuration file name, looked up in the current directory
pub const PROJECT_CONFIG: &str = "cmake-ext.toml";

/// Build configuration loaded from TOML files
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root for per-extension temporary build directories
    #[serde(default)]
    pub build_temp: Option<PathBuf>,

    /// Root for built extension modules
    #[serde(default)]
    pub build_lib: Option<PathBuf>,

    /// Default parallel job count
    #[serde(default)]
    pub parallel: Option<usize>,

    /// Default debug flag (unset defers to `DEBUG`)
    #[serde(default)]
    pub debug: Option<bool>,

    /// Platform name override
    #[serde(default)]
    pub plat_name: Option<String>,

    /// Extension filename suffix override
    #[serde(default)]
    pub ext_suffix: Option<String>,

    /// Interpreter path
    #[serde(default)]
    pub python: Option<PathBuf>,

    /// `cmake` program
    #[serde(default)]
    pub cmake: Option<String>,

    /// Extensions to build, in order
    #[serde(default)]
    pub extensions: Vec<ExtensionEntry>,

    /// Directory relative paths in this file are resolved against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// One `[[extensions]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionEntry {
    /// Dotted module name
    pub name: String,
    /// `CMake` source directory (defaults to the config file's directory)
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration with custom options.
    /// Priority: `custom_path` -> ./cmake-ext.toml -> user config dir
    ///
    /// # Arguments
    /// * `custom_path` - Optional path to a config file (overrides discovery)
    /// * `skip_rc` - If true, skip loading config files (return default config)
    pub fn load_with_options(custom_path: Option<&Path>, skip_rc: bool) -> Result<Self> {
        if skip_rc {
            return Ok(Self::default());
        }

        if let Some(path) = custom_path {
            return Self::load_from(path);
        }

        let project = Path::new(PROJECT_CONFIG);
        if project.is_file() {
            return Self::load_from(project);
        }

        if let Some(config_dir) = Self::user_config_dir() {
            let config_path = config_dir.join("config.toml");
            if config_path.is_file() {
                return Self::load_from(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load a single config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.base_dir = path.parent().map(|p| {
            if p.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                p.to_path_buf()
            }
        });

        Ok(config)
    }

    /// Parse TOML content; relative paths resolve against the current directory
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn user_config_dir() -> Option<PathBuf> {
        // Check XDG_CONFIG_HOME first
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join("cmake-ext"));
        }

        // Fall back to ~/.config/cmake-ext
        dirs::home_dir().map(|home| home.join(".config").join("cmake-ext"))
    }

    fn relative_to_base(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Extension descriptors for every `[[extensions]]` entry
    pub fn extensions(&self) -> Result<Vec<CMakeExtension>> {
        self.extensions
            .iter()
            .map(|entry| {
                let dir = entry.source_dir.as_deref().unwrap_or_else(|| Path::new(""));
                CMakeExtension::new(&entry.name, self.relative_to_base(dir))
                    .with_context(|| format!("Invalid extension entry '{}'", entry.name))
            })
            .collect()
    }

    /// Overlay the settings present in this file onto `options`
    pub fn apply_to(&self, options: &mut BuildOptions) {
        if let Some(dir) = &self.build_temp {
            options.build_temp = self.relative_to_base(dir);
        }
        if let Some(dir) = &self.build_lib {
            options.build_lib = self.relative_to_base(dir);
        }
        if self.parallel.is_some() {
            options.parallel = self.parallel;
        }
        if self.debug.is_some() {
            options.debug = self.debug;
        }
        if let Some(plat_name) = &self.plat_name {
            options.plat_name.clone_from(plat_name);
        }
        if let Some(suffix) = &self.ext_suffix {
            options.ext_suffix.clone_from(suffix);
        }
        if let Some(python) = &self.python {
            options.python.clone_from(python);
        }
        if let Some(cmake) = &self.cmake {
            options.cmake.clone_from(cmake);
        }
    }
}
