//! Shared test helpers and utilities

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Variables the builder reads; cleared so the host environment cannot leak in
const BUILD_VARS: &[&str] = &[
    "DEBUG",
    "CMAKE_ARGS",
    "ARCHFLAGS",
    "CMAKE_BUILD_PARALLEL_LEVEL",
    "SETUPTOOLS_EXT_SUFFIX",
    "PYTHON",
    "CMAKE",
];

/// Records its working directory and arguments, then exits.
///
/// `FAKE_CMAKE_FAIL_SOURCE` makes the configure step for that source
/// directory exit 1; `FAKE_CMAKE_BUILD_EXIT` sets the build step's status.
const FAKE_CMAKE: &str = r#"#!/bin/sh
{
  pwd -P
  for arg in "$@"; do
    printf '%s\n' "$arg"
  done
  echo "--end--"
} >> "$FAKE_CMAKE_LOG"

if [ "$1" = "--build" ]; then
  exit "${FAKE_CMAKE_BUILD_EXIT:-0}"
fi
if [ -n "$FAKE_CMAKE_FAIL_SOURCE" ] && [ "$1" = "$FAKE_CMAKE_FAIL_SOURCE" ]; then
  exit 1
fi
exit 0
"#;

/// Get the path to the cmake-ext-builder binary
pub(crate) fn get_builder_binary() -> &'static str {
    env!("CARGO_BIN_EXE_cmake-ext-builder")
}

/// One recorded `cmake` call
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub(crate) struct CmakeCall {
    pub(crate) cwd: PathBuf,
    pub(crate) args: Vec<String>,
}

impl CmakeCall {
    #[allow(dead_code)]
    pub(crate) fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

/// A scratch project directory with a fake `cmake` on hand
#[derive(Debug)]
pub(crate) struct FakeProject {
    temp: TempDir,
    cmake: PathBuf,
    log: PathBuf,
}

impl FakeProject {
    pub(crate) fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir(&bin).unwrap();

        let cmake = bin.join("cmake");
        fs::write(&cmake, FAKE_CMAKE).unwrap();
        fs::set_permissions(&cmake, fs::Permissions::from_mode(0o755)).unwrap();

        let log = temp.path().join("cmake.log");
        Self { temp, cmake, log }
    }

    /// Project root (canonical, so it compares equal to `pwd -P`)
    pub(crate) fn root(&self) -> PathBuf {
        self.temp.path().canonicalize().unwrap()
    }

    /// Create a source directory with an empty `CMakeLists.txt`
    #[allow(dead_code)]
    pub(crate) fn source_dir(&self, name: &str) -> PathBuf {
        let dir = self.root().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("CMakeLists.txt"), "").unwrap();
        dir
    }

    #[allow(dead_code)]
    pub(crate) fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.root().join("cmake-ext.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    /// Command running the builder in the project root with a clean build
    /// environment, the fake `cmake`, and fixed interpreter facts
    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(get_builder_binary());
        cmd.current_dir(self.root())
            .env("FAKE_CMAKE_LOG", &self.log)
            .env("XDG_CONFIG_HOME", self.root().join("xdg"))
            .env_remove("FAKE_CMAKE_FAIL_SOURCE")
            .env_remove("FAKE_CMAKE_BUILD_EXIT");
        for var in BUILD_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Run a subcommand with the fake `cmake`, a fixed suffix and interpreter
    #[allow(dead_code)]
    pub(crate) fn run(&self, subcommand: &str, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let mut cmd = self.command();
        cmd.arg(subcommand)
            .arg("--cmake")
            .arg(&self.cmake)
            .args(["--python", "/usr/bin/python3", "--ext-suffix", ".so"])
            .args(args)
            .envs(envs.iter().copied());
        cmd.output().expect("Failed to execute cmake-ext-builder")
    }

    /// Calls recorded by the fake `cmake`, in order
    #[allow(dead_code)]
    pub(crate) fn calls(&self) -> Vec<CmakeCall> {
        let Ok(log) = fs::read_to_string(&self.log) else {
            return Vec::new();
        };

        let mut calls = Vec::new();
        let mut lines = log.lines();
        while let Some(cwd) = lines.next() {
            let args = lines
                .by_ref()
                .take_while(|line| *line != "--end--")
                .map(ToString::to_string)
                .collect();
            calls.push(CmakeCall {
                cwd: PathBuf::from(cwd),
                args,
            });
        }
        calls
    }

    #[allow(dead_code)]
    pub(crate) fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    #[allow(dead_code)]
    pub(crate) fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }
}

/// Stdout and stderr as strings
#[allow(dead_code)]
pub(crate) fn output_text(output: &Output) -> (String, String) {
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}
