//! Platform detection and CMake platform mapping
//!
//! Platform names follow the distribution convention ("win-amd64",
//! "linux-x86_64", "macosx-arm64"). Only the Windows names map to a CMake
//! `-A` architecture, since only the Visual Studio generators accept it.

use crate::error::BuildError;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Distribution platform name to CMake `-A` architecture
pub const PLAT_NAME_TO_CMAKE_ARCH: &[(&str, &str)] = &[
    ("win32", "Win32"),
    ("win-amd64", "x64"),
    ("win-arm32", "ARM"),
    ("win-arm64", "ARM64"),
];

/// Look up the CMake `-A` value for a platform name
#[must_use]
pub fn cmake_architecture(plat_name: &str) -> Option<&'static str> {
    PLAT_NAME_TO_CMAKE_ARCH
        .iter()
        .find(|(name, _)| *name == plat_name)
        .map(|(_, arch)| *arch)
}

/// Operating system family of the build host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Apple,
    Linux,
    Other,
}

impl OsFamily {
    #[must_use]
    pub fn current() -> Self {
        match env::consts::OS {
            "windows" => Self::Windows,
            "macos" | "ios" => Self::Apple,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn is_apple(self) -> bool {
        matches!(self, Self::Apple)
    }
}

/// Platform name for the running host
///
/// Examples: "win-amd64", "macosx-arm64", "linux-x86_64"
#[must_use]
pub fn default_plat_name() -> String {
    plat_name_for(env::consts::OS, env::consts::ARCH)
}

fn plat_name_for(os: &str, arch: &str) -> String {
    match os {
        "windows" => match arch {
            "x86" => "win32".to_string(),
            "x86_64" => "win-amd64".to_string(),
            "arm" => "win-arm32".to_string(),
            "aarch64" => "win-arm64".to_string(),
            other => format!("win-{other}"),
        },
        "macos" => {
            let arch = if arch == "aarch64" { "arm64" } else { arch };
            format!("macosx-{arch}")
        }
        _ => format!("{os}-{arch}"),
    }
}

/// Collect architectures from `ARCHFLAGS` words
///
/// Accepts both `-arch=X` and `-arch X`, consuming words left to right.
/// Anything else is ignored.
pub fn parse_archflags(words: &[String]) -> Result<Vec<String>, BuildError> {
    let mut archs = Vec::new();
    let mut words = words.iter();

    while let Some(flag) = words.next() {
        if let Some(value) = flag.strip_prefix("-arch=") {
            // Only the text up to a second '=' belongs to the value
            let value = value.split('=').next().unwrap_or_default();
            archs.push(value.to_string());
        } else if flag == "-arch" {
            let value = words.next().ok_or(BuildError::MissingArchValue)?;
            archs.push(value.clone());
        }
    }

    Ok(archs)
}

/// Interpreter names tried when none is configured
const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Find a Python interpreter in `PATH` (`python3`, then `python`)
pub fn find_python() -> Option<PathBuf> {
    let path_var = env::var_os("PATH");
    PYTHON_CANDIDATES
        .iter()
        .find_map(|name| find_on_path(Path::new(name), path_var.as_deref()))
}

/// Resolve an interpreter to an absolute path for `PYTHON_EXECUTABLE`
///
/// Names with a directory part are made absolute as given. Bare names are
/// looked up in `PATH`, trying `<name>.exe` as well on Windows.
pub fn resolve_python(python: &Path) -> Result<PathBuf, BuildError> {
    if python.components().count() > 1 || python.is_absolute() {
        return std::path::absolute(python).map_err(BuildError::CurrentDir);
    }

    find_on_path(python, env::var_os("PATH").as_deref()).ok_or_else(|| {
        BuildError::InterpreterNotFound {
            name: python.display().to_string(),
        }
    })
}

/// First executable named `name` in the directories of `path_var`
fn find_on_path(name: &Path, path_var: Option<&OsStr>) -> Option<PathBuf> {
    env::split_paths(path_var?)
        .filter(|dir| !dir.as_os_str().is_empty())
        .find_map(|dir| {
            executable_names(name)
                .into_iter()
                .map(|candidate| dir.join(candidate))
                .find(|candidate| is_executable(candidate))
        })
        .and_then(|found| std::path::absolute(found).ok())
}

fn executable_names(name: &Path) -> Vec<OsString> {
    let mut names = vec![name.as_os_str().to_os_string()];
    if !env::consts::EXE_SUFFIX.is_empty() && name.extension().is_none() {
        let mut with_suffix = name.as_os_str().to_os_string();
        with_suffix.push(env::consts::EXE_SUFFIX);
        names.push(with_suffix);
    }
    names
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Query the interpreter for its extension module suffix
///
/// Returns `None` if the interpreter cannot be run or reports nothing.
pub fn detect_ext_suffix(python: &Path) -> Option<String> {
    let output = Command::new(python)
        .args([
            "-c",
            "import sysconfig; print(sysconfig.get_config_var('EXT_SUFFIX') or '')",
        ])
        .output()
        .ok()?;

    output.status.success().then_some(())?;

    let suffix = String::from_utf8(output.stdout).ok()?.trim().to_string();

    (!suffix.is_empty()).then_some(suffix)
}

/// Suffix used when the interpreter cannot tell us
#[must_use]
pub const fn fallback_ext_suffix(family: OsFamily) -> &'static str {
    match family {
        OsFamily::Windows => ".pyd",
        _ => ".so",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        shlex::split(s).unwrap()
    }

    #[test]
    fn windows_platforms_map_to_cmake_arch() {
        assert_eq!(cmake_architecture("win32"), Some("Win32"));
        assert_eq!(cmake_architecture("win-amd64"), Some("x64"));
        assert_eq!(cmake_architecture("win-arm32"), Some("ARM"));
        assert_eq!(cmake_architecture("win-arm64"), Some("ARM64"));
    }

    #[test]
    fn other_platforms_have_no_cmake_arch() {
        assert_eq!(cmake_architecture("linux-x86_64"), None);
        assert_eq!(cmake_architecture("macosx-11.0-universal2"), None);
        assert_eq!(cmake_architecture("WIN32"), None);
    }

    #[test]
    fn plat_names_for_windows() {
        assert_eq!(plat_name_for("windows", "x86"), "win32");
        assert_eq!(plat_name_for("windows", "x86_64"), "win-amd64");
        assert_eq!(plat_name_for("windows", "aarch64"), "win-arm64");
    }

    #[test]
    fn plat_names_for_unix() {
        assert_eq!(plat_name_for("linux", "x86_64"), "linux-x86_64");
        assert_eq!(plat_name_for("macos", "aarch64"), "macosx-arm64");
    }

    #[test]
    fn archflags_both_forms() {
        let archs = parse_archflags(&words("-arch x86_64 -arch=arm64")).unwrap();
        assert_eq!(archs, vec!["x86_64", "arm64"]);
    }

    #[test]
    fn archflags_ignores_unrelated_words() {
        let archs = parse_archflags(&words("-O2 -arch arm64 -g")).unwrap();
        assert_eq!(archs, vec!["arm64"]);
    }

    #[test]
    fn archflags_empty() {
        assert!(parse_archflags(&[]).unwrap().is_empty());
    }

    #[test]
    fn archflags_trailing_arch_is_an_error() {
        let err = parse_archflags(&words("-arch x86_64 -arch")).unwrap_err();
        assert!(matches!(err, BuildError::MissingArchValue));
    }

    #[test]
    fn archflags_value_stops_at_second_equals() {
        let archs = parse_archflags(&words("-arch=arm64=extra")).unwrap();
        assert_eq!(archs, vec!["arm64"]);
    }

    #[test]
    fn fallback_suffix_per_family() {
        assert_eq!(fallback_ext_suffix(OsFamily::Windows), ".pyd");
        assert_eq!(fallback_ext_suffix(OsFamily::Linux), ".so");
        assert_eq!(fallback_ext_suffix(OsFamily::Apple), ".so");
    }

    #[test]
    fn missing_interpreter_yields_no_suffix() {
        assert_eq!(
            detect_ext_suffix(Path::new("definitely_not_a_real_python_12345")),
            None
        );
    }

    #[cfg(unix)]
    fn fake_interpreter(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn path_search_finds_first_executable() {
        let first = tempfile::TempDir::new().unwrap();
        let second = tempfile::TempDir::new().unwrap();
        // Not executable, so skipped
        fake_interpreter(first.path(), "python3", 0o644);
        let expected = fake_interpreter(second.path(), "python3", 0o755);

        let path_var = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(
            find_on_path(Path::new("python3"), Some(path_var.as_os_str())),
            Some(expected)
        );
    }

    #[test]
    fn path_search_without_match_is_none() {
        let empty = tempfile::TempDir::new().unwrap();
        let path_var = env::join_paths([empty.path()]).unwrap();
        assert_eq!(
            find_on_path(Path::new("python3"), Some(path_var.as_os_str())),
            None
        );
        assert_eq!(find_on_path(Path::new("python3"), None), None);
    }

    #[cfg(windows)]
    #[test]
    fn windows_names_get_exe_suffix() {
        let names = executable_names(Path::new("python"));
        assert_eq!(
            names,
            vec![OsString::from("python"), OsString::from("python.exe")]
        );
    }

    #[test]
    fn interpreter_paths_are_made_absolute() {
        let resolved = resolve_python(Path::new("venv/bin/python")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("venv/bin/python"));
    }

    #[test]
    fn unknown_interpreter_name_is_an_error() {
        let err = resolve_python(Path::new("definitely_not_a_real_python_12345")).unwrap_err();
        assert!(matches!(err, BuildError::InterpreterNotFound { .. }));
    }

    #[test]
    fn current_family_is_consistent() {
        let apple = cfg!(any(target_os = "macos", target_os = "ios"));
        assert_eq!(OsFamily::current().is_apple(), apple);
    }
}
