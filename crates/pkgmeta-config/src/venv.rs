//! Interpreter lookup inside a virtual environment
//!
//! Unix environments keep their executables under `bin/`, Windows ones under
//! `Scripts/`.

use crate::errors::VenvPathError;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(windows)]
pub const PYTHON_BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const PYTHON_BIN_DIR: &str = "bin";

#[cfg(not(windows))]
const PYTHON_EXE_CANDIDATES: &[&str] = &["python3", "python"];
#[cfg(windows)]
const PYTHON_EXE_CANDIDATES: &[&str] = &["python.exe", "python3.exe"];

/// Path of the interpreter inside `venv_path`
pub fn resolve_python_exe(venv_path: &Path) -> Result<PathBuf, VenvPathError> {
    if !venv_path.is_dir() {
        return Err(VenvPathError::VenvNotFound(venv_path.to_path_buf()));
    }

    let bin_dir = venv_path.join(PYTHON_BIN_DIR);
    if let Some(exe) = PYTHON_EXE_CANDIDATES
        .iter()
        .map(|name| bin_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        return Ok(exe);
    }

    // Versioned names such as python3.12
    fs::read_dir(&bin_dir)
        .ok()
        .and_then(|entries| {
            entries.filter_map(Result::ok).map(|e| e.path()).find(|p| {
                p.is_file()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|name| name.starts_with("python"))
            })
        })
        .ok_or(VenvPathError::PythonNotFound(bin_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn venv_with(executables: &[&str]) -> Option<TempDir> {
        let dir = TempDir::new().ok()?;
        let bin = dir.path().join(PYTHON_BIN_DIR);
        fs::create_dir_all(&bin).ok()?;
        for exe in executables {
            fs::write(bin.join(exe), "").ok()?;
        }
        Some(dir)
    }

    #[test]
    #[cfg(not(windows))]
    fn test_prefers_python3() {
        let Some(venv) = venv_with(&["python", "python3"]) else {
            return;
        };
        let result = resolve_python_exe(venv.path());
        assert!(result.is_ok_and(|p| p.ends_with("bin/python3")));
    }

    #[test]
    #[cfg(not(windows))]
    fn test_versioned_interpreter() {
        let Some(venv) = venv_with(&["python3.12", "pip"]) else {
            return;
        };
        let result = resolve_python_exe(venv.path());
        assert!(result.is_ok_and(|p| p.ends_with("bin/python3.12")));
    }

    #[test]
    fn test_empty_bin_dir() {
        let Some(venv) = venv_with(&[]) else {
            return;
        };
        assert!(matches!(
            resolve_python_exe(venv.path()),
            Err(VenvPathError::PythonNotFound(_))
        ));
    }

    #[test]
    fn test_venv_not_found() {
        let result = resolve_python_exe(Path::new("/tmp/pkgmeta_missing_venv_12345"));
        assert!(matches!(result, Err(VenvPathError::VenvNotFound(_))));
    }
}
