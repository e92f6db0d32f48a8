//! Provisioning a build environment and invoking the backend's metadata hook

use crate::errors::BuildError;
use pkgmeta_config::venv::resolve_python_exe;
use pkgmeta_config::Config;
use pkgmeta_logger as logger;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Imports the backend named in argv[1] (`module` or `module:object`) and calls
/// its `prepare_metadata_for_build_wheel` hook with argv[2] as target directory.
const PREPARE_METADATA_SCRIPT: &str = "\
import importlib, sys
module, _, attrs = sys.argv[1].partition(':')
backend = importlib.import_module(module)
for attr in filter(None, attrs.split('.')):
    backend = getattr(backend, attr)
backend.prepare_metadata_for_build_wheel(sys.argv[2])
";

/// Collaborator that owns every child process of the build fallback
pub trait BuildBackendRunner {
    /// Create an isolated environment in `env_dir` with `requires` installed and
    /// return its interpreter
    fn provision(&self, env_dir: &Path, requires: &[String]) -> Result<PathBuf, BuildError>;

    /// Run `backend`'s metadata hook for the project in `project_dir`, writing
    /// the `*.dist-info` directory into `metadata_dir`
    fn prepare_metadata(
        &self,
        python: &Path,
        backend: &str,
        project_dir: &Path,
        metadata_dir: &Path,
    ) -> Result<(), BuildError>;
}

/// Runner backed by `uv`
#[derive(Debug, Clone)]
pub struct UvRunner {
    uv: PathBuf,
    python_version: Option<String>,
}

impl UvRunner {
    pub fn new(uv: PathBuf, python_version: Option<String>) -> Self {
        UvRunner { uv, python_version }
    }

    /// Locate `uv` from the configuration, falling back to `PATH`
    pub fn from_config(config: &Config) -> Result<Self, BuildError> {
        Ok(Self::new(config.uv_path()?, config.python_version.clone()))
    }
}

impl BuildBackendRunner for UvRunner {
    fn provision(&self, env_dir: &Path, requires: &[String]) -> Result<PathBuf, BuildError> {
        let mut venv = Command::new(&self.uv);
        venv.arg("venv").arg(env_dir);
        if let Some(ref version) = self.python_version {
            venv.arg("--python").arg(version);
        }
        run(&mut venv)?;

        let python = resolve_python_exe(env_dir)?;
        if !requires.is_empty() {
            let mut install = Command::new(&self.uv);
            install
                .args(["pip", "install", "--python"])
                .arg(&python)
                .args(requires);
            run(&mut install)?;
        }
        Ok(python)
    }

    fn prepare_metadata(
        &self,
        python: &Path,
        backend: &str,
        project_dir: &Path,
        metadata_dir: &Path,
    ) -> Result<(), BuildError> {
        let mut hook = Command::new(python);
        hook.args(["-c", PREPARE_METADATA_SCRIPT, backend])
            .arg(metadata_dir)
            .current_dir(project_dir);
        run(&mut hook).map(|_| ())
    }
}

/// Human-readable command line, with the inline script elided
fn describe(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy().to_string();
    let args = cmd.get_args().map(|arg| {
        if arg == OsStr::new(PREPARE_METADATA_SCRIPT) {
            "<prepare-metadata>".to_string()
        } else {
            arg.to_string_lossy().to_string()
        }
    });
    std::iter::once(program)
        .chain(args)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `cmd` to completion, logging its output; a non-zero exit is an error
pub(crate) fn run(cmd: &mut Command) -> Result<Output, BuildError> {
    let description = describe(cmd);
    logger::debug(&format!("Running: {}", description));

    let output = cmd.output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            BuildError::ToolNotFound(cmd.get_program().to_string_lossy().to_string())
        } else {
            BuildError::io(format!("running {}", description), e)
        }
    })?;
    logger::capture_output(&description, &output);

    if !output.status.success() {
        return Err(BuildError::CommandFailed {
            command: description,
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(output)
}
