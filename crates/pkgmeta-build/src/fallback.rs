//! Execution-based metadata read through the project's build backend

use crate::errors::BuildError;
use crate::metadata::{find_dist_info, read_dist_info};
use crate::runner::BuildBackendRunner;
use pkgmeta_ast::parser::ScriptParser;
use pkgmeta_ast::{DirectoryMetadata, SetupReader};
use pkgmeta_config::Config;
use pkgmeta_logger as logger;
use pkgmeta_record::PackageMetadata;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

/// Reads metadata by running the build backend's `prepare_metadata_for_build_wheel`
/// hook in a disposable environment
#[derive(Debug, Clone)]
pub struct BuildMetadataReader<R> {
    runner: R,
    backend: String,
    requires: Vec<String>,
}

impl<R: BuildBackendRunner> BuildMetadataReader<R> {
    pub fn new(runner: R, backend: impl Into<String>, requires: Vec<String>) -> Self {
        BuildMetadataReader {
            runner,
            backend: backend.into(),
            requires,
        }
    }

    /// Backend and build requirements taken from `config`
    pub fn from_config(runner: R, config: &Config) -> Self {
        Self::new(runner, config.build_backend(), config.build_requires())
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Provision the environment, run the metadata hook and parse its output.
    ///
    /// Every temporary path lives under one [`TempDir`] removed on return,
    /// whether the read succeeded or not.
    pub fn read(&self, project_dir: &Path) -> Result<PackageMetadata, BuildError> {
        let scratch = TempDir::with_prefix("pkgmeta-build-")
            .map_err(|e| BuildError::io("creating the build directory", e))?;
        let env_dir = scratch.path().join("env");
        let metadata_dir = scratch.path().join("metadata");
        fs::create_dir_all(&metadata_dir)
            .map_err(|e| BuildError::io(format!("creating {}", metadata_dir.display()), e))?;

        logger::spinner_start(&format!(
            "Preparing metadata for {} with {}",
            project_dir.display(),
            self.backend
        ));
        match self.build(project_dir, &env_dir, &metadata_dir) {
            Ok(metadata) => {
                logger::spinner_success(&format!(
                    "Prepared metadata for {}",
                    metadata.name.as_deref().unwrap_or("<unnamed>")
                ));
                Ok(metadata)
            }
            Err(err) => {
                logger::spinner_error("Metadata preparation failed");
                Err(err)
            }
        }
    }

    fn build(
        &self,
        project_dir: &Path,
        env_dir: &Path,
        metadata_dir: &Path,
    ) -> Result<PackageMetadata, BuildError> {
        let python = self.runner.provision(env_dir, &self.requires)?;
        logger::step(&format!("Build environment ready: {}", python.display()));

        self.runner
            .prepare_metadata(&python, &self.backend, project_dir, metadata_dir)?;

        let dist_info = find_dist_info(metadata_dir)?;
        logger::step(&format!("Reading {}", dist_info.display()));
        read_dist_info(&dist_info)
    }

    /// Static read first; the build backend only runs when the static result
    /// carries no dependency information.
    ///
    /// Static read failures are kept in the outcome. When the fallback runs its
    /// record replaces the static one, and a fallback failure is returned as is.
    pub fn read_with_fallback<P: ScriptParser>(
        &self,
        reader: &SetupReader<P>,
        project_dir: &Path,
    ) -> Result<DirectoryMetadata, BuildError> {
        let mut outcome = reader.read_from_directory(project_dir);
        if !outcome.metadata.is_empty_result() {
            return Ok(outcome);
        }

        info!(
            "Static read of {} found no dependency information, running {}",
            project_dir.display(),
            self.backend
        );
        outcome.metadata = self.read(project_dir)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    const METADATA: &str = "Metadata-Version: 2.1
Name: built
Version: 3.0
Requires-Dist: click
Requires-Dist: pytest ; extra == 'test'
";

    /// Pretends to provision an environment and writes a canned dist-info
    #[derive(Default)]
    struct FakeRunner {
        fail_hook: bool,
        write_dist_info: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeRunner {
        fn working() -> Self {
            FakeRunner {
                write_dist_info: true,
                ..FakeRunner::default()
            }
        }
    }

    impl BuildBackendRunner for FakeRunner {
        fn provision(&self, env_dir: &Path, requires: &[String]) -> Result<PathBuf, BuildError> {
            self.calls
                .borrow_mut()
                .push(format!("provision {}", requires.join(",")));
            Ok(env_dir.join("bin").join("python"))
        }

        fn prepare_metadata(
            &self,
            _python: &Path,
            backend: &str,
            project_dir: &Path,
            metadata_dir: &Path,
        ) -> Result<(), BuildError> {
            self.calls.borrow_mut().push(format!(
                "prepare {} {}",
                backend,
                project_dir.display()
            ));
            if self.fail_hook {
                return Err(BuildError::CommandFailed {
                    command: "python -c <prepare-metadata>".to_string(),
                    status: Some(1),
                    stdout: String::new(),
                    stderr: "ModuleNotFoundError".to_string(),
                });
            }
            if self.write_dist_info {
                let info = metadata_dir.join("built-3.0.dist-info");
                fs::create_dir_all(&info).map_err(|e| BuildError::io("test", e))?;
                fs::write(info.join("METADATA"), METADATA).map_err(|e| BuildError::io("test", e))?;
            }
            Ok(())
        }
    }

    fn reader(runner: FakeRunner) -> BuildMetadataReader<FakeRunner> {
        BuildMetadataReader::from_config(runner, &Config::default())
    }

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap_or_else(|e| panic!("write: {e}"));
        }
        dir
    }

    #[test]
    fn test_read_parses_dist_info() {
        let dir = project(&[]);
        let build = reader(FakeRunner::working());
        let metadata = build.read(dir.path()).unwrap_or_default();

        assert_eq!(metadata.name.as_deref(), Some("built"));
        assert_eq!(metadata.install_requires, vec!["click"]);
        assert_eq!(metadata.extras_require["test"], vec!["pytest"]);

        let calls = build.runner.calls.borrow();
        assert_eq!(calls[0], "provision setuptools,wheel");
        assert_eq!(
            calls[1],
            format!("prepare setuptools.build_meta {}", dir.path().display())
        );
    }

    #[test]
    fn test_hook_failure_is_surfaced() {
        let dir = project(&[]);
        let build = reader(FakeRunner {
            fail_hook: true,
            ..FakeRunner::default()
        });
        assert!(matches!(
            build.read(dir.path()),
            Err(BuildError::CommandFailed { .. })
        ));
    }

    #[test]
    fn test_missing_dist_info() {
        let dir = project(&[]);
        let build = reader(FakeRunner::default());
        assert!(matches!(
            build.read(dir.path()),
            Err(BuildError::MissingDistInfo(_))
        ));
    }

    #[test]
    fn test_fallback_skipped_when_static_read_has_dependencies() {
        let dir = project(&[("setup.py", "setup(name='static', install_requires=['a'])\n")]);
        let build = reader(FakeRunner::working());
        let outcome = build.read_with_fallback(&SetupReader::new(), dir.path());

        let metadata = outcome.map(|o| o.metadata).unwrap_or_default();
        assert_eq!(metadata.name.as_deref(), Some("static"));
        assert!(build.runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_fallback_runs_on_empty_static_result() {
        let dir = project(&[("setup.py", "setup(name='static', version=compute())\n")]);
        let build = reader(FakeRunner::working());
        let outcome = build.read_with_fallback(&SetupReader::new(), dir.path());

        let metadata = outcome.map(|o| o.metadata).unwrap_or_default();
        assert_eq!(metadata.name.as_deref(), Some("built"));
        assert_eq!(metadata.version.as_deref(), Some("3.0"));
        assert_eq!(build.runner.calls.borrow().len(), 2);
    }
}
