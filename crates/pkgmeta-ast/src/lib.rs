//! Static extraction of package metadata from `setup.py` and `setup.cfg`
//!
//! Nothing found in a project directory is ever executed:
//! 1. `setup.py` is parsed into a small syntax tree and the `setup(...)` call is
//!    evaluated symbolically ([`analyzer`])
//! 2. `setup.cfg` is parsed as an INI document ([`setup_cfg`])
//! 3. Per-field results are merged, `setup.cfg` winning on conflicts
//!    ([`SetupReader::read_from_directory`])
pub mod analyzer;
pub mod errors;
pub mod parser;
pub mod setup_cfg;
pub mod tree;

use analyzer::SetupScriptAnalyzer;
use errors::ReadError;
use parser::{AstGrepParser, ScriptParser};
use pkgmeta_record::PackageMetadata;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const SETUP_PY: &str = "setup.py";
pub const SETUP_CFG: &str = "setup.cfg";

/// Descriptor files in merge order; later files overwrite earlier non-empty fields
pub const DESCRIPTOR_FILES: [&str; 2] = [SETUP_PY, SETUP_CFG];

/// Outcome of reading every descriptor file of a project directory
#[derive(Debug, Default)]
pub struct DirectoryMetadata {
    /// Merged record; all-unknown when nothing could be read
    pub metadata: PackageMetadata,
    /// Descriptor files that exist in the directory, in merge order
    pub found: Vec<PathBuf>,
    /// Descriptor files that exist but could not be read
    pub failures: Vec<ReadError>,
}

impl DirectoryMetadata {
    /// The merged record, or the first read failure
    pub fn into_result(self) -> Result<PackageMetadata, ReadError> {
        match self.failures.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.metadata),
        }
    }
}

/// Reads descriptor files with a pluggable script parser
#[derive(Debug, Default, Clone)]
pub struct SetupReader<P = AstGrepParser> {
    parser: P,
    analyzer: SetupScriptAnalyzer,
}

impl SetupReader<AstGrepParser> {
    pub fn new() -> Self {
        Self::with_parser(AstGrepParser)
    }
}

impl<P: ScriptParser> SetupReader<P> {
    pub fn with_parser(parser: P) -> Self {
        SetupReader {
            parser,
            analyzer: SetupScriptAnalyzer::new(),
        }
    }

    /// Read every descriptor present in `directory` and merge the results.
    ///
    /// A missing file is skipped silently. A file that fails to read is
    /// recorded in [`DirectoryMetadata::failures`] and contributes nothing;
    /// the remaining files are still read.
    pub fn read_from_directory(&self, directory: &Path) -> DirectoryMetadata {
        let mut outcome = DirectoryMetadata::default();

        for file_name in DESCRIPTOR_FILES {
            let path = directory.join(file_name);
            if !path.is_file() {
                debug!("{} not present, skipping", path.display());
                continue;
            }
            outcome.found.push(path.clone());

            let result = if file_name == SETUP_PY {
                self.read_setup_py(&path)
            } else {
                self.read_setup_cfg(&path)
            };
            match result {
                Ok(metadata) => outcome.metadata.merge_from(metadata),
                Err(err) => {
                    warn!("{}", err);
                    outcome.failures.push(err);
                }
            }
        }

        info!(
            "Read {} descriptor file(s) from {} ({} failed)",
            outcome.found.len(),
            directory.display(),
            outcome.failures.len()
        );
        outcome
    }

    pub fn read_setup_py(&self, path: &Path) -> Result<PackageMetadata, ReadError> {
        let source = read_to_string(path)?;
        self.analyzer
            .analyze_source(&self.parser, &source)
            .map_err(|source| ReadError::Syntax {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn read_setup_cfg(&self, path: &Path) -> Result<PackageMetadata, ReadError> {
        let content = read_to_string(path)?;
        setup_cfg::parse_setup_cfg(&content).map_err(|err| ReadError::Config {
            path: path.to_path_buf(),
            line: err.line,
            message: err.message,
        })
    }
}

fn read_to_string(path: &Path) -> Result<String, ReadError> {
    fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SyntaxError;
    use crate::tree::Stmt;
    use std::fs;
    use tempfile::TempDir;

    const SETUP_PY_SOURCE: &str = r#"
from setuptools import setup

setup(
    name="foo",
    version="1.0",
    install_requires=["bar>=1.0", "baz"],
    python_requires=">=3.7",
)
"#;

    const SETUP_CFG_SOURCE: &str = r"[metadata]
version = 2.0

[options]
install_requires =
    qux
";

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap_or_else(|e| panic!("write: {e}"));
        }
        dir
    }

    #[test]
    fn test_empty_directory_yields_default() {
        let dir = project(&[]);
        let outcome = SetupReader::new().read_from_directory(dir.path());
        assert_eq!(outcome.metadata, PackageMetadata::default());
        assert!(outcome.found.is_empty());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_setup_cfg_overrides_setup_py() {
        let dir = project(&[(SETUP_PY, SETUP_PY_SOURCE), (SETUP_CFG, SETUP_CFG_SOURCE)]);
        let outcome = SetupReader::new().read_from_directory(dir.path());

        assert_eq!(outcome.found.len(), 2);
        assert!(outcome.failures.is_empty());
        let metadata = outcome.metadata;
        assert_eq!(metadata.name.as_deref(), Some("foo"));
        assert_eq!(metadata.version.as_deref(), Some("2.0"));
        assert_eq!(metadata.install_requires, vec!["qux"]);
        assert_eq!(metadata.python_requires.as_deref(), Some(">=3.7"));
    }

    #[test]
    fn test_broken_setup_py_does_not_block_setup_cfg() {
        let dir = project(&[
            (SETUP_PY, "setup(name=\"foo\"\n"),
            (SETUP_CFG, SETUP_CFG_SOURCE),
        ]);
        let outcome = SetupReader::new().read_from_directory(dir.path());

        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(outcome.failures[0], ReadError::Syntax { .. }));
        assert_eq!(outcome.failures[0].path(), dir.path().join(SETUP_PY));
        assert_eq!(outcome.metadata.version.as_deref(), Some("2.0"));
        assert!(outcome.metadata.name.is_none());
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_broken_setup_cfg_reports_line() {
        let dir = project(&[(SETUP_CFG, "name = foo\n")]);
        let outcome = SetupReader::new().read_from_directory(dir.path());

        match outcome.failures.as_slice() {
            [ReadError::Config { line, .. }] => assert_eq!(*line, 1),
            other => panic!("unexpected failures: {other:?}"),
        }
    }

    #[test]
    fn test_reader_is_repeatable() {
        let dir = project(&[(SETUP_PY, SETUP_PY_SOURCE)]);
        let reader = SetupReader::new();
        let first = reader.read_from_directory(dir.path()).into_result().ok();
        let second = reader.read_from_directory(dir.path()).into_result().ok();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    struct FailingParser;

    impl ScriptParser for FailingParser {
        fn parse(&self, _source: &str) -> Result<Vec<Stmt>, SyntaxError> {
            Err(SyntaxError {
                line: 1,
                column: 1,
                message: "unsupported".to_string(),
            })
        }
    }

    #[test]
    fn test_custom_parser_is_used() {
        let dir = project(&[(SETUP_PY, SETUP_PY_SOURCE)]);
        let outcome = SetupReader::with_parser(FailingParser).read_from_directory(dir.path());
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.metadata.is_unknown());
    }
}
