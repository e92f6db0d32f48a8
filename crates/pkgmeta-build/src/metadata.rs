//! `*.dist-info/METADATA` parsing
//!
//! The file is an RFC 822 style header block followed by an optional
//! description body. Only the headers are read.

use crate::errors::BuildError;
use crate::requirements::partition_requirements;
use pkgmeta_record::PackageMetadata;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DIST_INFO_SUFFIX: &str = ".dist-info";
const METADATA_FILE: &str = "METADATA";

/// Headers of a distribution-metadata record that pkgmeta uses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub requires_python: Option<String>,
    pub requires_dist: Vec<String>,
}

impl DistMetadata {
    /// Parse the header block of a `METADATA` file
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut headers: Vec<(String, String)> = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                break;
            }
            if line.starts_with([' ', '\t']) {
                let Some((_, value)) = headers.last_mut() else {
                    return Err(format!("line {}: continuation before any header", idx + 1));
                };
                value.push(' ');
                value.push_str(line.trim());
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                return Err(format!("line {}: expected 'Header: value'", idx + 1));
            };
            headers.push((key.trim().to_ascii_lowercase(), value.trim().to_string()));
        }

        if headers.is_empty() {
            return Err("no headers found".to_string());
        }

        let first = |name: &str| {
            headers
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        };
        Ok(DistMetadata {
            name: first("name"),
            version: first("version"),
            requires_python: first("requires-python"),
            requires_dist: headers
                .iter()
                .filter(|(key, _)| key == "requires-dist")
                .map(|(_, value)| value.clone())
                .collect(),
        })
    }

    pub fn into_package_metadata(self) -> PackageMetadata {
        let (install_requires, extras_require) = partition_requirements(&self.requires_dist);
        PackageMetadata {
            name: self.name,
            version: self.version,
            python_requires: self.requires_python,
            install_requires,
            extras_require,
        }
    }
}

/// The `*.dist-info` directory the metadata hook wrote into `dir`
pub fn find_dist_info(dir: &Path) -> Result<PathBuf, BuildError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| BuildError::io(format!("reading {}", dir.display()), e))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(DIST_INFO_SUFFIX))
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| BuildError::MissingDistInfo(dir.to_path_buf()))
}

/// Read `<dist_info>/METADATA` into the metadata record
pub fn read_dist_info(dist_info: &Path) -> Result<PackageMetadata, BuildError> {
    let path = dist_info.join(METADATA_FILE);
    let content = fs::read_to_string(&path)
        .map_err(|e| BuildError::io(format!("reading {}", path.display()), e))?;
    let parsed = DistMetadata::parse(&content)
        .map_err(|message| BuildError::InvalidMetadata { path, message })?;
    debug!(
        "dist-info metadata: name={:?} version={:?}, {} Requires-Dist entries",
        parsed.name,
        parsed.version,
        parsed.requires_dist.len()
    );
    Ok(parsed.into_package_metadata())
}
