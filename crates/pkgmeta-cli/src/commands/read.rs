use crate::common::GlobalOpts;
use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use pkgmeta_ast::{DirectoryMetadata, SetupReader};
use pkgmeta_build::{BuildMetadataReader, UvRunner};
use pkgmeta_config::Config;
use pkgmeta_logger as logger;
use pkgmeta_record::PackageMetadata;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Toml,
}

#[derive(Args, Debug, Clone)]
pub struct ReadCommand {
    /// Project directory containing setup.py and/or setup.cfg
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Always ask the build backend instead of reading the files statically
    #[arg(long, conflicts_with = "fallback")]
    pub build: bool,

    /// Ask the build backend when the static read finds no dependency information
    #[arg(long)]
    pub fallback: bool,

    /// Fail when a descriptor file exists but cannot be read
    #[arg(long)]
    pub strict: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

pub fn handle_read(cmd: ReadCommand, _opts: &GlobalOpts) -> Result<()> {
    let rendered = read_project(&cmd)?;
    println!("{}", rendered);
    Ok(())
}

/// Read the project and render the record in the requested format
pub fn read_project(cmd: &ReadCommand) -> Result<String> {
    if !cmd.dir.is_dir() {
        bail!("Not a directory: {}", cmd.dir.display());
    }

    debug!(
        "Reading {:?} (build: {}, fallback: {})",
        cmd.dir, cmd.build, cmd.fallback
    );
    let outcome = if cmd.build || cmd.fallback {
        let config = Config::load().context("Failed to load config")?;
        let runner = UvRunner::from_config(&config)?;
        debug!("Using build backend {}", config.build_backend());
        let builder = BuildMetadataReader::from_config(runner, &config);
        if cmd.build {
            DirectoryMetadata {
                metadata: builder.read(&cmd.dir)?,
                ..DirectoryMetadata::default()
            }
        } else {
            builder.read_with_fallback(&SetupReader::new(), &cmd.dir)?
        }
    } else {
        SetupReader::new().read_from_directory(&cmd.dir)
    };

    report(&outcome);
    if cmd.strict && !outcome.failures.is_empty() {
        bail!(
            "{} descriptor file(s) could not be read",
            outcome.failures.len()
        );
    }

    render(&outcome.metadata, cmd.format)
}

fn report(outcome: &DirectoryMetadata) {
    if outcome.found.is_empty() && outcome.failures.is_empty() {
        logger::debug("No setup.py or setup.cfg found");
    }
    for path in &outcome.found {
        logger::debug(&format!("Found {}", path.display()));
    }
    for failure in &outcome.failures {
        logger::warn(&failure.to_string());
    }
}

pub fn render(metadata: &PackageMetadata, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => metadata.to_json_pretty()?,
        OutputFormat::Toml => metadata.to_toml()?,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn command(dir: &TempDir) -> ReadCommand {
        ReadCommand {
            dir: dir.path().to_path_buf(),
            build: false,
            fallback: false,
            strict: false,
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn test_read_project_json() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        fs::write(dir.path().join("setup.py"), "setup(name='foo')\n")
            .unwrap_or_else(|e| panic!("write: {e}"));

        let rendered = read_project(&command(&dir)).unwrap_or_default();
        assert!(rendered.contains("\"name\": \"foo\""));
    }

    #[test]
    fn test_strict_fails_on_unreadable_descriptor() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        fs::write(dir.path().join("setup.cfg"), "name = foo\n")
            .unwrap_or_else(|e| panic!("write: {e}"));

        let mut cmd = command(&dir);
        assert!(read_project(&cmd).is_ok());
        cmd.strict = true;
        assert!(read_project(&cmd).is_err());
    }

    #[test]
    fn test_render_toml() {
        let metadata = PackageMetadata {
            name: Some("foo".to_string()),
            ..PackageMetadata::default()
        };
        let rendered = render(&metadata, OutputFormat::Toml).unwrap_or_default();
        assert!(rendered.contains("name = \"foo\""));
    }
}
