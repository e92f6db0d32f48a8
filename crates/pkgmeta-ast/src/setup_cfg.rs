//! `setup.cfg` reader
//!
//! Parses the INI dialect understood by Python's `configparser` and maps the
//! handful of keys that carry package metadata onto the record. Values are
//! taken literally; `attr:`/`file:` directives and `%(name)s` interpolation are
//! not evaluated.

use pkgmeta_record::{ExtrasRequire, PackageMetadata};
use std::collections::HashMap;
use tracing::debug;

const DEFAULT_SECTION: &str = "DEFAULT";
const METADATA_SECTION: &str = "metadata";
const OPTIONS_SECTION: &str = "options";
const EXTRAS_SECTION: &str = "options.extras_require";

/// A malformed line in an INI document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniError {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

impl IniError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        IniError {
            line,
            message: message.into(),
        }
    }
}

/// Options of one section, in file order
type Options = Vec<(String, String)>;

/// A parsed INI document
#[derive(Debug, Default)]
pub struct IniDocument {
    sections: Vec<(String, Options)>,
    index: HashMap<String, usize>,
}

impl IniDocument {
    pub fn parse(content: &str) -> Result<Self, IniError> {
        let mut doc = IniDocument::default();
        // (section index, option index, indent of the option line)
        let mut current_option: Option<(usize, usize, usize)> = None;
        let mut current_section: Option<usize> = None;
        let mut pending_blank_lines = 0usize;

        for (idx, raw) in content.lines().enumerate() {
            let lineno = idx + 1;
            let trimmed = raw.trim();

            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }
            if trimmed.is_empty() {
                if current_option.is_some() {
                    pending_blank_lines += 1;
                }
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();
            if let Some((section, option, option_indent)) = current_option {
                if indent > option_indent {
                    let value = &mut doc.sections[section].1[option].1;
                    for _ in 0..pending_blank_lines {
                        value.push('\n');
                    }
                    value.push('\n');
                    value.push_str(trimmed);
                    pending_blank_lines = 0;
                    continue;
                }
            }
            current_option = None;
            pending_blank_lines = 0;

            if let Some(header) = section_header(trimmed) {
                if doc.index.contains_key(header) {
                    return Err(IniError::new(
                        lineno,
                        format!("section '{}' already exists", header),
                    ));
                }
                doc.index.insert(header.to_string(), doc.sections.len());
                doc.sections.push((header.to_string(), Vec::new()));
                current_section = Some(doc.sections.len() - 1);
                continue;
            }

            let Some(section) = current_section else {
                return Err(IniError::new(lineno, "option found before any section header"));
            };
            let Some((key, value)) = split_option(trimmed) else {
                return Err(IniError::new(lineno, format!("cannot parse line '{}'", trimmed)));
            };

            let options = &mut doc.sections[section].1;
            if options.iter().any(|(existing, _)| *existing == key) {
                return Err(IniError::new(
                    lineno,
                    format!("option '{}' already exists in this section", key),
                ));
            }
            options.push((key, value.to_string()));
            current_option = Some((section, options.len() - 1, indent));
        }

        Ok(doc)
    }

    fn section(&self, name: &str) -> Option<&Options> {
        self.index.get(name).map(|&idx| &self.sections[idx].1)
    }

    /// Value of `option` in `section`, falling back to `[DEFAULT]`
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.section(section)
            .and_then(|options| lookup(options, option))
            .or_else(|| {
                self.section(DEFAULT_SECTION)
                    .and_then(|options| lookup(options, option))
            })
    }

    /// Every option visible in `section` (its own, then inherited defaults), or
    /// `None` when the section is absent
    pub fn items(&self, section: &str) -> Option<Vec<(&str, &str)>> {
        let own = self.section(section)?;
        let mut items: Vec<(&str, &str)> = own
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        if section != DEFAULT_SECTION {
            for (key, value) in self.section(DEFAULT_SECTION).into_iter().flatten() {
                if !own.iter().any(|(existing, _)| existing == key) {
                    items.push((key.as_str(), value.as_str()));
                }
            }
        }
        Some(items)
    }
}

fn lookup<'o>(options: &'o Options, option: &str) -> Option<&'o str> {
    options
        .iter()
        .find(|(key, _)| key == option)
        .map(|(_, value)| value.as_str())
}

/// Name between `[` and the last `]`; trailing text after the bracket is ignored
fn section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let inner = &rest[..rest.rfind(']')?];
    (!inner.is_empty()).then_some(inner)
}

/// `key = value` or `key: value`; the first delimiter wins
fn split_option(line: &str) -> Option<(String, &str)> {
    let delimiter = line.find(['=', ':'])?;
    let key = line[..delimiter].trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_lowercase(), line[delimiter + 1..].trim()))
}

/// Non-blank trimmed lines of a multi-line value, in order
fn requirement_lines(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Map a `setup.cfg` document onto the metadata record
pub fn parse_setup_cfg(content: &str) -> Result<PackageMetadata, IniError> {
    let doc = IniDocument::parse(content)?;

    let mut extras = ExtrasRequire::new();
    for (group, value) in doc.items(EXTRAS_SECTION).unwrap_or_default() {
        extras.insert(group.to_string(), requirement_lines(value));
    }

    let metadata = PackageMetadata {
        name: doc.get(METADATA_SECTION, "name").map(str::to_string),
        version: doc.get(METADATA_SECTION, "version").map(str::to_string),
        python_requires: doc
            .get(OPTIONS_SECTION, "python_requires")
            .map(str::to_string),
        install_requires: doc
            .get(OPTIONS_SECTION, "install_requires")
            .map(requirement_lines)
            .unwrap_or_default(),
        extras_require: extras,
    };
    debug!(
        "setup.cfg: {} install requirement(s), {} extras group(s)",
        metadata.install_requires.len(),
        metadata.extras_require.len()
    );
    Ok(metadata)
}
