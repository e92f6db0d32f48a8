//! The five-field metadata record
//!
//! Every field starts out *unknown*: `None` for the scalar fields and an empty
//! collection for the requirement fields. Unknown is never an error value; a
//! reader that cannot resolve a field simply leaves it unknown.

use crate::errors::RecordError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optional-dependency groups keyed by group name
pub type ExtrasRequire = BTreeMap<String, Vec<String>>;

/// Package identity and dependency declarations recovered from a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub python_requires: Option<String>,
    #[serde(default)]
    pub install_requires: Vec<String>,
    // Tables come last so the TOML rendering never places a value after a table.
    #[serde(default)]
    pub extras_require: ExtrasRequire,
}

impl PackageMetadata {
    /// Overwrite every field of `self` for which `other` carries a non-empty value.
    ///
    /// Fields that are unknown in `other` never clear what `self` already holds,
    /// and a non-empty field in `other` always wins, even when both disagree.
    pub fn merge_from(&mut self, other: PackageMetadata) {
        if has_text(&other.name) {
            self.name = other.name;
        }
        if has_text(&other.version) {
            self.version = other.version;
        }
        if !other.install_requires.is_empty() {
            self.install_requires = other.install_requires;
        }
        if !other.extras_require.is_empty() {
            self.extras_require = other.extras_require;
        }
        if has_text(&other.python_requires) {
            self.python_requires = other.python_requires;
        }
    }

    /// True when the record carries no dependency information at all.
    ///
    /// `name` and `version` are not considered.
    pub fn is_empty_result(&self) -> bool {
        self.install_requires.is_empty()
            && self.extras_require.is_empty()
            && !has_text(&self.python_requires)
    }

    /// True when every field is unknown
    pub fn is_unknown(&self) -> bool {
        !has_text(&self.name) && !has_text(&self.version) && self.is_empty_result()
    }

    pub fn to_json_pretty(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml(&self) -> Result<String, RecordError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}
