//! Package metadata record
//!
//! This crate holds the single artifact every pkgmeta reader produces: the
//! five-field [`PackageMetadata`] record. Readers for `setup.py`, `setup.cfg`
//! and the build-backend fallback all return it, and the directory locator
//! folds several of them together with [`PackageMetadata::merge_from`].

pub mod errors;
pub mod types;

pub use errors::RecordError;
pub use types::{ExtrasRequire, PackageMetadata};
