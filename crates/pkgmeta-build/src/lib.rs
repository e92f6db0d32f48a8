//! Build-environment fallback for package metadata
//!
//! When static analysis of `setup.py`/`setup.cfg` yields no dependency
//! information, the project's build backend is asked for its metadata instead:
//! a disposable environment is provisioned with the build requirements, the
//! backend's `prepare_metadata_for_build_wheel` hook writes a `*.dist-info`
//! directory, and its `METADATA` file is parsed back into the record.
//!
//! Unlike the static readers this path executes project code.
pub mod errors;
pub mod fallback;
pub mod metadata;
pub mod requirements;
pub mod runner;

pub use errors::BuildError;
pub use fallback::BuildMetadataReader;
pub use runner::{BuildBackendRunner, UvRunner};
