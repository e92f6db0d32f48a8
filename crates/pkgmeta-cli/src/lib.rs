//! pkgmeta command-line interface
//!
//! The binary in `main.rs` only parses arguments and dispatches; the command
//! handlers live here so integration tests and other tools can reuse them.

pub mod commands;
pub mod common;
