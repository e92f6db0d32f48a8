pub mod config;
pub mod read;
