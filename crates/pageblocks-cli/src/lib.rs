//! Library side of the `pageblocks` binary: config, snapshot input, and
//! subcommand implementations.

pub mod commands;
pub mod config;
pub mod snapshot;

pub use config::{CliConfig, ConfigError, default_config_path};
