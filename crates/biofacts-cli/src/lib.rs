//! Biofacts CLI library.
//!
//! This library provides the core functionality for the `biofacts` command-line
//! interface: argument parsing, configuration loading, command execution and
//! console formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::load_config;
pub use error::{CliError, Result};
pub use output::Formatter;
