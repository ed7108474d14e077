//! Billet CLI library.
//!
//! This library provides the core functionality for the `billet` command-line
//! interface, including configuration, command execution against a local
//! database, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
