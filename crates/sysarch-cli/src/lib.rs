//! System Architect CLI library.
//!
//! This library provides the core functionality for the `sysarch` command-line
//! interface, including configuration management, key resolution, command
//! execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod resolve;
pub mod session;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use session::Session;
