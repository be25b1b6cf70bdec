//! CLI module
//!
//! Command-line interface for running the connector.
//!
//! # Commands
//!
//! - `check` - Verify credentials and site access
//! - `spec` - Print the configuration specification
//! - `read` - Extract search analytics records

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
