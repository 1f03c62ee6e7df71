//! CLI module for all-posts
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP server
//! - query: One-shot request execution
//! - explain: One-shot query compilation

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{build_endpoint, explain, query, run, run_command, serve};
pub use errors::{CliError, CliResult};
