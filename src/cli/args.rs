//! CLI argument definitions using clap
//!
//! Commands:
//! - all-posts serve --config <path> [--port <port>]
//! - all-posts query --config <path> [--param key=value ...]
//! - all-posts explain --config <path> [--param key=value ...]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// all-posts - aggregated, filterable posts REST endpoint
#[derive(Parser, Debug)]
#[command(name = "all-posts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./all-posts.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one request and print the page as JSON
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./all-posts.json")]
        config: PathBuf,

        /// Request parameter, e.g. --param type=post,event
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Print the compiled content-store query as JSON
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./all-posts.json")]
        config: PathBuf,

        /// Request parameter, e.g. --param event_after=1700000000
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

/// Parse a `key=value` pair
fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("tax_category=news,sports").unwrap(),
            ("tax_category".to_string(), "news,sports".to_string())
        );
        assert_eq!(parse_param("type=").unwrap(), ("type".to_string(), String::new()));
        assert!(parse_param("type").is_err());
    }

    #[test]
    fn test_query_command() {
        let cli = Cli::try_parse_from([
            "all-posts",
            "query",
            "--param",
            "type=post,event",
            "--param",
            "per_page=2",
        ])
        .unwrap();

        match cli.command {
            Command::Query { config, params } => {
                assert_eq!(config, PathBuf::from("./all-posts.json"));
                assert_eq!(params.len(), 2);
                assert_eq!(params[1], ("per_page".to_string(), "2".to_string()));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
