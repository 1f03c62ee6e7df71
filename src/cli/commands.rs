//! CLI command implementations

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::content::{CustomFieldProvider, HomePermalinks, MemoryStore};
use crate::rest_api::{AllPostsEndpoint, Collaborators, RestServer};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Log filter used when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "all_posts=info,tower_http=info";

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    init_logging();
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Query { config, params } => query(&config, params.into_iter().collect()),
        Command::Explain { config, params } => explain(&config, params.into_iter().collect()),
    }
}

/// Install the tracing subscriber, honouring RUST_LOG
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Build the endpoint over the configured content document
pub fn build_endpoint(config: &AppConfig) -> CliResult<AllPostsEndpoint> {
    let store = Arc::new(MemoryStore::load(&config.content_path)?);
    info!(
        path = %config.content_path.display(),
        posts = store.len(),
        custom_fields = config.custom_fields,
        "content store ready"
    );

    let custom_fields: Option<Arc<dyn CustomFieldProvider>> = if config.custom_fields {
        Some(store.clone() as Arc<dyn CustomFieldProvider>)
    } else {
        None
    };

    Ok(AllPostsEndpoint::with_builtin(Collaborators {
        store: store.clone(),
        taxonomies: store,
        custom_fields,
        permalinks: Arc::new(HomePermalinks::new(config.home_url.clone())),
    }))
}

/// Start the HTTP server
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }

    let endpoint = build_endpoint(&config)?;
    let server = RestServer::new(config, endpoint);

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Server)?;
    rt.block_on(server.start()).map_err(CliError::Server)
}

/// Run one request and print `{ total, total_pages, records }`
pub fn query(config_path: &Path, params: HashMap<String, String>) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    let endpoint = build_endpoint(&config)?;

    let page = endpoint.handle(&params)?;
    write_json(&json!({
        "total": page.total,
        "total_pages": page.total_pages,
        "records": page.records,
    }))
}

/// Print the compiled query
pub fn explain(config_path: &Path, params: HashMap<String, String>) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    let endpoint = build_endpoint(&config)?;

    let query = endpoint.explain(&params)?;
    write_json(&serde_json::to_value(&query)?)
}

fn write_json(value: &serde_json::Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout).map_err(CliError::Stdout)
}
