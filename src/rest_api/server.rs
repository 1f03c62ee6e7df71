//! # REST API HTTP Server
//!
//! Axum-based HTTP server exposing `GET /{namespace}/all-posts`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;

use super::errors::RestError;
use super::handler::AllPostsEndpoint;
use super::response::PostsPage;

/// Resource path under the namespace
pub const RESOURCE: &str = "all-posts";

/// Shared state type
type ServerState = Arc<AllPostsEndpoint>;

/// REST API server
pub struct RestServer {
    config: AppConfig,
    endpoint: Arc<AllPostsEndpoint>,
}

impl RestServer {
    pub fn new(config: AppConfig, endpoint: AllPostsEndpoint) -> Self {
        Self {
            config,
            endpoint: Arc::new(endpoint),
        }
    }

    /// Full route path, e.g. `/custom-endpoint/v1/all-posts`
    pub fn route_path(&self) -> String {
        format!("/{}/{}", self.config.namespace.trim_matches('/'), RESOURCE)
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        Router::new()
            .route(&self.route_path(), get(list_handler))
            .with_state(self.endpoint.clone())
            .layer(TraceLayer::new_for_http())
            .layer(self.cors())
    }

    fn cors(&self) -> CorsLayer {
        if self.config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = self
                .config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }

    /// Bind and serve until the process exits
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, route = %self.route_path(), "serving all-posts endpoint");

        axum::serve(listener, self.router()).await
    }
}

/// List posts handler
async fn list_handler(
    State(endpoint): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<PostsPage, RestError> {
    endpoint.handle(&query)
}
