//! all-posts - aggregated, filterable posts REST endpoint
//!
//! Serves `GET /{namespace}/all-posts`: posts across several content types,
//! filtered by taxonomy terms and an event date range, enriched with custom
//! fields and taxonomy terms, paginated through `X-WP-Total` headers.

pub mod cli;
pub mod config;
pub mod content;
pub mod mapper;
pub mod query;
pub mod registry;
pub mod rest_api;

pub use config::AppConfig;
pub use registry::StageRegistry;
pub use rest_api::{AllPostsEndpoint, Collaborators, RestServer};
