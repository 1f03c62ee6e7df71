//! # All-Posts REST API Module
//!
//! Provides the `GET /{namespace}/all-posts` endpoint: parameter resolution,
//! request orchestration, response formatting and the HTTP server.

pub mod errors;
pub mod handler;
pub mod parser;
pub mod response;
pub mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use handler::{AllPostsEndpoint, Collaborators};
pub use parser::RequestParams;
pub use response::{PostsPage, TOTAL_HEADER, TOTAL_PAGES_HEADER};
pub use server::RestServer;
