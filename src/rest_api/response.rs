//! # Response Formatting
//!
//! The `/all-posts` response: a bare JSON array of records, with pagination
//! totals carried in headers.

use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::mapper::OutputRecord;

/// Header carrying the number of matching records
pub const TOTAL_HEADER: &str = "x-wp-total";

/// Header carrying the number of pages
pub const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// One page of mapped records plus the store's totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostsPage {
    pub records: Vec<OutputRecord>,
    pub total: u64,
    pub total_pages: u64,
}

impl PostsPage {
    pub fn new(records: Vec<OutputRecord>, total: u64, total_pages: u64) -> Self {
        Self {
            records,
            total,
            total_pages,
        }
    }

    /// Pagination headers for this page
    pub fn headers(&self) -> [(HeaderName, HeaderValue); 2] {
        [
            (
                HeaderName::from_static(TOTAL_HEADER),
                HeaderValue::from(self.total),
            ),
            (
                HeaderName::from_static(TOTAL_PAGES_HEADER),
                HeaderValue::from(self.total_pages),
            ),
        ]
    }
}

impl IntoResponse for PostsPage {
    fn into_response(self) -> Response {
        let headers = self.headers();
        (headers, Json(self.records)).into_response()
    }
}
