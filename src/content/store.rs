//! # Content Collaborators
//!
//! Traits for everything the endpoint reads from the host content system.
//! The core never implements these beyond the bundled in-memory store.

use thiserror::Error;

use crate::query::Query;

use super::record::{FieldObject, RawRecord, Term};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Content store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store could not be reached or failed while executing
    #[error("Content store unavailable: {0}")]
    Unavailable(String),

    /// Store rejected the query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// One page of query results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub records: Vec<RawRecord>,

    /// Number of records matching the query across all pages
    pub total: u64,

    pub total_pages: u64,
}

/// Executes compiled queries
pub trait ContentStore: Send + Sync {
    /// Execute a query, returning the requested page and totals
    fn execute(&self, query: &Query) -> StoreResult<QueryPage>;
}

/// Custom-field lookup
pub trait CustomFieldProvider: Send + Sync {
    /// All field objects of a record, or `None` when it has none
    fn fields(&self, id: u64) -> Option<Vec<FieldObject>>;
}

/// Taxonomy lookup
pub trait TaxonomyProvider: Send + Sync {
    /// Every registered taxonomy name
    fn taxonomies(&self) -> Vec<String>;

    /// Taxonomies attached to a content type
    fn taxonomies_for_type(&self, post_type: &str) -> Vec<String>;

    /// Terms of `taxonomy` assigned to a record
    fn terms(&self, id: u64, taxonomy: &str) -> Vec<Term>;
}

/// Resolves the public URL of a record
pub trait PermalinkResolver: Send + Sync {
    fn resolve(&self, record: &RawRecord) -> String;
}
