//! # All-Posts Handler
//!
//! Orchestrates one `/all-posts` request: resolve parameters, compile the
//! query, execute it against the content store, then map every record.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info_span, warn};
use uuid::Uuid;

use crate::content::{ContentStore, CustomFieldProvider, PermalinkResolver, TaxonomyProvider};
use crate::mapper::ResultMapper;
use crate::query::{Query, QueryCompiler};
use crate::registry::StageRegistry;

use super::errors::RestResult;
use super::parser::RequestParams;
use super::response::PostsPage;

/// External systems the endpoint reads from
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn ContentStore>,
    pub taxonomies: Arc<dyn TaxonomyProvider>,
    pub custom_fields: Option<Arc<dyn CustomFieldProvider>>,
    pub permalinks: Arc<dyn PermalinkResolver>,
}

/// The `/all-posts` endpoint
pub struct AllPostsEndpoint {
    compiler: QueryCompiler,
    store: Arc<dyn ContentStore>,
    mapper: ResultMapper,
}

impl AllPostsEndpoint {
    /// Create an endpoint from an explicit registry
    pub fn new(
        store: Arc<dyn ContentStore>,
        permalinks: Arc<dyn PermalinkResolver>,
        registry: StageRegistry,
    ) -> Self {
        let (compiler, mapper) = registry.build(permalinks);
        Self {
            compiler,
            store,
            mapper,
        }
    }

    /// Create an endpoint with the built-in stages
    pub fn with_builtin(collaborators: Collaborators) -> Self {
        let registry = StageRegistry::with_builtin(
            collaborators.taxonomies.clone(),
            collaborators.custom_fields.clone(),
        );
        Self::new(collaborators.store, collaborators.permalinks, registry)
    }

    /// Resolve and compile without executing
    pub fn explain(&self, raw: &HashMap<String, String>) -> RestResult<Query> {
        let params = RequestParams::resolve(raw)?;
        Ok(self.compiler.compile(&params))
    }

    /// Handle one request
    pub fn handle(&self, raw: &HashMap<String, String>) -> RestResult<PostsPage> {
        let request_id = Uuid::new_v4();
        let span = info_span!("all_posts", %request_id);
        let _guard = span.enter();

        let params = RequestParams::resolve(raw)?;
        let query = self.compiler.compile(&params);

        debug!(
            query = %serde_json::to_string(&query).unwrap_or_default(),
            "compiled query"
        );

        let page = self.store.execute(&query).map_err(|e| {
            warn!(error = %e, "content store query failed");
            e
        })?;

        let records = page.records.iter().map(|raw| self.mapper.map(raw)).collect();

        debug!(
            returned = page.records.len(),
            total = page.total,
            total_pages = page.total_pages,
            "request complete"
        );

        Ok(PostsPage::new(records, page.total, page.total_pages))
    }
}
