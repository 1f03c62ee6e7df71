//! Stage registry
//!
//! Ordered, append-only lists of filter and enrichment stages. The registry
//! is filled at startup and consumed when the endpoint is built; after that
//! the chains are shared read-only.

use std::sync::Arc;

use crate::content::{CustomFieldProvider, PermalinkResolver, TaxonomyProvider};
use crate::mapper::{CustomFieldStage, EnrichmentStage, ResultMapper, TaxonomyTermsStage};
use crate::query::{EventRangeStage, FilterStage, QueryCompiler, TaxonomyStage};

/// Filter and enrichment stages in registration order
#[derive(Clone, Default)]
pub struct StageRegistry {
    filters: Vec<Arc<dyn FilterStage>>,
    enrichers: Vec<Arc<dyn EnrichmentStage>>,
}

impl StageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in stages
    ///
    /// Filters: event range, then taxonomy. Enrichment: custom fields, then
    /// taxonomy terms.
    pub fn with_builtin(
        taxonomies: Arc<dyn TaxonomyProvider>,
        custom_fields: Option<Arc<dyn CustomFieldProvider>>,
    ) -> Self {
        Self::new()
            .with_filter(EventRangeStage)
            .with_filter(TaxonomyStage::new(taxonomies.clone()))
            .with_enrichment(CustomFieldStage::new(custom_fields))
            .with_enrichment(TaxonomyTermsStage::new(taxonomies))
    }

    /// Append a filter stage
    pub fn register_filter(&mut self, stage: impl FilterStage + 'static) -> &mut Self {
        self.filters.push(Arc::new(stage));
        self
    }

    /// Append an enrichment stage
    pub fn register_enrichment(&mut self, stage: impl EnrichmentStage + 'static) -> &mut Self {
        self.enrichers.push(Arc::new(stage));
        self
    }

    /// Append a filter stage (builder style)
    pub fn with_filter(mut self, stage: impl FilterStage + 'static) -> Self {
        self.register_filter(stage);
        self
    }

    /// Append an enrichment stage (builder style)
    pub fn with_enrichment(mut self, stage: impl EnrichmentStage + 'static) -> Self {
        self.register_enrichment(stage);
        self
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|s| s.name()).collect()
    }

    pub fn enrichment_names(&self) -> Vec<&str> {
        self.enrichers.iter().map(|s| s.name()).collect()
    }

    /// Freeze the registry into a compiler and a mapper
    pub fn build(self, permalinks: Arc<dyn PermalinkResolver>) -> (QueryCompiler, ResultMapper) {
        (
            QueryCompiler::new(self.filters),
            ResultMapper::new(permalinks, self.enrichers),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{HomePermalinks, MemoryStore};
    use crate::mapper::OutputRecord;
    use crate::query::Query;
    use crate::rest_api::RequestParams;

    struct Noop;

    impl FilterStage for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn apply(&self, query: Query, _params: &RequestParams) -> Query {
            query
        }
    }

    impl EnrichmentStage for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn apply(&self, record: OutputRecord) -> OutputRecord {
            record
        }
    }

    fn builtin() -> StageRegistry {
        let store = Arc::new(MemoryStore::new(Default::default()));
        StageRegistry::with_builtin(store.clone(), Some(store))
    }

    #[test]
    fn test_builtin_order() {
        let registry = builtin();
        assert_eq!(registry.filter_names(), vec!["event_range", "taxonomy"]);
        assert_eq!(registry.enrichment_names(), vec!["acf", "taxonomy_terms"]);
    }

    #[test]
    fn test_custom_stages_append() {
        let mut registry = builtin();
        registry.register_filter(Noop).register_enrichment(Noop);

        let (compiler, mapper) = registry.build(Arc::new(HomePermalinks::new("http://localhost")));
        assert_eq!(compiler.stage_names(), vec!["event_range", "taxonomy", "noop"]);
        assert_eq!(mapper.stage_names(), vec!["acf", "taxonomy_terms", "noop"]);
    }
}
