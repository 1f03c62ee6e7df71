//! Built-in filter stages

use std::sync::Arc;

use crate::content::TaxonomyProvider;
use crate::rest_api::RequestParams;

use super::ast::{OrderBy, Query};
use super::clause::{Compare, MetaClause, MetaGroup, TaxClause};
use super::compiler::FilterStage;

/// Custom field holding an event's start timestamp
pub const EVENT_START_KEY: &str = "date";

/// Custom field holding an event's end timestamp
pub const EVENT_END_KEY: &str = "end_date";

/// Restricts results to events overlapping `event_after`/`event_before`
///
/// An event is "after" the bound when it starts or ends at or after it, and
/// "before" the bound when it starts at or before it. Any bound switches the
/// sort key to the event start field.
#[derive(Debug, Default)]
pub struct EventRangeStage;

impl EventRangeStage {
    pub const NAME: &'static str = "event_range";

    /// The clause group for the given bounds; empty when neither is set
    pub fn range_group(after: Option<&str>, before: Option<&str>) -> MetaGroup {
        let mut group = MetaGroup::all();

        if let Some(after) = after {
            group = group.with_group(
                MetaGroup::any()
                    .with_clause(MetaClause::numeric(EVENT_START_KEY, Compare::Gte, after))
                    .with_clause(MetaClause::numeric(EVENT_END_KEY, Compare::Gte, after)),
            );
        }

        if let Some(before) = before {
            group = group.with_group(
                MetaGroup::any().with_clause(MetaClause::numeric(EVENT_START_KEY, Compare::Lte, before)),
            );
        }

        group
    }
}

impl FilterStage for EventRangeStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, mut query: Query, params: &RequestParams) -> Query {
        if !params.has_event_range() {
            return query;
        }

        query.push_meta_group(Self::range_group(
            params.event_after.as_deref(),
            params.event_before.as_deref(),
        ));
        query.set_order_by(OrderBy::meta_value(EVENT_START_KEY));
        query
    }
}

/// Adds a slug clause for every known taxonomy named by a `tax_<name>` parameter
pub struct TaxonomyStage {
    taxonomies: Arc<dyn TaxonomyProvider>,
}

impl TaxonomyStage {
    pub const NAME: &'static str = "taxonomy";

    pub fn new(taxonomies: Arc<dyn TaxonomyProvider>) -> Self {
        Self { taxonomies }
    }
}

impl FilterStage for TaxonomyStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, mut query: Query, params: &RequestParams) -> Query {
        for taxonomy in self.taxonomies.taxonomies() {
            if let Some(terms) = params.terms_for(&taxonomy) {
                query.push_tax_clause(TaxClause::slugs(taxonomy, terms.to_vec()));
            }
        }

        query
    }
}
