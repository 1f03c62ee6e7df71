//! Query compiler
//!
//! Builds the base [`Query`] from resolved parameters, then hands it to every
//! registered [`FilterStage`] in registration order.

use std::sync::Arc;

use tracing::trace;

use crate::rest_api::RequestParams;

use super::ast::{OrderBy, Query};

/// A named step that augments a compiled query
///
/// Stages may push clauses and override ordering. Removing clauses is not
/// possible through the `Query` API.
pub trait FilterStage: Send + Sync {
    /// Stage name, used in logs
    fn name(&self) -> &str;

    /// Augment the query for this request
    fn apply(&self, query: Query, params: &RequestParams) -> Query;
}

/// Compiles request parameters through a fixed chain of filter stages
#[derive(Clone)]
pub struct QueryCompiler {
    stages: Arc<[Arc<dyn FilterStage>]>,
}

impl QueryCompiler {
    /// Create a compiler over an ordered stage list
    pub fn new(stages: Vec<Arc<dyn FilterStage>>) -> Self {
        Self {
            stages: stages.into(),
        }
    }

    /// Base query before any stage runs
    pub fn base_query(params: &RequestParams) -> Query {
        Query::new(
            params.page,
            params.per_page,
            OrderBy::field(params.orderby.clone()),
            params.order,
            params.types.clone(),
        )
    }

    /// Compile the parameters into a store query
    pub fn compile(&self, params: &RequestParams) -> Query {
        self.stages
            .iter()
            .fold(Self::base_query(params), |query, stage| {
                trace!(stage = stage.name(), "applying filter stage");
                stage.apply(query, params)
            })
    }

    /// Names of the registered stages, in order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}
