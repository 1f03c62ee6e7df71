//! # Request Parameter Resolver
//!
//! Resolves raw `/all-posts` query parameters into [`RequestParams`], filling
//! in defaults. No bounds checking is done here: negative pages and page
//! sizes reach the store unchanged.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::query::Order;

use super::errors::{RestError, RestResult};

/// Default sort key
pub const DEFAULT_ORDERBY: &str = "date";

/// Default page number
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Default content type
pub const DEFAULT_TYPE: &str = "post";

/// Prefix of taxonomy filter parameters (`tax_category=news,sports`)
pub const TAX_PARAM_PREFIX: &str = "tax_";

/// Resolved request parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestParams {
    pub order: Order,
    pub orderby: String,
    pub page: i64,
    pub per_page: i64,

    /// Ordered, de-duplicated content types
    pub types: Vec<String>,

    /// Raw lower bound of the event range
    pub event_after: Option<String>,

    /// Raw upper bound of the event range
    pub event_before: Option<String>,

    /// Taxonomy name (without prefix) -> term slugs
    pub taxonomy_filters: BTreeMap<String, Vec<String>>,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            order: Order::Asc,
            orderby: DEFAULT_ORDERBY.to_string(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            types: vec![DEFAULT_TYPE.to_string()],
            event_after: None,
            event_before: None,
            taxonomy_filters: BTreeMap::new(),
        }
    }
}

impl RequestParams {
    /// Resolve request parameters from a HashMap
    pub fn resolve(params: &HashMap<String, String>) -> RestResult<Self> {
        let mut result = RequestParams::default();

        for (key, value) in params {
            if is_falsy(value) {
                continue;
            }

            match key.as_str() {
                "order" => {
                    // Unrecognised directions keep the default
                    if let Some(order) = Order::parse(value) {
                        result.order = order;
                    }
                }
                "orderby" => {
                    result.orderby = value.trim().to_string();
                }
                "page" => {
                    result.page = parse_integer("page", value)?;
                }
                "per_page" => {
                    result.per_page = parse_integer("per_page", value)?;
                }
                "type" => {
                    let types = split_list(value);
                    if !types.is_empty() {
                        result.types = types;
                    }
                }
                "event_after" => {
                    result.event_after = Some(value.trim().to_string());
                }
                "event_before" => {
                    result.event_before = Some(value.trim().to_string());
                }
                _ => {
                    if let Some(taxonomy) = key.strip_prefix(TAX_PARAM_PREFIX) {
                        let terms = split_list(value);
                        if !taxonomy.is_empty() && !terms.is_empty() {
                            result.taxonomy_filters.insert(taxonomy.to_string(), terms);
                        }
                    }
                }
            }
        }

        Ok(result)
    }

    /// Term slugs requested through `tax_<taxonomy>`, if any
    pub fn terms_for(&self, taxonomy: &str) -> Option<&[String]> {
        self.taxonomy_filters.get(taxonomy).map(Vec::as_slice)
    }

    /// Whether either event bound is set
    pub fn has_event_range(&self) -> bool {
        self.event_after.is_some() || self.event_before.is_some()
    }
}

/// Empty and "0" mean "use the default"; any other string is a value
fn is_falsy(value: &str) -> bool {
    matches!(value.trim(), "" | "0")
}

/// Parse an integer parameter
fn parse_integer(name: &str, value: &str) -> RestResult<i64> {
    value.trim().parse().map_err(|_| {
        RestError::InvalidQueryParam(format!("Invalid {}: {}", name, value))
    })
}

/// Split a comma-separated list into an ordered set
fn split_list(value: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();

    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() || items.iter().any(|i| i == part) {
            continue;
        }
        items.push(part.to_string());
    }

    items
}
