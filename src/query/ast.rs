//! Compiled query representation
//!
//! A `Query` is what the content store executes. Clause lists can only grow:
//! there is no API to remove or replace a clause once a stage has pushed it.

use serde::{Deserialize, Serialize};

use super::clause::{MetaGroup, MetaNode, TaxClause};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Order {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl Order {
    /// Parse a direction, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASC" => Some(Order::Asc),
            "DESC" => Some(Order::Desc),
            _ => None,
        }
    }
}

/// Sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum OrderBy {
    /// A core record field ("date", "title", ...)
    Field(String),
    /// The value of a custom field; records without the key are excluded
    MetaValue(String),
}

impl OrderBy {
    pub fn field(name: impl Into<String>) -> Self {
        OrderBy::Field(name.into())
    }

    pub fn meta_value(key: impl Into<String>) -> Self {
        OrderBy::MetaValue(key.into())
    }
}

/// Taxonomy clauses joined with AND
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxQuery {
    clauses: Vec<TaxClause>,
}

impl TaxQuery {
    pub fn clauses(&self) -> &[TaxClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Structured content-store query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    page: i64,
    page_size: i64,
    order: Order,
    order_by: OrderBy,
    types: Vec<String>,
    meta_query: MetaGroup,
    tax_query: TaxQuery,
}

impl Query {
    /// Create a query with no filter clauses
    pub fn new(page: i64, page_size: i64, order_by: OrderBy, order: Order, types: Vec<String>) -> Self {
        Self {
            page,
            page_size,
            order,
            order_by,
            types,
            meta_query: MetaGroup::all(),
            tax_query: TaxQuery::default(),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn order_by(&self) -> &OrderBy {
        &self.order_by
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn meta_query(&self) -> &MetaGroup {
        &self.meta_query
    }

    pub fn tax_query(&self) -> &TaxQuery {
        &self.tax_query
    }

    /// Replace the sort key
    pub fn set_order_by(&mut self, order_by: OrderBy) {
        self.order_by = order_by;
    }

    /// Replace the sort direction
    pub fn set_order(&mut self, order: Order) {
        self.order = order;
    }

    /// Append a group to the top-level AND metadata group
    pub fn push_meta_group(&mut self, group: MetaGroup) {
        self.meta_query.push(MetaNode::Group(group));
    }

    /// Append a taxonomy clause
    pub fn push_tax_clause(&mut self, clause: TaxClause) {
        self.tax_query.clauses.push(clause);
    }
}
