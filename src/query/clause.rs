//! # Filter Clauses
//!
//! Metadata and taxonomy clauses carried by a compiled [`Query`](super::Query).

use serde::{Deserialize, Serialize};

/// How the nodes of a group combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

/// Comparison operator of a metadata clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compare {
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
}

/// How the store should cast a metadata value before comparing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaType {
    Numeric,
}

/// A single comparison against a record's custom-field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaClause {
    /// Custom-field key
    pub key: String,

    /// Raw bound, cast by the store according to `meta_type`
    pub value: String,

    #[serde(rename = "type")]
    pub meta_type: MetaType,

    pub compare: Compare,
}

impl MetaClause {
    /// Create a numeric comparison clause
    pub fn numeric(key: impl Into<String>, compare: Compare, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            meta_type: MetaType::Numeric,
            compare,
        }
    }
}

/// Either a nested group or a leaf clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaNode {
    Group(MetaGroup),
    Clause(MetaClause),
}

/// An ordered group of metadata nodes joined by one relation
///
/// The group always exists on a query; "no metadata filtering" is an
/// empty group rather than a missing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaGroup {
    pub relation: Relation,
    nodes: Vec<MetaNode>,
}

impl MetaGroup {
    /// Create an empty group
    pub fn new(relation: Relation) -> Self {
        Self {
            relation,
            nodes: Vec::new(),
        }
    }

    /// Create an empty AND group
    pub fn all() -> Self {
        Self::new(Relation::And)
    }

    /// Create an empty OR group
    pub fn any() -> Self {
        Self::new(Relation::Or)
    }

    /// Append a clause (builder style)
    pub fn with_clause(mut self, clause: MetaClause) -> Self {
        self.push(MetaNode::Clause(clause));
        self
    }

    /// Append a nested group (builder style)
    pub fn with_group(mut self, group: MetaGroup) -> Self {
        self.push(MetaNode::Group(group));
        self
    }

    /// Append a node
    pub fn push(&mut self, node: MetaNode) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[MetaNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for MetaGroup {
    fn default() -> Self {
        Self::all()
    }
}

/// Which term attribute a taxonomy clause matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermField {
    Slug,
}

/// Operator applied between a record's terms and the clause terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxOperator {
    /// Record has at least one of the listed terms
    #[serde(rename = "IN")]
    In,
}

/// Restricts results to records carrying any of `terms` in `taxonomy`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxClause {
    pub taxonomy: String,
    pub field: TermField,
    pub terms: Vec<String>,
    pub operator: TaxOperator,
}

impl TaxClause {
    /// Create a slug IN clause
    pub fn slugs(taxonomy: impl Into<String>, terms: Vec<String>) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            field: TermField::Slug,
            terms,
            operator: TaxOperator::In,
        }
    }
}
