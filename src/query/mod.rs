//! # Query Compilation
//!
//! Turns resolved request parameters into a structured content-store query
//! through an ordered chain of filter stages.

pub mod ast;
pub mod clause;
pub mod compiler;
pub mod stages;

pub use ast::{Order, OrderBy, Query, TaxQuery};
pub use clause::{
    Compare, MetaClause, MetaGroup, MetaNode, MetaType, Relation, TaxClause, TaxOperator, TermField,
};
pub use compiler::{FilterStage, QueryCompiler};
pub use stages::{EventRangeStage, TaxonomyStage, EVENT_END_KEY, EVENT_START_KEY};
