//! # Result Mapping
//!
//! Projects raw content records into client-facing output records and
//! enriches them through an ordered chain of enrichment stages.

pub mod output;
pub mod result_mapper;
pub mod stages;

pub use output::{OutputRecord, BASE_FIELDS};
pub use result_mapper::{EnrichmentStage, ResultMapper};
pub use stages::{
    taxonomy_key, CustomFieldStage, TaxonomyTermsStage, CATEGORY_TAXONOMY, CUSTOM_FIELDS_KEY,
    IGNORED_TAXONOMIES, TAG_TAXONOMY,
};
