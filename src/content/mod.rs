//! # Content Collaborators
//!
//! Record types, the collaborator traits the endpoint consumes, and an
//! in-memory implementation of all of them.

pub mod memory;
pub mod record;
pub mod store;

pub use memory::{ContentFixture, HomePermalinks, MemoryStore, StoredPost, TaxonomyDef};
pub use record::{FieldObject, RawRecord, Term};
pub use store::{
    ContentStore, CustomFieldProvider, PermalinkResolver, QueryPage, StoreError, StoreResult,
    TaxonomyProvider,
};
