//! # In-Memory Content Store
//!
//! Loads posts, taxonomies, terms and custom fields from a JSON document and
//! serves them through every collaborator trait. Query evaluation follows the
//! host store's rules: only published posts are visible, ordering by a
//! metadata value drops records without that key, and a negative page size
//! returns everything on one page.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::query::{
    Compare, MetaClause, MetaGroup, MetaNode, MetaType, Order, OrderBy, Query, Relation, TaxClause,
};

use super::record::{FieldObject, RawRecord, Term};
use super::store::{
    ContentStore, CustomFieldProvider, PermalinkResolver, QueryPage, StoreError, StoreResult,
    TaxonomyProvider,
};

/// Status of records visible to queries
pub const PUBLISHED: &str = "publish";

/// Content type wildcard
pub const ANY_TYPE: &str = "any";

/// Page size used when a query asks for zero
const FALLBACK_PAGE_SIZE: u64 = 10;

/// A stored post with its metadata, term assignments and custom fields
#[derive(Debug, Clone, Deserialize)]
pub struct StoredPost {
    #[serde(flatten)]
    pub record: RawRecord,

    /// Custom-field values as stored (strings or numbers)
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,

    /// Taxonomy -> assigned term slugs
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub fields: Vec<FieldObject>,
}

impl StoredPost {
    fn meta_value(&self, key: &str) -> Option<String> {
        self.meta.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// A registered taxonomy
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyDef {
    pub name: String,
    #[serde(default)]
    pub object_types: Vec<String>,
}

/// On-disk content document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFixture {
    #[serde(default)]
    pub posts: Vec<StoredPost>,
    #[serde(default)]
    pub taxonomies: Vec<TaxonomyDef>,
    #[serde(default)]
    pub terms: Vec<Term>,
}

/// Immutable in-memory store
pub struct MemoryStore {
    posts: Vec<StoredPost>,
    by_id: HashMap<u64, usize>,
    taxonomies: Vec<TaxonomyDef>,
    terms: HashMap<(String, String), Term>,
}

impl MemoryStore {
    /// Build a store from a parsed document
    pub fn new(fixture: ContentFixture) -> Self {
        let by_id = fixture
            .posts
            .iter()
            .enumerate()
            .map(|(idx, post)| (post.record.id, idx))
            .collect();

        let terms = fixture
            .terms
            .into_iter()
            .map(|term| ((term.taxonomy.clone(), term.slug.clone()), term))
            .collect();

        Self {
            posts: fixture.posts,
            by_id,
            taxonomies: fixture.taxonomies,
            terms,
        }
    }

    /// Parse a store from a JSON value
    pub fn from_json(value: Value) -> StoreResult<Self> {
        let fixture: ContentFixture = serde_json::from_value(value)
            .map_err(|e| StoreError::Unavailable(format!("invalid content document: {}", e)))?;
        Ok(Self::new(fixture))
    }

    /// Load a store from a JSON file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let fixture: ContentFixture = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Unavailable(format!("invalid content document: {}", e)))?;

        debug!(
            path = %path.display(),
            posts = fixture.posts.len(),
            taxonomies = fixture.taxonomies.len(),
            "loaded content document"
        );
        Ok(Self::new(fixture))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn post(&self, id: u64) -> Option<&StoredPost> {
        self.by_id.get(&id).map(|&idx| &self.posts[idx])
    }

    fn matches_types(post: &StoredPost, types: &[String]) -> bool {
        types
            .iter()
            .any(|t| t == ANY_TYPE || *t == post.record.post_type)
    }

    fn matches_tax(post: &StoredPost, clause: &TaxClause) -> bool {
        post.terms
            .get(&clause.taxonomy)
            .map(|slugs| slugs.iter().any(|s| clause.terms.contains(s)))
            .unwrap_or(false)
    }

    fn matches_group(post: &StoredPost, group: &MetaGroup) -> bool {
        if group.is_empty() {
            return true;
        }

        let mut results = group.nodes().iter().map(|node| match node {
            MetaNode::Group(inner) => Self::matches_group(post, inner),
            MetaNode::Clause(clause) => Self::matches_clause(post, clause),
        });

        match group.relation {
            Relation::And => results.all(|m| m),
            Relation::Or => results.any(|m| m),
        }
    }

    fn matches_clause(post: &StoredPost, clause: &MetaClause) -> bool {
        let Some(stored) = post.meta_value(&clause.key) else {
            return false;
        };

        let ordering = match clause.meta_type {
            MetaType::Numeric => {
                // A side that is not a number never matches
                match (stored.trim().parse::<f64>(), clause.value.trim().parse::<f64>()) {
                    (Ok(a), Ok(b)) => match a.partial_cmp(&b) {
                        Some(ord) => ord,
                        None => return false,
                    },
                    _ => return false,
                }
            }
        };

        match clause.compare {
            Compare::Gte => ordering != Ordering::Less,
            Compare::Lte => ordering != Ordering::Greater,
        }
    }

    /// Compare two posts by a sort key
    fn compare(a: &StoredPost, b: &StoredPost, order_by: &OrderBy) -> Ordering {
        match order_by {
            OrderBy::MetaValue(key) => compare_meta(a.meta_value(key), b.meta_value(key)),
            OrderBy::Field(field) => {
                let (a, b) = (&a.record, &b.record);
                match field.as_str() {
                    "modified" => a.modified.cmp(&b.modified),
                    "id" | "ID" => a.id.cmp(&b.id),
                    "title" => a.title.cmp(&b.title),
                    "name" | "slug" => a.slug.cmp(&b.slug),
                    "type" => a.post_type.cmp(&b.post_type),
                    "author" => a.author.cmp(&b.author),
                    // "date" and anything unrecognised
                    _ => a.date.cmp(&b.date),
                }
            }
        }
    }
}

/// Metadata values sort as strings, numbers included
fn compare_meta(a: Option<String>, b: Option<String>) -> Ordering {
    a.cmp(&b)
}

impl ContentStore for MemoryStore {
    fn execute(&self, query: &Query) -> StoreResult<QueryPage> {
        let mut matched: Vec<&StoredPost> = self
            .posts
            .iter()
            .filter(|p| p.record.status == PUBLISHED)
            .filter(|p| Self::matches_types(p, query.types()))
            .filter(|p| {
                query
                    .tax_query()
                    .clauses()
                    .iter()
                    .all(|c| Self::matches_tax(p, c))
            })
            .filter(|p| Self::matches_group(p, query.meta_query()))
            .collect();

        // Sorting by a metadata value joins on that key
        if let OrderBy::MetaValue(key) = query.order_by() {
            matched.retain(|p| p.meta.contains_key(key));
        }

        matched.sort_by(|a, b| {
            let primary = Self::compare(a, b, query.order_by());
            let primary = match query.order() {
                Order::Asc => primary,
                Order::Desc => primary.reverse(),
            };
            primary.then_with(|| a.record.id.cmp(&b.record.id))
        });

        let total = matched.len() as u64;

        let (records, total_pages) = if query.page_size() < 0 {
            let pages = if total > 0 { 1 } else { 0 };
            (matched, pages)
        } else {
            let size = match query.page_size() {
                0 => FALLBACK_PAGE_SIZE,
                n => n as u64,
            };
            let page = query.page().max(1) as u64;

            // A page past u64 range lies past the last record
            let records = match (page - 1).checked_mul(size) {
                Some(start) => matched
                    .into_iter()
                    .skip(usize::try_from(start).unwrap_or(usize::MAX))
                    .take(usize::try_from(size).unwrap_or(usize::MAX))
                    .collect(),
                None => Vec::new(),
            };
            (records, total.div_ceil(size))
        };

        Ok(QueryPage {
            records: records.into_iter().map(|p| p.record.clone()).collect(),
            total,
            total_pages,
        })
    }
}

impl CustomFieldProvider for MemoryStore {
    fn fields(&self, id: u64) -> Option<Vec<FieldObject>> {
        self.post(id)
            .filter(|p| !p.fields.is_empty())
            .map(|p| p.fields.clone())
    }
}

impl TaxonomyProvider for MemoryStore {
    fn taxonomies(&self) -> Vec<String> {
        self.taxonomies.iter().map(|t| t.name.clone()).collect()
    }

    fn taxonomies_for_type(&self, post_type: &str) -> Vec<String> {
        self.taxonomies
            .iter()
            .filter(|t| t.object_types.iter().any(|o| o == post_type))
            .map(|t| t.name.clone())
            .collect()
    }

    fn terms(&self, id: u64, taxonomy: &str) -> Vec<Term> {
        let Some(slugs) = self.post(id).and_then(|p| p.terms.get(taxonomy)) else {
            return Vec::new();
        };

        slugs
            .iter()
            .filter_map(|slug| self.terms.get(&(taxonomy.to_string(), slug.clone())))
            .cloned()
            .collect()
    }
}

/// Builds permalinks under a site home URL
#[derive(Debug, Clone)]
pub struct HomePermalinks {
    home: String,
}

impl HomePermalinks {
    pub fn new(home: impl Into<String>) -> Self {
        Self {
            home: home.into().trim_end_matches('/').to_string(),
        }
    }
}

impl PermalinkResolver for HomePermalinks {
    fn resolve(&self, record: &RawRecord) -> String {
        if record.post_type == "post" {
            format!("{}/{}/", self.home, record.slug)
        } else {
            format!("{}/{}/{}/", self.home, record.post_type, record.slug)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: u64, post_type: &str, day: u32) -> Value {
        json!({
            "id": id,
            "date": format!("2024-01-{:02} 10:00:00", day),
            "date_gmt": format!("2024-01-{:02} 09:00:00", day),
            "modified": format!("2024-01-{:02} 10:00:00", day),
            "modified_gmt": format!("2024-01-{:02} 09:00:00", day),
            "slug": format!("item-{}", id),
            "type": post_type,
            "title": format!("Item {}", id)
        })
    }

    fn with(mut base: Value, extra: Value) -> Value {
        if let (Some(obj), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                obj.insert(k.clone(), v.clone());
            }
        }
        base
    }

    fn store() -> MemoryStore {
        MemoryStore::from_json(json!({
            "taxonomies": [
                {"name": "category", "object_types": ["post"]},
                {"name": "genre", "object_types": ["event"]}
            ],
            "terms": [
                {"term_id": 1, "name": "News", "slug": "news", "taxonomy": "category"},
                {"term_id": 2, "name": "Jazz", "slug": "jazz", "taxonomy": "genre"}
            ],
            "posts": [
                with(post(1, "post", 3), json!({"terms": {"category": ["news"]}})),
                with(post(2, "post", 1), json!({"status": "draft"})),
                with(post(3, "event", 2), json!({
                    "meta": {"date": "150", "end_date": 180},
                    "terms": {"genre": ["jazz"]}
                })),
                with(post(4, "event", 4), json!({"meta": {"date": "50", "end_date": "120"}})),
                with(post(5, "event", 5), json!({"meta": {"end_date": "500"}})),
                post(6, "page", 6)
            ]
        }))
        .unwrap()
    }

    fn query(types: &[&str]) -> Query {
        Query::new(
            1,
            10,
            OrderBy::field("date"),
            Order::Asc,
            types.iter().map(|t| t.to_string()).collect(),
        )
    }

    fn ids(page: &QueryPage) -> Vec<u64> {
        page.records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_type_filter_and_status() {
        let store = store();
        let page = store.execute(&query(&["post"])).unwrap();
        assert_eq!(ids(&page), vec![1]);

        let page = store.execute(&query(&["post", "event"])).unwrap();
        assert_eq!(ids(&page), vec![3, 1, 4, 5]);

        let page = store.execute(&query(&["any"])).unwrap();
        assert_eq!(page.total, 5);
    }

    #[test]
    fn test_unknown_type_matches_nothing() {
        let page = store().execute(&query(&["podcast"])).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_tax_clause() {
        let mut q = query(&["post", "event"]);
        q.push_tax_clause(TaxClause::slugs("genre", vec!["rock".into(), "jazz".into()]));
        assert_eq!(ids(&store().execute(&q).unwrap()), vec![3]);
    }

    #[test]
    fn test_meta_range_and_meta_ordering() {
        let mut q = query(&["event"]);
        q.push_meta_group(
            MetaGroup::any()
                .with_clause(MetaClause::numeric("date", Compare::Gte, "100"))
                .with_clause(MetaClause::numeric("end_date", Compare::Gte, "100")),
        );
        q.set_order_by(OrderBy::meta_value("date"));
        q.set_order(Order::Desc);

        // Post 5 matches the range but has no "date" key to sort on.
        // "50" sorts after "150" as a string.
        assert_eq!(ids(&store().execute(&q).unwrap()), vec![4, 3]);
    }

    #[test]
    fn test_non_numeric_bound_matches_nothing() {
        let mut q = query(&["event"]);
        q.push_meta_group(MetaGroup::all().with_clause(MetaClause::numeric("date", Compare::Lte, "soon")));
        assert!(store().execute(&q).unwrap().records.is_empty());
    }

    #[test]
    fn test_pagination() {
        let store = store();
        let q = Query::new(2, 3, OrderBy::field("id"), Order::Asc, vec!["any".into()]);
        let page = store.execute(&q).unwrap();
        assert_eq!(ids(&page), vec![5, 6]);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 2);

        let all = Query::new(1, -1, OrderBy::field("id"), Order::Asc, vec!["any".into()]);
        let page = store.execute(&all).unwrap();
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.total_pages, 1);

        let before_first = Query::new(-3, 2, OrderBy::field("id"), Order::Asc, vec!["any".into()]);
        assert_eq!(ids(&store.execute(&before_first).unwrap()), vec![1, 3]);
    }

    #[test]
    fn test_pagination_at_integer_limits() {
        let store = store();

        let far_page = Query::new(i64::MAX, 10, OrderBy::field("id"), Order::Asc, vec!["any".into()]);
        let page = store.execute(&far_page).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 1);

        let huge_size = Query::new(4, i64::MAX, OrderBy::field("id"), Order::Asc, vec!["any".into()]);
        let page = store.execute(&huge_size).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 1);

        let first = Query::new(1, i64::MAX, OrderBy::field("id"), Order::Asc, vec!["any".into()]);
        assert_eq!(ids(&store.execute(&first).unwrap()), vec![1, 3, 4, 5, 6]);
    }

    #[test]
    fn test_taxonomy_provider() {
        let store = store();
        assert_eq!(store.taxonomies(), vec!["category", "genre"]);
        assert_eq!(store.taxonomies_for_type("event"), vec!["genre"]);
        assert!(store.taxonomies_for_type("page").is_empty());

        let terms = store.terms(3, "genre");
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].name, "Jazz");
        assert!(store.terms(1, "genre").is_empty());
        assert!(store.terms(99, "category").is_empty());
    }

    #[test]
    fn test_custom_fields_absent_when_empty() {
        assert!(store().fields(1).is_none());
        assert!(store().fields(99).is_none());
    }

    #[test]
    fn test_permalinks() {
        let links = HomePermalinks::new("https://example.org/");
        let store = store();
        let page = store.execute(&query(&["post", "event"])).unwrap();

        assert_eq!(links.resolve(&page.records[0]), "https://example.org/event/item-3/");
        assert_eq!(links.resolve(&page.records[1]), "https://example.org/item-1/");
    }
}
