//! Built-in enrichment stages

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::content::{CustomFieldProvider, TaxonomyProvider};

use super::output::OutputRecord;
use super::result_mapper::EnrichmentStage;

/// Output key of flattened custom fields
pub const CUSTOM_FIELDS_KEY: &str = "acf";

/// Built-in tag taxonomy
pub const TAG_TAXONOMY: &str = "post_tag";

/// Built-in category taxonomy
pub const CATEGORY_TAXONOMY: &str = "category";

/// Taxonomies never attached to output
pub const IGNORED_TAXONOMIES: [&str; 1] = ["post_format"];

/// Output key for a taxonomy's terms
pub fn taxonomy_key(taxonomy: &str) -> String {
    match taxonomy {
        TAG_TAXONOMY => "tags".to_string(),
        CATEGORY_TAXONOMY => "categories".to_string(),
        other => format!("tax_{}", other),
    }
}

/// Attaches custom fields as a flat `name -> value` object under `acf`
///
/// Without a provider the stage is a no-op.
pub struct CustomFieldStage {
    provider: Option<Arc<dyn CustomFieldProvider>>,
}

impl CustomFieldStage {
    pub const NAME: &'static str = "acf";

    pub fn new(provider: Option<Arc<dyn CustomFieldProvider>>) -> Self {
        Self { provider }
    }
}

impl EnrichmentStage for CustomFieldStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, mut record: OutputRecord) -> OutputRecord {
        let (Some(provider), Some(id)) = (&self.provider, record.id()) else {
            return record;
        };

        let Some(fields) = provider.fields(id) else {
            return record;
        };

        let flattened: Map<String, Value> = fields
            .into_iter()
            .map(|field| (field.name, field.value))
            .collect();

        if !flattened.is_empty() {
            record.insert(CUSTOM_FIELDS_KEY, Value::Object(flattened));
        }

        record
    }
}

/// Attaches the terms of every taxonomy of the record's type
pub struct TaxonomyTermsStage {
    taxonomies: Arc<dyn TaxonomyProvider>,
}

impl TaxonomyTermsStage {
    pub const NAME: &'static str = "taxonomy_terms";

    pub fn new(taxonomies: Arc<dyn TaxonomyProvider>) -> Self {
        Self { taxonomies }
    }
}

impl EnrichmentStage for TaxonomyTermsStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, mut record: OutputRecord) -> OutputRecord {
        let (Some(id), Some(post_type)) = (record.id(), record.post_type().map(str::to_string)) else {
            return record;
        };

        for taxonomy in self.taxonomies.taxonomies_for_type(&post_type) {
            if IGNORED_TAXONOMIES.contains(&taxonomy.as_str()) {
                continue;
            }

            let terms = self.taxonomies.terms(id, &taxonomy);
            if terms.is_empty() {
                continue;
            }

            match serde_json::to_value(&terms) {
                Ok(value) => record.insert(taxonomy_key(&taxonomy), value),
                Err(e) => tracing::warn!(id, taxonomy = %taxonomy, error = %e, "failed to serialize terms"),
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FieldObject, HomePermalinks, RawRecord, Term};
    use crate::mapper::output::BASE_FIELDS;
    use crate::mapper::ResultMapper;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Fixture {
        fields: HashMap<u64, Vec<FieldObject>>,
        type_taxonomies: Vec<&'static str>,
        terms: HashMap<(u64, String), Vec<Term>>,
    }

    impl CustomFieldProvider for Fixture {
        fn fields(&self, id: u64) -> Option<Vec<FieldObject>> {
            self.fields.get(&id).cloned()
        }
    }

    impl TaxonomyProvider for Fixture {
        fn taxonomies(&self) -> Vec<String> {
            self.type_taxonomies.iter().map(|s| s.to_string()).collect()
        }

        fn taxonomies_for_type(&self, _post_type: &str) -> Vec<String> {
            self.taxonomies()
        }

        fn terms(&self, id: u64, taxonomy: &str) -> Vec<Term> {
            self.terms
                .get(&(id, taxonomy.to_string()))
                .cloned()
                .unwrap_or_default()
        }
    }

    fn term(id: u64, slug: &str, taxonomy: &str) -> Term {
        Term {
            term_id: id,
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            taxonomy: taxonomy.to_string(),
            description: String::new(),
            parent: 0,
            count: 1,
        }
    }

    fn field(name: &str, value: Value) -> FieldObject {
        FieldObject {
            key: format!("field_{}", name),
            name: name.to_string(),
            label: name.to_string(),
            field_type: "text".to_string(),
            value,
        }
    }

    fn raw_record(id: u64) -> RawRecord {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();

        RawRecord {
            id,
            date: at,
            date_gmt: at,
            modified: at,
            modified_gmt: at,
            guid: String::new(),
            slug: format!("post-{}", id),
            status: "publish".into(),
            post_type: "post".into(),
            title: String::new(),
            content: String::new(),
            author: 1,
            excerpt: String::new(),
            comment_status: "open".into(),
        }
    }

    fn mapper(fixture: Fixture, with_fields: bool) -> ResultMapper {
        let fixture = Arc::new(fixture);
        let provider: Option<Arc<dyn CustomFieldProvider>> = if with_fields {
            Some(fixture.clone() as Arc<dyn CustomFieldProvider>)
        } else {
            None
        };

        ResultMapper::new(
            Arc::new(HomePermalinks::new("https://example.org")),
            vec![
                Arc::new(CustomFieldStage::new(provider)),
                Arc::new(TaxonomyTermsStage::new(fixture)),
            ],
        )
    }

    fn full_fixture() -> Fixture {
        let mut fixture = Fixture {
            type_taxonomies: vec!["category", "post_tag", "post_format", "genre"],
            ..Default::default()
        };
        fixture.fields.insert(
            1,
            vec![field("date", json!("1700000000")), field("venue", json!({"city": "Oslo"}))],
        );
        fixture
            .terms
            .insert((1, "category".into()), vec![term(10, "news", "category")]);
        fixture
            .terms
            .insert((1, "post_tag".into()), vec![term(11, "rust", "post_tag")]);
        fixture
            .terms
            .insert((1, "post_format".into()), vec![term(12, "post-format-video", "post_format")]);
        fixture
            .terms
            .insert((1, "genre".into()), vec![term(13, "jazz", "genre")]);
        fixture
    }

    #[test]
    fn test_taxonomy_key() {
        assert_eq!(taxonomy_key("post_tag"), "tags");
        assert_eq!(taxonomy_key("category"), "categories");
        assert_eq!(taxonomy_key("genre"), "tax_genre");
    }

    #[test]
    fn test_bare_record_has_only_base_fields() {
        let fixture = Fixture {
            type_taxonomies: vec!["category", "post_tag"],
            ..Default::default()
        };
        let record = mapper(fixture, true).map(&raw_record(5));

        assert_eq!(record.keys().collect::<Vec<_>>(), BASE_FIELDS.to_vec());
    }

    #[test]
    fn test_full_enrichment() {
        let record = mapper(full_fixture(), true).map(&raw_record(1));

        assert_eq!(
            record.get("acf"),
            Some(&json!({"date": "1700000000", "venue": {"city": "Oslo"}}))
        );
        assert_eq!(record.get("categories").unwrap()[0]["slug"], "news");
        assert_eq!(record.get("tags").unwrap()[0]["slug"], "rust");
        assert_eq!(record.get("tax_genre").unwrap()[0]["term_id"], 13);
        assert!(!record.contains_key("tax_post_format"));
        assert_eq!(record.len(), BASE_FIELDS.len() + 4);
    }

    #[test]
    fn test_missing_provider_omits_acf() {
        let record = mapper(full_fixture(), false).map(&raw_record(1));

        assert!(!record.contains_key("acf"));
        assert!(record.contains_key("categories"));
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let mapper = mapper(full_fixture(), true);
        let once = mapper.map(&raw_record(1));
        let twice = mapper.enrich(once.clone());

        assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }
}
