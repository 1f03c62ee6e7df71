//! Result mapper
//!
//! Projects store records onto the fixed base shape, then runs the record
//! through every registered [`EnrichmentStage`] in registration order.

use std::sync::Arc;

use serde_json::json;
use tracing::trace;

use crate::content::record::post_datetime;
use crate::content::{PermalinkResolver, RawRecord};

use super::output::OutputRecord;

/// A named step that adds fields to a mapped record
pub trait EnrichmentStage: Send + Sync {
    /// Stage name, used in logs
    fn name(&self) -> &str;

    /// Augment one record
    fn apply(&self, record: OutputRecord) -> OutputRecord;
}

/// Maps raw records into enriched output records
#[derive(Clone)]
pub struct ResultMapper {
    permalinks: Arc<dyn PermalinkResolver>,
    stages: Arc<[Arc<dyn EnrichmentStage>]>,
}

impl ResultMapper {
    pub fn new(permalinks: Arc<dyn PermalinkResolver>, stages: Vec<Arc<dyn EnrichmentStage>>) -> Self {
        Self {
            permalinks,
            stages: stages.into(),
        }
    }

    /// The fixed base projection, before enrichment
    pub fn project(&self, raw: &RawRecord) -> OutputRecord {
        let mut record = OutputRecord::new();

        record.insert("date", json!(post_datetime::format(&raw.date)));
        record.insert("date_gmt", json!(post_datetime::format(&raw.date_gmt)));
        record.insert("guid", json!(raw.guid));
        record.insert("id", json!(raw.id));
        record.insert("link", json!(self.permalinks.resolve(raw)));
        record.insert("modified", json!(post_datetime::format(&raw.modified)));
        record.insert("modified_gmt", json!(post_datetime::format(&raw.modified_gmt)));
        record.insert("slug", json!(raw.slug));
        record.insert("status", json!(raw.status));
        record.insert("type", json!(raw.post_type));
        record.insert("title", json!(raw.title));
        record.insert("content", json!(raw.content));
        record.insert("author", json!(raw.author));
        record.insert("excerpt", json!(raw.excerpt));
        record.insert("comment_status", json!(raw.comment_status));

        record
    }

    /// Run an already-projected record through the enrichment chain
    pub fn enrich(&self, record: OutputRecord) -> OutputRecord {
        self.stages.iter().fold(record, |record, stage| {
            trace!(stage = stage.name(), id = ?record.id(), "applying enrichment stage");
            stage.apply(record)
        })
    }

    /// Project and enrich one record
    pub fn map(&self, raw: &RawRecord) -> OutputRecord {
        self.enrich(self.project(raw))
    }

    /// Names of the registered stages, in order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::HomePermalinks;
    use crate::mapper::output::BASE_FIELDS;
    use chrono::NaiveDate;

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
            guid: format!("https://example.org/?p={}", id),
            slug: "launch-party".into(),
            status: "publish".into(),
            post_type: "event".into(),
            title: "Launch party".into(),
            content: "<p>Join us</p>".into(),
            author: 2,
            excerpt: "Join us".into(),
            comment_status: "closed".into(),
        }
    }

    struct Stamp(&'static str);

    impl EnrichmentStage for Stamp {
        fn name(&self) -> &str {
            self.0
        }

        fn apply(&self, mut record: OutputRecord) -> OutputRecord {
            record.insert(self.0, json!(true));
            record
        }
    }

    fn mapper(stages: Vec<Arc<dyn EnrichmentStage>>) -> ResultMapper {
        ResultMapper::new(Arc::new(HomePermalinks::new("https://example.org")), stages)
    }

    #[test]
    fn test_base_projection() {
        let record = mapper(Vec::new()).map(&raw_record(42));

        assert_eq!(record.keys().collect::<Vec<_>>(), BASE_FIELDS.to_vec());
        assert_eq!(record.get("id"), Some(&json!(42)));
        assert_eq!(record.get("date"), Some(&json!("2024-05-01 12:00:00")));
        assert_eq!(
            record.get("link"),
            Some(&json!("https://example.org/event/launch-party/"))
        );
        assert_eq!(record.get("type"), Some(&json!("event")));
        assert_eq!(record.get("author"), Some(&json!(2)));
        assert_eq!(record.get("comment_status"), Some(&json!("closed")));
    }

    #[test]
    fn test_stages_run_in_order() {
        let mapper = mapper(vec![Arc::new(Stamp("first")), Arc::new(Stamp("second"))]);
        let record = mapper.map(&raw_record(1));

        let keys: Vec<&str> = record.keys().skip(BASE_FIELDS.len()).collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert_eq!(mapper.stage_names(), vec!["first", "second"]);
    }
}
