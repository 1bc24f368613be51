//! Dashboard rows: one summary per published record, in input order.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::ContentRecord;
use crate::extractor::ExtractionCache;
use crate::measures::{MeasureOutcome, Measures};

/// Display format for the creation date, e.g. `Mar 05, 2025`.
const DATE_FORMAT: &str = "%b %d, %Y";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PublicationSummary {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub author: String,
    pub date: String,
    pub aggregate_score: u8,
    pub image_url: String,
    pub measures: Vec<MeasureOutcome>,
}

pub struct DashboardAggregator {
    measures: Arc<Measures>,
    public_base_url: Url,
}

impl DashboardAggregator {
    pub fn new(measures: Arc<Measures>, public_base_url: Url) -> Self {
        Self {
            measures,
            public_base_url,
        }
    }

    /// Scores every record. A record whose rules fail still gets a row; the
    /// failing rules score zero.
    pub async fn build(
        &self,
        records: &[ContentRecord],
        cache: &ExtractionCache,
    ) -> Vec<PublicationSummary> {
        let started = std::time::Instant::now();
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let report = self.measures.evaluate_all(record, cache).await;
            rows.push(PublicationSummary {
                id: record.id,
                title: record.title.clone(),
                summary: record.description.clone().unwrap_or_default(),
                author: record.author.clone(),
                date: record.created_at.format(DATE_FORMAT).to_string(),
                aggregate_score: report.aggregate_score,
                image_url: self.image_url(record),
                measures: report.measures,
            });
        }
        info!(
            records = rows.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "dashboard built"
        );
        rows
    }

    fn image_url(&self, record: &ContentRecord) -> String {
        let Some(path) = record.featured_image.as_deref().filter(|p| !p.is_empty()) else {
            return String::new();
        };
        match resolve_under(&self.public_base_url, path) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(record_id = %record.id, path, error = %e, "unusable featured image path");
                String::new()
            }
        }
    }
}

/// Resolves `path` beneath the base path of `base`, so `/files/a.png` under
/// `https://host/cms` becomes `https://host/cms/files/a.png`. Absolute URLs
/// are returned as they are.
fn resolve_under(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    if let Ok(absolute) = Url::parse(path) {
        return Ok(absolute);
    }
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path.trim_start_matches('/'))
}
