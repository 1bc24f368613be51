//! Internal-linking opportunities for a single record.
//!
//! Both the backlinks measure and the link-opportunities view go through
//! [`LinkOpportunityFinder`]; they differ only in the limit they ask for and
//! in how they present the candidates.

use std::sync::Arc;

use ammonia::clean_text;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::ContentRecord;
use crate::extractor::{ExtractionCache, TextExtractor};
use crate::search::{SimilarityCandidate, SimilaritySearchClient};

/// Limit used by the link-opportunities view.
pub const DEFAULT_LINK_LIMIT: usize = 10;

/// Outcome of a link search for one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Opportunities {
    /// The record rendered to no text, so nothing was searched.
    NoContent,
    /// Candidates in index rank order, the record itself removed.
    Found(Vec<SimilarityCandidate>),
}

impl Opportunities {
    pub fn into_candidates(self) -> Vec<SimilarityCandidate> {
        match self {
            Self::NoContent => Vec::new(),
            Self::Found(candidates) => candidates,
        }
    }
}

pub struct LinkOpportunityFinder {
    extractor: Arc<TextExtractor>,
    search: SimilaritySearchClient,
}

impl LinkOpportunityFinder {
    pub fn new(extractor: Arc<TextExtractor>, search: SimilaritySearchClient) -> Self {
        Self { extractor, search }
    }

    /// Searches with the record's text and drops the record from the results.
    ///
    /// The limit applies to the index query, so a record that finds itself
    /// gets one candidate fewer.
    pub async fn find(
        &self,
        record: &ContentRecord,
        limit: usize,
        cache: &ExtractionCache,
    ) -> anyhow::Result<Opportunities> {
        let text = self.extractor.extract(record, cache)?;
        if text.is_empty() {
            return Ok(Opportunities::NoContent);
        }
        let candidates = self.search.search(&text, limit).await;
        Ok(Opportunities::Found(exclude_record(candidates, record.id)))
    }
}

/// Removes `record_id` while keeping the rank order of everything else.
pub fn exclude_record(
    candidates: Vec<SimilarityCandidate>,
    record_id: Uuid,
) -> Vec<SimilarityCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.id != record_id)
        .collect()
}

/// Canonical path of a record on the public site.
pub fn node_url(id: Uuid) -> String {
    format!("/node/{id}")
}

/// A candidate shaped for direct rendering or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LinkOpportunity {
    pub id: Uuid,
    pub title: String,
    pub content_type: String,
    pub score: f64,
    pub url: String,
    /// Anchor markup an editor can paste into a body field.
    pub markup: String,
}

impl From<SimilarityCandidate> for LinkOpportunity {
    fn from(candidate: SimilarityCandidate) -> Self {
        let url = node_url(candidate.id);
        let markup = format!(r#"<a href="{}">{}</a>"#, url, clean_text(&candidate.title));
        Self {
            id: candidate.id,
            title: candidate.title,
            content_type: candidate.content_type,
            score: candidate.similarity_score,
            url,
            markup,
        }
    }
}
