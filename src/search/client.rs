use std::sync::Arc;

use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::search::{SimilarityCandidate, SimilarityIndex};

/// Instruction prepended to every similarity query.
pub const QUERY_PREFIX: &str =
    "Search for pages that could be linked to the page containing the text: ";

/// Fail-soft front for a [`SimilarityIndex`].
///
/// One attempt per call, no retry. Any index failure is logged and reported
/// as "no candidates", which callers read as "no opportunities found".
#[derive(Clone)]
pub struct SimilaritySearchClient {
    index: Arc<dyn SimilarityIndex>,
}

impl SimilaritySearchClient {
    pub fn new(index: Arc<dyn SimilarityIndex>) -> Self {
        Self { index }
    }

    /// Up to `limit` candidates in the order the index ranked them.
    #[instrument(skip_all, fields(limit = limit, text_len = text.len()))]
    pub async fn search(&self, text: &str, limit: usize) -> Vec<SimilarityCandidate> {
        if limit == 0 {
            return Vec::new();
        }

        let query = format!("{QUERY_PREFIX}{text}");
        let hits = match self.index.query(&query, 0, limit).await {
            Ok(hits) => hits,
            Err(e) => {
                error!(error = %e, "Error searching for similar content");
                return Vec::new();
            }
        };

        hits.into_iter()
            .filter_map(|hit| match Uuid::parse_str(&hit.id) {
                Ok(id) => Some(SimilarityCandidate {
                    id,
                    title: hit.title,
                    content_type: hit.content_type,
                    similarity_score: hit.score,
                }),
                Err(_) => {
                    warn!(hit_id = %hit.id, "skipping search hit that is not a content record");
                    None
                }
            })
            .collect()
    }
}
