use std::sync::Arc;

use crate::entities::ContentRecord;
use crate::extractor::ExtractionCache;
use crate::links::{LinkOpportunityFinder, Opportunities, node_url};
use crate::measures::{Explanation, LinkItem, ScoreResult};

/// Candidates requested from the index for the dashboard.
pub const BACKLINK_LIMIT: usize = 5;

/// Scores 1.0 when at least one other record is similar enough to link to.
pub struct BacklinksMeasure {
    finder: Arc<LinkOpportunityFinder>,
}

impl BacklinksMeasure {
    pub fn new(finder: Arc<LinkOpportunityFinder>) -> Self {
        Self { finder }
    }

    pub async fn measure(
        &self,
        record: &ContentRecord,
        cache: &ExtractionCache,
    ) -> anyhow::Result<ScoreResult> {
        let candidates = match self.finder.find(record, BACKLINK_LIMIT, cache).await? {
            Opportunities::NoContent => {
                return Ok(ScoreResult::new(
                    0.0,
                    Explanation::Notice {
                        message: "No content available for similarity search.".to_string(),
                    },
                ));
            }
            Opportunities::Found(candidates) => candidates,
        };

        if candidates.is_empty() {
            return Ok(ScoreResult::new(
                0.0,
                Explanation::Notice {
                    message: "No similar content found for backlink opportunities.".to_string(),
                },
            ));
        }

        let items = candidates
            .into_iter()
            .map(|candidate| {
                let score = round2(candidate.similarity_score);
                LinkItem {
                    id: candidate.id,
                    label: format!("{} (Score: {})", candidate.title, score),
                    title: candidate.title,
                    score,
                    url: node_url(candidate.id),
                }
            })
            .collect();

        Ok(ScoreResult::new(1.0, Explanation::Links { items }))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fixtures::record;
    use crate::extractor::{TemplateRenderer, TextExtractor};
    use crate::search::{IndexHit, MockSimilarityIndex, SearchError, SimilaritySearchClient};
    use uuid::Uuid;

    fn measure_with(index: MockSimilarityIndex) -> BacklinksMeasure {
        let extractor = Arc::new(TextExtractor::new(Arc::new(TemplateRenderer::new())));
        let finder = LinkOpportunityFinder::new(extractor, SimilaritySearchClient::new(Arc::new(index)));
        BacklinksMeasure::new(Arc::new(finder))
    }

    fn hit(id: Uuid, title: &str, score: f64) -> IndexHit {
        IndexHit {
            id: id.to_string(),
            title: title.to_string(),
            content_type: "publication".to_string(),
            score,
        }
    }

    #[tokio::test]
    async fn test_links_listed_in_rank_order_without_self() {
        let rec = record("Self");
        let own = rec.id;
        let (y, z) = (Uuid::new_v4(), Uuid::new_v4());

        let mut index = MockSimilarityIndex::new();
        index
            .expect_query()
            .withf(|_, _, limit| *limit == BACKLINK_LIMIT)
            .returning(move |_, _, _| {
                Ok(vec![hit(own, "Self", 0.99), hit(y, "Y", 0.876), hit(z, "Z", 0.5)])
            });

        let result = measure_with(index)
            .measure(&rec, &ExtractionCache::new())
            .await
            .unwrap();

        assert_eq!(result.score, 1.0);
        match result.explanation {
            Explanation::Links { items } => {
                let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
                assert_eq!(ids, vec![y, z]);
                assert_eq!(items[0].label, "Y (Score: 0.88)");
                assert_eq!(items[0].url, format!("/node/{y}"));
            }
            other => panic!("unexpected explanation: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_only_self_found_scores_zero() {
        let rec = record("Lonely");
        let own = rec.id;
        let mut index = MockSimilarityIndex::new();
        index
            .expect_query()
            .returning(move |_, _, _| Ok(vec![hit(own, "Lonely", 1.0)]));

        let result = measure_with(index)
            .measure(&rec, &ExtractionCache::new())
            .await
            .unwrap();
        assert_eq!(result.score, 0.0);
        assert!(matches!(result.explanation, Explanation::Notice { .. }));
    }

    #[tokio::test]
    async fn test_index_failure_scores_zero() {
        let mut index = MockSimilarityIndex::new();
        index
            .expect_query()
            .returning(|_, _, _| Err(SearchError::Decode("bad".into())));

        let result = measure_with(index)
            .measure(&record("Offline"), &ExtractionCache::new())
            .await
            .unwrap();
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.876), 0.88);
        assert_eq!(round2(0.5), 0.5);
    }
}
