use std::sync::Arc;

use crate::entities::ContentRecord;
use crate::extractor::ExtractionCache;
use crate::measures::{Explanation, ScoreResult};
use crate::suggest::TagSuggester;

/// Binary tag check; untagged records get AI suggestions attached.
pub struct TaxonomyMeasure {
    suggester: Arc<TagSuggester>,
}

impl TaxonomyMeasure {
    pub fn new(suggester: Arc<TagSuggester>) -> Self {
        Self { suggester }
    }

    pub async fn measure(&self, record: &ContentRecord, cache: &ExtractionCache) -> ScoreResult {
        if record.has_tags() {
            return ScoreResult::new(
                1.0,
                Explanation::Success {
                    message: "The node is properly tagged with taxonomy terms.".to_string(),
                },
            );
        }

        let suggestions = self.suggester.suggest(record, cache).await;
        ScoreResult::new(
            0.0,
            Explanation::Untagged {
                message: "No tags are assigned to this node. Please add tags to improve SEO."
                    .to_string(),
                suggestions,
            },
        )
    }
}
