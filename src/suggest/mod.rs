//! AI-assisted tag suggestions for untagged records.
//!
//! The model only ever proposes; the vocabulary decides. Replies are matched
//! case-insensitively against the allowed terms, anything else is dropped,
//! and the result is capped at [`MAX_SUGGESTIONS`]. The whole flow is
//! best-effort: failures are logged and yield no suggestions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::entities::ContentRecord;
use crate::extractor::{ExtractionCache, TextExtractor};
use crate::llm::{ChatCompletion, ChatMessage, ChatRequest, LlmProvider};
use crate::repositories::VocabularyStore;

pub const MAX_SUGGESTIONS: usize = 5;

/// Longest slice of record text placed in a prompt.
const MAX_PROMPT_TEXT_CHARS: usize = 12_000;

pub struct TagSuggester {
    vocabulary: Arc<dyn VocabularyStore>,
    chat: Arc<dyn ChatCompletion>,
    extractor: Arc<TextExtractor>,
    vocabulary_name: String,
    provider: LlmProvider,
    model: String,
}

impl TagSuggester {
    pub fn new(
        vocabulary: Arc<dyn VocabularyStore>,
        chat: Arc<dyn ChatCompletion>,
        extractor: Arc<TextExtractor>,
        vocabulary_name: impl Into<String>,
        provider: LlmProvider,
        model: impl Into<String>,
    ) -> Self {
        Self {
            vocabulary,
            chat,
            extractor,
            vocabulary_name: vocabulary_name.into(),
            provider,
            model: model.into(),
        }
    }

    /// Up to five vocabulary terms for `record`. Never fails.
    pub async fn suggest(&self, record: &ContentRecord, cache: &ExtractionCache) -> Vec<String> {
        match self.try_suggest(record, cache).await {
            Ok(tags) => tags,
            Err(e) => {
                error!(record_id = %record.id, error = %e, "tag suggestion failed");
                Vec::new()
            }
        }
    }

    async fn try_suggest(
        &self,
        record: &ContentRecord,
        cache: &ExtractionCache,
    ) -> anyhow::Result<Vec<String>> {
        let vocabulary = self
            .vocabulary
            .list_terms_by_vocabulary(&self.vocabulary_name)
            .await?;
        if vocabulary.is_empty() {
            debug!(vocabulary = %self.vocabulary_name, "vocabulary is empty, nothing to suggest");
            return Ok(Vec::new());
        }

        let text = self.extractor.extract(record, cache)?;
        if text.is_empty() {
            debug!(record_id = %record.id, "no text to suggest tags from");
            return Ok(Vec::new());
        }

        let request = ChatRequest {
            provider: self.provider,
            model: self.model.clone(),
            messages: vec![ChatMessage::user(build_prompt(&text, &vocabulary))],
        };
        let response = self.chat.complete(request).await?;

        let tags = parse_suggestions(&response.text, &vocabulary);
        info!(record_id = %record.id, suggested = tags.len(), "tag suggestions ready");
        Ok(tags)
    }
}

/// Single-turn prompt carrying the record text and every allowed tag.
pub fn build_prompt(text: &str, vocabulary: &[String]) -> String {
    let text: String = text.chars().take(MAX_PROMPT_TEXT_CHARS).collect();
    format!(
        "You are helping an editor tag an article.\n\
         Choose up to {MAX_SUGGESTIONS} tags that best describe the article below.\n\
         Only use tags from this list: {}\n\
         Reply with ONLY the chosen tags as a comma-separated list, with no other text.\n\n\
         Article:\n{text}",
        vocabulary.join(", ")
    )
}

/// Vocabulary terms named in `reply`, in reply order.
///
/// Candidates are split on commas and trimmed. A candidate counts only when
/// it equals a term ignoring case, and it is returned in the vocabulary's
/// casing. Duplicates are dropped and at most [`MAX_SUGGESTIONS`] are kept.
pub fn parse_suggestions(reply: &str, vocabulary: &[String]) -> Vec<String> {
    let mut allowed: HashMap<String, &str> = HashMap::with_capacity(vocabulary.len());
    for term in vocabulary {
        allowed.entry(term.to_lowercase()).or_insert(term.as_str());
    }

    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for candidate in reply.split(',') {
        let key = candidate.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if let Some(term) = allowed.get(&key)
            && seen.insert(key)
        {
            tags.push((*term).to_string());
            if tags.len() == MAX_SUGGESTIONS {
                break;
            }
        }
    }
    tags
}
