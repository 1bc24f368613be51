#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use seolens::{
    api,
    app_state::{AppState, Collaborators},
    config::Config,
    entities::{ContentRecord, TagRef},
    extractor::{ExtractionCache, TemplateRenderer, TextExtractor},
    llm::{ChatCompletion, ChatRequest, ChatResponse, LlmError},
    repositories::{ContentStore, SortDirection, SortField, VocabularyStore},
    search::{LocalIndex, SimilarityIndex},
};

pub fn record(title: &str, body: &str, day: u32) -> ContentRecord {
    ContentRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content_type: "publication".to_string(),
        author: "Sam Writer".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap(),
        published: true,
        body: body.to_string(),
        description: None,
        metatags: None,
        tags: Vec::new(),
        featured_image: None,
    }
}

pub fn tag(name: &str) -> TagRef {
    TagRef {
        id: Uuid::new_v4(),
        name: name.to_string(),
    }
}

/// Records kept in memory, listed newest first.
pub struct InMemoryContentStore {
    records: Vec<ContentRecord>,
}

impl InMemoryContentStore {
    pub fn new(records: Vec<ContentRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn load_published(
        &self,
        content_type: &str,
        sort_field: SortField,
        sort_dir: SortDirection,
    ) -> Result<Vec<ContentRecord>> {
        let mut records: Vec<ContentRecord> = self
            .records
            .iter()
            .filter(|r| r.published && r.content_type == content_type)
            .cloned()
            .collect();
        match sort_field {
            SortField::Created => records.sort_by_key(|r| r.created_at),
            SortField::Title => records.sort_by(|a, b| a.title.cmp(&b.title)),
        }
        if sort_dir == SortDirection::Desc {
            records.reverse();
        }
        Ok(records)
    }

    async fn load_by_id(&self, id: Uuid) -> Result<Option<ContentRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

pub struct StaticVocabulary(pub Vec<String>);

#[async_trait]
impl VocabularyStore for StaticVocabulary {
    async fn list_terms_by_vocabulary(&self, _name: &str) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Replies with a fixed text and remembers every prompt it was sent.
pub struct ScriptedChat {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        if let Some(message) = request.messages.first() {
            self.prompts.lock().unwrap().push(message.content.clone());
        }
        match &self.reply {
            Some(text) => Ok(ChatResponse { text: text.clone() }),
            None => Err(LlmError::EmptyChoices),
        }
    }
}

/// Local index holding every record, the same way the server seeds it.
pub fn seeded_index(records: &[ContentRecord]) -> LocalIndex {
    let index = LocalIndex::new().unwrap();
    let extractor = TextExtractor::new(Arc::new(TemplateRenderer::new()));
    let cache = ExtractionCache::new();
    for record in records {
        let text = extractor.extract(record, &cache).unwrap();
        index
            .upsert(record.id, &record.title, &record.content_type, &text)
            .unwrap();
    }
    index
}

pub fn test_app(
    records: Vec<ContentRecord>,
    index: Arc<dyn SimilarityIndex>,
    vocabulary: Vec<String>,
    chat: Arc<dyn ChatCompletion>,
) -> Router {
    let config = Config::from_lookup(|key| match key {
        "PUBLIC_BASE_URL" => Some("https://news.example.org".to_string()),
        _ => None,
    })
    .unwrap();
    let state = AppState::new(
        Collaborators {
            content_store: Arc::new(InMemoryContentStore::new(records)),
            vocabulary: Arc::new(StaticVocabulary(vocabulary)),
            index,
            chat,
            renderer: Arc::new(TemplateRenderer::new()),
        },
        &config,
    );
    api::router(state)
}
