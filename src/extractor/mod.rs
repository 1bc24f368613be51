pub mod cleaner;
pub mod render;

pub use cleaner::extract_text;
pub use render::{Renderer, TemplateRenderer};

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::entities::ContentRecord;

/// Extracted texts for the lifetime of one request.
///
/// Rendering is the expensive step, so each record is rendered at most once
/// per cache. Build a fresh cache per request and drop it afterwards.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    texts: DashMap<Uuid, Arc<str>>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Renders records and reduces the markup to plain text.
pub struct TextExtractor {
    renderer: Arc<dyn Renderer>,
}

impl TextExtractor {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self { renderer }
    }

    /// Plain text of `record`, rendered on first use within `cache`.
    ///
    /// Missing fields simply produce less text. Only a renderer failure is an
    /// error, and failures are not cached.
    pub fn extract(
        &self,
        record: &ContentRecord,
        cache: &ExtractionCache,
    ) -> anyhow::Result<Arc<str>> {
        if let Some(text) = cache.texts.get(&record.id) {
            return Ok(text.clone());
        }

        let markup = self.renderer.render_default(record)?;
        let text: Arc<str> = extract_text(&markup).into();
        debug!(record_id = %record.id, chars = text.len(), "extracted record text");

        cache.texts.insert(record.id, text.clone());
        Ok(text)
    }
}
