use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// A taxonomy term attached to a content record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagRef {
    pub id: Uuid,
    pub name: String,
}

/// A single publishable item as loaded from the content store.
///
/// Records are read-only here. The plain-text body is never stored on the
/// record; it is derived on demand by [`crate::extractor::TextExtractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: Uuid,
    pub title: String,
    pub content_type: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub published: bool,
    /// Body markup as authored.
    pub body: String,
    /// Editorial summary shown on the dashboard.
    pub description: Option<String>,
    /// Raw JSON blob holding metatag and schema.org values.
    pub metatags: Option<String>,
    pub tags: Vec<TagRef>,
    /// Path of the featured image relative to the public site.
    pub featured_image: Option<String>,
}

impl ContentRecord {
    /// Decoded metatags blob.
    ///
    /// `None` when the field is empty. A blob that fails to decode, or that
    /// decodes to something other than an object, yields an empty map.
    pub fn metatags_map(&self) -> Option<Map<String, Value>> {
        let raw = self.metatags.as_deref().filter(|raw| !raw.is_empty())?;
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(map),
            _ => Some(Map::new()),
        }
    }

    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }
}
