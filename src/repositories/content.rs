use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::entities::{ContentRecord, TagRef};

/// Columns the published listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Created,
    Title,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            Self::Created => "created_at",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Read access to content records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Published records of one content type in the requested order.
    async fn load_published(
        &self,
        content_type: &str,
        sort_field: SortField,
        sort_dir: SortDirection,
    ) -> Result<Vec<ContentRecord>>;

    async fn load_by_id(&self, id: Uuid) -> Result<Option<ContentRecord>>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<()>;
}

#[derive(Debug, FromRow)]
struct ContentRow {
    id: Uuid,
    title: String,
    content_type: String,
    author: String,
    created_at: DateTime<Utc>,
    published: bool,
    body: String,
    description: Option<String>,
    metatags: Option<String>,
    featured_image: Option<String>,
}

impl ContentRow {
    fn into_record(self, tags: Vec<TagRef>) -> ContentRecord {
        ContentRecord {
            id: self.id,
            title: self.title,
            content_type: self.content_type,
            author: self.author,
            created_at: self.created_at,
            published: self.published,
            body: self.body,
            description: self.description,
            metatags: self.metatags,
            tags,
            featured_image: self.featured_image,
        }
    }
}

#[derive(Debug, FromRow)]
struct TagRow {
    content_id: Uuid,
    id: Uuid,
    name: String,
}

const CONTENT_COLUMNS: &str = "id, title, content_type, author, created_at, published, body, \
     description, metatags, featured_image";

#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tags for every id in `ids`, grouped by record and ordered by name.
    async fn tags_for(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<TagRef>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT ct.content_id, t.id, t.name
            FROM content_tags ct
            JOIN tags t ON t.id = ct.tag_id
            WHERE ct.content_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<TagRef>> = HashMap::new();
        for row in rows {
            grouped.entry(row.content_id).or_default().push(TagRef {
                id: row.id,
                name: row.name,
            });
        }
        Ok(grouped)
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn load_published(
        &self,
        content_type: &str,
        sort_field: SortField,
        sort_dir: SortDirection,
    ) -> Result<Vec<ContentRecord>> {
        // Column and direction come from closed enums, never from input.
        let sql = format!(
            "SELECT {CONTENT_COLUMNS} FROM content_records \
             WHERE content_type = $1 AND published = TRUE \
             ORDER BY {} {}, id",
            sort_field.column(),
            sort_dir.keyword()
        );
        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(content_type)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut tags = self.tags_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let record_tags = tags.remove(&row.id).unwrap_or_default();
                row.into_record(record_tags)
            })
            .collect())
    }

    async fn load_by_id(&self, id: Uuid) -> Result<Option<ContentRecord>> {
        let sql = format!("SELECT {CONTENT_COLUMNS} FROM content_records WHERE id = $1");
        let Some(row) = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let tags = self.tags_for(&[id]).await?.remove(&id).unwrap_or_default();
        Ok(Some(row.into_record(tags)))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
