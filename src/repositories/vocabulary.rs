use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

/// Source of the controlled tag vocabulary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VocabularyStore: Send + Sync {
    /// Every term name in the named vocabulary.
    async fn list_terms_by_vocabulary(&self, name: &str) -> Result<Vec<String>>;
}

#[derive(Clone)]
pub struct PgVocabularyStore {
    pool: PgPool,
}

impl PgVocabularyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VocabularyStore for PgVocabularyStore {
    async fn list_terms_by_vocabulary(&self, name: &str) -> Result<Vec<String>> {
        let terms = sqlx::query_scalar::<_, String>(
            "SELECT name FROM tags WHERE vocabulary = $1 ORDER BY name",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn setup_test_db() -> Option<PgPool> {
        let database_url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("Skipping database tests: TEST_DATABASE_URL not set");
                return None;
            }
        };

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        Some(pool)
    }

    #[tokio::test]
    async fn test_terms_are_scoped_and_sorted() {
        let Some(pool) = setup_test_db().await else {
            return; // Skip test if database not available
        };
        let vocabulary = format!("vocab-{}", Uuid::new_v4());
        for (vocab, name) in [
            (vocabulary.as_str(), "news"),
            (vocabulary.as_str(), "ai"),
            ("other", "sports"),
        ] {
            sqlx::query(
                "INSERT INTO tags (id, vocabulary, name) VALUES ($1, $2, $3)
                 ON CONFLICT (vocabulary, name) DO NOTHING",
            )
            .bind(Uuid::new_v4())
            .bind(vocab)
            .bind(name)
            .execute(&pool)
            .await
            .expect("Failed to insert tag");
        }

        let terms = PgVocabularyStore::new(pool)
            .list_terms_by_vocabulary(&vocabulary)
            .await
            .expect("Failed to list terms");
        assert_eq!(terms, vec!["ai", "news"]);
    }
}
