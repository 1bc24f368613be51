pub mod client;
pub mod errors;
pub mod http;
pub mod local;

pub use client::{QUERY_PREFIX, SimilaritySearchClient};
pub use errors::SearchError;
pub use http::HttpSimilarityIndex;
pub use local::LocalIndex;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// One ranked hit as reported by an index, before it is tied to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub id: String,
    pub title: String,
    pub content_type: String,
    pub score: f64,
}

/// A record the index considers similar to a query, in index rank order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SimilarityCandidate {
    pub id: Uuid,
    pub title: String,
    pub content_type: String,
    pub similarity_score: f64,
}

/// External text/vector index that ranks content against a free-text query.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Top hits for `text`, best first.
    async fn query(
        &self,
        text: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IndexHit>, SearchError>;
}
