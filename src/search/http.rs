//! Client for a Meilisearch-style search service.
//!
//! `POST {base}/indexes/{index}/search` with `q`, `offset`, `limit` and
//! `showRankingScore`. The service embeds the query itself (hybrid or
//! semantic search is configured on the index), so this side only sends text.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

use crate::search::{IndexHit, SearchError, SimilarityIndex, errors::make_snippet};

const USER_AGENT: &str = "seolens/0.1";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    offset: usize,
    limit: usize,
    #[serde(rename = "showRankingScore")]
    show_ranking_score: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "type")]
    content_type: Option<String>,
    #[serde(default, rename = "_rankingScore")]
    ranking_score: Option<f64>,
}

impl SearchHit {
    fn into_index_hit(self) -> Option<IndexHit> {
        let id = match self.id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(IndexHit {
            id,
            title: self.title.unwrap_or_default(),
            content_type: self.content_type.unwrap_or_default(),
            score: self.ranking_score.unwrap_or(0.0),
        })
    }
}

/// Similarity index reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSimilarityIndex {
    search_url: Url,
    api_key: Option<String>,
}

impl HttpSimilarityIndex {
    pub fn new(base_url: &Url, index: &str, api_key: Option<&str>) -> Result<Self, SearchError> {
        let base = format!("{}/", base_url.as_str().trim_end_matches('/'));
        let search_url = Url::parse(&base)?.join(&format!("indexes/{index}/search"))?;
        Ok(Self {
            search_url,
            api_key: api_key.map(str::to_string),
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

#[async_trait]
impl SimilarityIndex for HttpSimilarityIndex {
    #[instrument(skip_all, fields(url = %self.search_url, offset = offset, limit = limit))]
    async fn query(
        &self,
        text: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IndexHit>, SearchError> {
        let started = Instant::now();
        let body = SearchRequest {
            q: text,
            offset,
            limit,
            show_ranking_score: true,
        };

        let mut request = HTTP_CLIENT.post(self.search_url.clone()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let snippet = make_snippet(&response.text().await.unwrap_or_default());
            error!(%status, %snippet, "search index returned non-success status");
            return Err(SearchError::HttpStatus { status, snippet });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        let hits: Vec<IndexHit> = parsed
            .hits
            .into_iter()
            .filter_map(SearchHit::into_index_hit)
            .collect();

        debug!(
            hits = hits.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "search completed"
        );
        Ok(hits)
    }
}
