use thiserror::Error;

/// Failures talking to a similarity index.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("search transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search index returned {status}: {snippet}")]
    HttpStatus {
        status: reqwest::StatusCode,
        snippet: String,
    },

    #[error("failed to decode search response: {0}")]
    Decode(String),

    #[error("local index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    #[error("local index writer unavailable")]
    WriterPoisoned,
}

/// Keeps logged response bodies short.
pub(crate) fn make_snippet(body: &str) -> String {
    const MAX: usize = 300;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(MAX).collect();
        format!("{head}…")
    }
}
