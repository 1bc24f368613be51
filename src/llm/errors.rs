use thiserror::Error;

use crate::llm::LlmProvider;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("invalid chat endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("{provider} requires an API key")]
    MissingApiKey { provider: LlmProvider },

    #[error("client configured for {configured} cannot serve {requested} requests")]
    ProviderMismatch {
        configured: LlmProvider,
        requested: LlmProvider,
    },

    #[error("chat transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat endpoint {url} returned {status}: {snippet}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
        snippet: String,
    },

    #[error("failed to decode chat response: {0}")]
    Decode(String),

    #[error("chat response contained no message")]
    EmptyChoices,
}
