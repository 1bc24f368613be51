//! Non-streaming chat client for OpenAI-compatible and Ollama endpoints.
//!
//! Endpoints derived from the configured base URL:
//! - OpenAI: `POST {endpoint}/v1/chat/completions`
//! - Ollama: `POST {endpoint}/api/chat` with `stream: false`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::llm::{ChatCompletion, ChatMessage, ChatRequest, ChatResponse, LlmError, LlmProvider};
use crate::search::errors::make_snippet;

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    message: Option<OpenAiMessage>,
}

/// Chat client bound to one provider and endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    provider: LlmProvider,
    url: Url,
}

impl HttpChatClient {
    /// Builds a client with a fixed timeout and the provider's auth header.
    pub fn new(
        provider: LlmProvider,
        endpoint: &Url,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(LlmError::InvalidEndpoint(endpoint.to_string()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let path = match provider {
            LlmProvider::OpenAi => {
                let key = api_key.ok_or(LlmError::MissingApiKey { provider })?;
                let value = header::HeaderValue::from_str(&format!("Bearer {key}"))
                    .map_err(|e| LlmError::InvalidEndpoint(format!("invalid API key header: {e}")))?;
                headers.insert(header::AUTHORIZATION, value);
                "v1/chat/completions"
            }
            LlmProvider::Ollama => "api/chat",
        };

        let base = format!("{}/", endpoint.as_str().trim_end_matches('/'));
        let url = Url::parse(&base)
            .and_then(|base| base.join(path))
            .map_err(|e| LlmError::InvalidEndpoint(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()?;

        info!(%provider, %url, timeout_secs, "chat client initialized");

        Ok(Self {
            client,
            provider,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        body: &B,
        started: Instant,
    ) -> Result<reqwest::Response, LlmError> {
        let response = self.client.post(self.url.clone()).json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let snippet = make_snippet(&response.text().await.unwrap_or_default());
        error!(
            %status,
            url = %self.url,
            %snippet,
            latency_ms = started.elapsed().as_millis() as u64,
            "chat endpoint returned non-success status"
        );
        Err(LlmError::HttpStatus {
            status,
            url: self.url.to_string(),
            snippet,
        })
    }
}

#[async_trait]
impl ChatCompletion for HttpChatClient {
    #[instrument(skip_all, fields(provider = %request.provider, model = %request.model))]
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        if request.provider != self.provider {
            return Err(LlmError::ProviderMismatch {
                configured: self.provider,
                requested: request.provider,
            });
        }

        let started = Instant::now();
        debug!(messages = request.messages.len(), "POST {}", self.url);

        let content = match self.provider {
            LlmProvider::OpenAi => {
                let body = OpenAiRequest {
                    model: &request.model,
                    messages: &request.messages,
                };
                let out: OpenAiResponse = self
                    .post(&body, started)
                    .await?
                    .json()
                    .await
                    .map_err(|e| LlmError::Decode(e.to_string()))?;
                out.choices.into_iter().find_map(|c| c.message.content)
            }
            LlmProvider::Ollama => {
                let body = OllamaRequest {
                    model: &request.model,
                    messages: &request.messages,
                    stream: false,
                };
                let out: OllamaResponse = self
                    .post(&body, started)
                    .await?
                    .json()
                    .await
                    .map_err(|e| LlmError::Decode(e.to_string()))?;
                out.message.and_then(|m| m.content)
            }
        };

        let text = content.ok_or(LlmError::EmptyChoices)?;
        info!(
            latency_ms = started.elapsed().as_millis() as u64,
            reply_len = text.len(),
            "chat completion completed"
        );
        Ok(ChatResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_requires_api_key() {
        let endpoint = Url::parse("https://api.openai.com").unwrap();
        let err = HttpChatClient::new(LlmProvider::OpenAi, &endpoint, None, 5).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }

    #[test]
    fn test_endpoint_paths_per_provider() {
        let endpoint = Url::parse("https://api.openai.com/").unwrap();
        let client =
            HttpChatClient::new(LlmProvider::OpenAi, &endpoint, Some("sk-test"), 5).unwrap();
        assert_eq!(
            client.url().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );

        let endpoint = Url::parse("http://localhost:11434").unwrap();
        let client = HttpChatClient::new(LlmProvider::Ollama, &endpoint, None, 5).unwrap();
        assert_eq!(client.url().as_str(), "http://localhost:11434/api/chat");
    }
}
