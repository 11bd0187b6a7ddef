use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::LlmConfig;
use crate::error::{LightyearError, Result};
use crate::llm::prompts::UNPROCESSABLE_REPLY;
use crate::llm::provider::ModelClient;

/// Role labels the `generateContent` API accepts inside `contents`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub role: UpstreamRole,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: UpstreamRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
}

/// Reads `candidates[0].content.parts[0].text`, substituting the fixed
/// fallback when any level is missing or the text is empty.
pub fn extract_reply(body: &Value) -> String {
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .unwrap_or(UNPROCESSABLE_REPLY)
        .to_string()
}

/// HTTP client for Gemini `models/{model}:generateContent`.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_retries: u32,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                LightyearError::Internal(format!("Failed to create model HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn is_retryable(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    async fn backoff(attempt: u32) {
        let delay = Duration::from_millis(100 * 2_u64.pow(attempt));
        tokio::time::sleep(delay).await;
    }

    async fn post_once(&self, contents: &[Content]) -> Result<String> {
        let mut request = self
            .client
            .post(self.endpoint())
            .json(&GenerateContentRequest { contents });
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let details = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));
            return Err(LightyearError::Upstream { status, details });
        }

        let body: Value = serde_json::from_str(&raw)?;
        tracing::debug!(
            candidates = body["candidates"].as_array().map_or(0, Vec::len),
            "Model API response received"
        );
        Ok(extract_reply(&body))
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, contents: &[Content]) -> Result<String> {
        let mut attempt = 0;

        loop {
            match self.post_once(contents).await {
                Ok(reply) => return Ok(reply),
                Err(error) => {
                    let retryable = match &error {
                        LightyearError::Upstream { status, .. } => Self::is_retryable(*status),
                        LightyearError::Http(_) => true,
                        _ => false,
                    };

                    if !retryable || attempt >= self.max_retries {
                        tracing::warn!(
                            model = %self.model,
                            attempts = attempt + 1,
                            error = %error,
                            "Model API call failed"
                        );
                        return Err(error);
                    }

                    tracing::debug!(attempt, error = %error, "Retrying model API call");
                    Self::backoff(attempt).await;
                    attempt += 1;
                }
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
