use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::conversation::upstream_contents;
use crate::error::{LightyearError, Result};
use crate::llm::api::{Content, GeminiClient, UpstreamRole};
use crate::llm::prompts::document_turn;
use crate::models::ChatTurn;

/// Seam between conversation handling and the hosted model.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends `contents` and returns the reply text. Implementations substitute
    /// the fixed fallback reply when a successful response carries no text.
    async fn generate(&self, contents: &[Content]) -> Result<String>;

    fn model(&self) -> &str;
}

/// Builds upstream requests from chat turns and forwards them to a
/// [`ModelClient`].
#[derive(Clone)]
pub struct LlmProvider {
    client: Arc<dyn ModelClient>,
    persona: Arc<str>,
    api_key_configured: bool,
}

impl LlmProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = GeminiClient::new(config)?;
        Ok(Self {
            client: Arc::new(client),
            persona: Arc::from(config.persona_prompt.as_str()),
            api_key_configured: config.api_key.is_some(),
        })
    }

    pub fn with_client(client: Arc<dyn ModelClient>, persona: &str) -> Self {
        Self {
            client,
            persona: Arc::from(persona),
            api_key_configured: true,
        }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn api_key_configured(&self) -> bool {
        self.api_key_configured
    }

    /// Persona first, then the document (when present and non-blank), then
    /// the caller's turns with `system` dropped and roles remapped.
    pub fn build_contents(&self, turns: &[ChatTurn], document: Option<&str>) -> Vec<Content> {
        let mut contents = Vec::with_capacity(turns.len() + 2);
        contents.push(Content::text(UpstreamRole::User, &*self.persona));

        if let Some(doc) = document.filter(|d| !d.trim().is_empty()) {
            contents.push(Content::text(UpstreamRole::User, document_turn(doc)));
        }

        contents.extend(upstream_contents(turns));
        contents
    }

    pub async fn reply(&self, turns: &[ChatTurn], document: Option<&str>) -> Result<String> {
        if turns.is_empty() {
            return Err(LightyearError::Validation(
                "Chat history is required and should be a non-empty array.".to_string(),
            ));
        }

        let contents = self.build_contents(turns, document);
        tracing::debug!(
            model = self.model(),
            turns = turns.len(),
            contents = contents.len(),
            "Forwarding chat to model"
        );
        self.client.generate(&contents).await
    }
}
