use std::sync::Arc;

use crate::config::Config;
use crate::conversation::SessionStore;
use crate::error::Result;
use crate::llm::LlmProvider;
use crate::processing::TextExtractor;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: LlmProvider,
    pub extractor: TextExtractor,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let llm = LlmProvider::new(&config.llm)?;
        Ok(Self::with_llm(config, llm))
    }

    /// Builds state around an already-constructed provider, e.g. one backed by
    /// a stub model client.
    pub fn with_llm(config: Config, llm: LlmProvider) -> Self {
        let sessions = SessionStore::new(&config.sessions);
        Self {
            config: Arc::new(config),
            llm,
            extractor: TextExtractor::new(),
            sessions,
        }
    }
}
