mod api;
pub mod prompts;
mod provider;

pub use api::{extract_reply, Content, GeminiClient, Part, UpstreamRole};
pub use provider::{LlmProvider, ModelClient};
