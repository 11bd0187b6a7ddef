use serde::Deserialize;
use std::env;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 60 * 60;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Reads a variable, treating an empty or whitespace-only value as unset.
fn non_empty_env(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub upload: UploadConfig,
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Gemini `generateContent` settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    /// Sent as the `key` query parameter. When absent the request is still
    /// made and the upstream authentication failure is relayed to the caller.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Instruction turn prepended to every model call.
    pub persona_prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_file_size: usize,
}

/// Bounds on the in-memory session store.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Creating a session beyond this evicts the least recently active one.
    pub max_sessions: usize,
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_ttl_secs: DEFAULT_SESSION_IDLE_TTL_SECS,
            sweep_interval_secs: 60,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            max_retries: 0,
            persona_prompt: crate::llm::prompts::PERSONA_PROMPT.to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("LIGHTYEAR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("LIGHTYEAR_PORT", 3000),
            },
            llm: LlmConfig {
                model: non_empty_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_key: non_empty_env("GEMINI_API_KEY"),
                base_url: non_empty_env("LLM_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 60),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 0),
                persona_prompt: non_empty_env("LLM_PERSONA_PROMPT")
                    .unwrap_or_else(|| crate::llm::prompts::PERSONA_PROMPT.to_string()),
            },
            upload: UploadConfig {
                max_file_size: parse_env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
            sessions: SessionConfig {
                max_sessions: parse_env_or("SESSION_MAX", DEFAULT_MAX_SESSIONS),
                idle_ttl_secs: parse_env_or("SESSION_IDLE_TTL", DEFAULT_SESSION_IDLE_TTL_SECS),
                sweep_interval_secs: parse_env_or("SESSION_SWEEP_INTERVAL", 60),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
