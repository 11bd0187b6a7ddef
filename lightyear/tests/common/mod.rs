#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use lightyear::api::AppState;
use lightyear::config::{Config, LlmConfig, ServerConfig, SessionConfig, UploadConfig};
use lightyear::error::{LightyearError, Result};
use lightyear::llm::{Content, LlmProvider, ModelClient};

pub const TEST_PERSONA: &str = "You are a test persona.";
pub const DEFAULT_STUB_REPLY: &str = "stub reply";

/// Build a DOCX in memory with the `docx-rs` builder API.
pub fn create_test_docx<F>(builder_fn: F) -> Vec<u8>
where
    F: FnOnce(docx_rs::Docx) -> docx_rs::Docx,
{
    let docx = builder_fn(docx_rs::Docx::new());
    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).expect("Failed to pack DOCX");
    buffer.into_inner()
}

pub fn test_config(max_file_size: usize) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        llm: LlmConfig {
            api_key: Some("test-key".to_string()),
            persona_prompt: TEST_PERSONA.to_string(),
            ..LlmConfig::default()
        },
        upload: UploadConfig { max_file_size },
        sessions: SessionConfig::default(),
    }
}

/// Scripted outcome for one model call.
pub enum StubReply {
    Text(String),
    Fail(StatusCode),
}

/// In-process [`ModelClient`] that records every request it receives.
#[derive(Default)]
pub struct StubClient {
    replies: Mutex<VecDeque<StubReply>>,
    calls: Mutex<Vec<Vec<Content>>>,
    gate: Option<Gate>,
}

/// Holds a call open until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(replies: Vec<StubReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Gate::default()),
            ..Self::default()
        }
    }

    pub fn gate(&self) -> &Gate {
        self.gate.as_ref().expect("client was not built with a gate")
    }

    pub fn calls(&self) -> Vec<Vec<Content>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for StubClient {
    async fn generate(&self, contents: &[Content]) -> Result<String> {
        self.calls.lock().unwrap().push(contents.to_vec());

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(StubReply::Text(text)) => Ok(text),
            Some(StubReply::Fail(status)) => Err(LightyearError::Upstream {
                status,
                details: Value::String("stubbed failure".to_string()),
            }),
            None => Ok(DEFAULT_STUB_REPLY.to_string()),
        }
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

pub fn test_state(client: Arc<StubClient>) -> AppState {
    test_state_with_limit(client, 1024 * 1024)
}

pub fn test_state_with_limit(client: Arc<StubClient>, max_file_size: usize) -> AppState {
    let llm = LlmProvider::with_client(client, TEST_PERSONA);
    AppState::with_llm(test_config(max_file_size), llm)
}

/// Minimal `multipart/form-data` encoder for router tests.
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "lightyear-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::post(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
