//! Model proxy: forwards a caller-assembled conversation to the model API.

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::api::dto::{ChatProxyRequest, ChatProxyResponse, ErrorBody};
use crate::api::extractors::AppJson;
use crate::api::AppState;
use crate::error::{LightyearError, Result};
use crate::models::ChatTurn;

const CHAT_REQUIRED: &str = "Chat history is required and should be a non-empty array.";

fn parse_chat(chat: Option<Value>) -> Result<Vec<ChatTurn>> {
    let Some(Value::Array(items)) = chat else {
        return Err(LightyearError::Validation(CHAT_REQUIRED.to_string()));
    };
    if items.is_empty() {
        return Err(LightyearError::Validation(CHAT_REQUIRED.to_string()));
    }

    serde_json::from_value(Value::Array(items))
        .map_err(|e| LightyearError::Validation(format!("Invalid chat turn: {e}")))
}

/// `POST /api/chat`
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatProxyRequest,
    responses(
        (status = 200, description = "Model reply", body = ChatProxyResponse),
        (status = 400, description = "Missing, empty or malformed chat", body = ErrorBody),
        (status = 405, description = "Method not allowed", body = ErrorBody),
        (status = 500, description = "Transport or parse failure", body = ErrorBody),
    )
)]
pub async fn proxy_chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatProxyRequest>,
) -> Result<Json<ChatProxyResponse>> {
    let turns = parse_chat(req.chat)?;
    let reply = state.llm.reply(&turns, req.document.as_deref()).await?;
    Ok(Json(ChatProxyResponse { reply }))
}
