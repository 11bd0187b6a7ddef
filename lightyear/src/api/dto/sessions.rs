//! Chat session DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ChatTurn;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    pub history: Vec<ChatTurn>,
}

/// Response for `POST /api/sessions/{sessionId}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    /// Content of the assistant turn that was appended (reply or fallback).
    pub reply: String,
    pub history: Vec<ChatTurn>,
}
