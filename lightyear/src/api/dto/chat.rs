//! Model proxy request/response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /api/chat`.
///
/// `chat` is kept as raw JSON so that a missing or non-array value can be
/// reported with a precise message instead of a generic decode error.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ChatProxyRequest {
    /// Ordered conversation turns, `[{role, content}, ...]`.
    #[serde(default)]
    #[schema(value_type = Vec<crate::models::ChatTurn>)]
    pub chat: Option<Value>,
    /// Extracted document text, forwarded as an `Uploaded Document:` turn
    /// after the persona preamble.
    #[serde(default)]
    pub document: Option<String>,
}

/// Response for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatProxyResponse {
    pub reply: String,
}
