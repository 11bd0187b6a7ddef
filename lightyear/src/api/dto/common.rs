use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error envelope returned by every endpoint.
///
/// ```json
/// { "error": "No file uploaded" }
/// { "error": "Model API error", "details": { ... } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    /// Diagnostic payload for server-side and upstream failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}
