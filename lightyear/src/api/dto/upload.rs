use serde::{Deserialize, Serialize};

/// Response for `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Plain text extracted from the uploaded file.
    pub content: String,
}
