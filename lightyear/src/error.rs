use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::processing::ExtractionError;

#[derive(Error, Debug)]
pub enum LightyearError {
    #[error("{0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A message is already being processed for this session")]
    SessionBusy,

    #[error("Extraction error: {0}")]
    Extraction(ExtractionError),

    #[error("Model API returned {status}")]
    Upstream { status: StatusCode, details: Value },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ExtractionError> for LightyearError {
    fn from(error: ExtractionError) -> Self {
        match error {
            ExtractionError::Unsupported(description) => Self::UnsupportedFileType(description),
            other => Self::Extraction(other),
        }
    }
}

impl LightyearError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnsupportedFileType(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::SessionBusy => StatusCode::CONFLICT,
            Self::Upstream { status, .. } => *status,
            Self::Extraction(_) | Self::Http(_) | Self::Json(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Body of the `{error, details}` envelope. Client errors carry no details.
    fn envelope(&self) -> Value {
        match self {
            Self::Extraction(e) => json!({
                "error": "Failed to extract text from document",
                "details": e.to_string(),
            }),
            Self::Upstream { details, .. } => json!({
                "error": "Model API error",
                "details": details,
            }),
            Self::Http(e) => json!({
                "error": "Failed to fetch response from model API",
                "details": e.to_string(),
            }),
            Self::Json(e) => json!({
                "error": "Failed to fetch response from model API",
                "details": e.to_string(),
            }),
            Self::Internal(msg) => json!({
                "error": "Internal server error",
                "details": msg,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl IntoResponse for LightyearError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(self.envelope())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, LightyearError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_has_no_details() {
        let response = LightyearError::Validation("No file uploaded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No file uploaded");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn upstream_error_relays_status_and_details() {
        let response = LightyearError::Upstream {
            status: StatusCode::FORBIDDEN,
            details: json!({"error": {"message": "API key not valid"}}),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Model API error");
        assert_eq!(json["details"]["error"]["message"], "API key not valid");
    }

    #[tokio::test]
    async fn extraction_error_is_internal_with_details() {
        let error: LightyearError = ExtractionError::PdfParse("bad xref".to_string()).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to extract text from document");
        assert!(json["details"].as_str().unwrap().contains("bad xref"));
    }

    #[test]
    fn unsupported_extraction_maps_to_client_error() {
        let error: LightyearError = ExtractionError::Unsupported("image/png".to_string()).into();
        assert!(matches!(error, LightyearError::UnsupportedFileType(_)));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn method_not_allowed_message() {
        let error = LightyearError::MethodNotAllowed("GET".to_string());
        assert_eq!(error.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(error.to_string(), "Method GET not allowed");
    }
}
