//! Upload relay: multipart file in, extracted text out.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::dto::{ErrorBody, UploadResponse};
use crate::api::extractors::read_upload_form;
use crate::api::AppState;
use crate::error::{LightyearError, Result};

/// `POST /api/upload`
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    request_body(content_type = "multipart/form-data", content = String, description = "Form with exactly one `file` field (`document` is accepted as an alias)"),
    responses(
        (status = 200, description = "Extracted text", body = UploadResponse),
        (status = 400, description = "Missing, duplicate, oversized or unsupported file", body = ErrorBody),
        (status = 405, description = "Method not allowed", body = ErrorBody),
        (status = 500, description = "Extraction failed", body = ErrorBody),
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let form = read_upload_form(multipart?, state.config.upload.max_file_size).await?;

    let document = form
        .file
        .ok_or_else(|| LightyearError::Validation("No file uploaded".to_string()))?;

    let content = state.extractor.extract(document).await?;
    Ok(Json(UploadResponse { content }))
}
