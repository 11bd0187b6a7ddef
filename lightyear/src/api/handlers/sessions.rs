//! Server-side chat sessions: the conversation assembler behind HTTP.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::{CreateSessionResponse, ErrorBody, SendMessageResponse, SessionResponse};
use crate::api::extractors::read_upload_form;
use crate::api::AppState;
use crate::error::{LightyearError, Result};

const MAX_SESSION_ID_LEN: usize = 64;

fn validate_session_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(LightyearError::Validation(format!(
            "Session id must be 1-{MAX_SESSION_ID_LEN} characters of [A-Za-z0-9_-]"
        )))
    }
}

/// `POST /api/sessions`
#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "sessions",
    responses(
        (status = 201, description = "Session created", body = CreateSessionResponse),
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session = state.sessions.create().await;
    tracing::info!(session_id = session.id(), "Chat session created");
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id().to_string(),
        }),
    )
}

/// `GET /api/sessions/{sessionId}`
#[utoipa::path(
    get,
    path = "/api/sessions/{sessionId}",
    tag = "sessions",
    params(("sessionId" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session history", body = SessionResponse),
        (status = 404, description = "Unknown session", body = ErrorBody),
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| LightyearError::NotFound(format!("Session {session_id}")))?;

    Ok(Json(SessionResponse {
        session_id: session.id().to_string(),
        created_at: session.created_at(),
        history: session.history().await,
    }))
}

/// `DELETE /api/sessions/{sessionId}`
#[utoipa::path(
    delete,
    path = "/api/sessions/{sessionId}",
    tag = "sessions",
    params(("sessionId" = String, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Unknown session", body = ErrorBody),
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode> {
    if state.sessions.remove(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(LightyearError::NotFound(format!("Session {session_id}")))
    }
}

/// `POST /api/sessions/{sessionId}/messages`
///
/// Uploads (optionally), assembles the user turn, calls the model and
/// appends the reply. The session is created if it does not exist yet.
#[utoipa::path(
    post,
    path = "/api/sessions/{sessionId}/messages",
    tag = "sessions",
    params(("sessionId" = String, Path, description = "Session ID")),
    request_body(content_type = "multipart/form-data", content = String, description = "Optional `message` text field and optional `file` field"),
    responses(
        (status = 200, description = "Reply appended", body = SendMessageResponse),
        (status = 400, description = "Empty message, bad session id, or unsupported file", body = ErrorBody),
        (status = 409, description = "A send is already in flight for this session", body = ErrorBody),
        (status = 500, description = "Extraction failed", body = ErrorBody),
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<SendMessageResponse>> {
    validate_session_id(&session_id)?;
    let form = read_upload_form(multipart?, state.config.upload.max_file_size).await?;

    let session = state.sessions.get_or_create(&session_id).await;
    let outcome = session
        .send(
            form.message.as_deref().unwrap_or_default(),
            form.file,
            &state.extractor,
            &state.llm,
        )
        .await?;

    Ok(Json(SendMessageResponse {
        reply: outcome.reply.content,
        history: outcome.history,
    }))
}
