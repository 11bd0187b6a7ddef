use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lightyear API",
        version = "0.1.0",
        description = "Document-aware chat assistant: upload relay, conversation sessions and a Gemini model proxy.",
    ),
    paths(
        handlers::health::health_check,
        handlers::upload::upload_document,
        handlers::chat::proxy_chat,
        handlers::sessions::create_session,
        handlers::sessions::get_session,
        handlers::sessions::delete_session,
        handlers::sessions::send_message,
    ),
    components(schemas(
        crate::models::ChatRole,
        crate::models::ChatTurn,
        dto::common::ErrorBody,
        dto::upload::UploadResponse,
        dto::chat::ChatProxyRequest,
        dto::chat::ChatProxyResponse,
        dto::sessions::CreateSessionResponse,
        dto::sessions::SessionResponse,
        dto::sessions::SendMessageResponse,
        handlers::health::HealthData,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "upload", description = "Document text extraction"),
        (name = "chat", description = "Stateless model proxy"),
        (name = "sessions", description = "Server-side chat sessions"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
