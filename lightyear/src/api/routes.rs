use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::extractors::method_not_allowed;
use super::{handlers, openapi, AppState};

/// Room for multipart boundaries and text fields on top of the file itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state
        .config
        .upload
        .max_file_size
        .saturating_add(MULTIPART_OVERHEAD);

    let uploads = Router::new()
        .route(
            "/upload",
            post(handlers::upload::upload_document).fallback(method_not_allowed),
        )
        .route(
            "/sessions/{sessionId}/messages",
            post(handlers::sessions::send_message).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/chat",
            post(handlers::chat::proxy_chat).fallback(method_not_allowed),
        )
        .route("/sessions", post(handlers::sessions::create_session))
        .route(
            "/sessions/{sessionId}",
            get(handlers::sessions::get_session).delete(handlers::sessions::delete_session),
        )
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router())
        .merge(uploads);

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::error::Result;
    use crate::llm::{Content, LlmProvider, ModelClient};

    struct EchoClient;

    #[async_trait]
    impl ModelClient for EchoClient {
        async fn generate(&self, contents: &[Content]) -> Result<String> {
            Ok(format!("{} contents", contents.len()))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn test_state() -> AppState {
        let llm = LlmProvider::with_client(Arc::new(EchoClient), "persona");
        AppState::with_llm(Config::default(), llm)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_model() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "echo");
    }

    #[tokio::test]
    async fn get_on_post_only_routes_is_405_with_envelope() {
        for uri in ["/api/upload", "/api/chat", "/api/sessions/abc/messages"] {
            let app = create_router(test_state());
            let response = app
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
            let json = body_json(response).await;
            assert_eq!(json["error"], "Method GET not allowed");
        }
    }

    #[tokio::test]
    async fn chat_proxy_counts_persona_turn() {
        let app = create_router(test_state());
        let body = json!({"chat": [{"role": "user", "content": "hi"}]});
        let response = app
            .oneshot(
                Request::post("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["reply"], "2 contents");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["paths"]["/api/chat"].is_object());
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/sessions/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
