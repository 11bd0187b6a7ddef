use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_docx, test_state, test_state_with_limit, MultipartBody, StubClient};

use lightyear::api::create_router;

#[tokio::test]
async fn test_text_upload_returns_content() {
    let app = create_router(test_state(Arc::new(StubClient::new())));
    let request = MultipartBody::new()
        .file("file", "lease.txt", "text/plain", b"Lease term: 12 months")
        .into_request("/api/upload");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["content"], "Lease term: 12 months");
}

#[tokio::test]
async fn test_document_field_alias_is_accepted() {
    let app = create_router(test_state(Arc::new(StubClient::new())));
    let request = MultipartBody::new()
        .file("document", "notes.md", "text/markdown", b"# Notes")
        .into_request("/api/upload");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["content"], "# Notes");
}

#[tokio::test]
async fn test_docx_upload() {
    use docx_rs::*;

    let bytes = create_test_docx(|docx| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text("Hello World")))
    });
    let app = create_router(test_state(Arc::new(StubClient::new())));
    let request = MultipartBody::new()
        .file(
            "file",
            "hello.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            &bytes,
        )
        .into_request("/api/upload");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["content"], "Hello World");
}

#[tokio::test]
async fn test_missing_file_is_400() {
    let app = create_router(test_state(Arc::new(StubClient::new())));
    let request = MultipartBody::new()
        .text("message", "no attachment")
        .into_request("/api/upload");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file uploaded");
}

#[tokio::test]
async fn test_second_file_is_400() {
    let app = create_router(test_state(Arc::new(StubClient::new())));
    let request = MultipartBody::new()
        .file("file", "a.txt", "text/plain", b"a")
        .file("file", "b.txt", "text/plain", b"b")
        .into_request("/api/upload");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("one file"));
}

#[tokio::test]
async fn test_unsupported_type_is_400() {
    let app = create_router(test_state(Arc::new(StubClient::new())));
    let request = MultipartBody::new()
        .file("file", "photo.png", "image/png", &[0x89, b'P', b'N', b'G'])
        .into_request("/api/upload");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Unsupported file type"));
}

#[tokio::test]
async fn test_extraction_failure_is_500_with_details() {
    let app = create_router(test_state(Arc::new(StubClient::new())));
    let request = MultipartBody::new()
        .file("file", "broken.pdf", "application/pdf", b"definitely not a pdf")
        .into_request("/api/upload");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to extract text from document");
    assert!(json["details"].is_string());
}

#[tokio::test]
async fn test_file_over_limit_is_400() {
    let app = create_router(test_state_with_limit(Arc::new(StubClient::new()), 16));
    let request = MultipartBody::new()
        .file("file", "big.txt", "text/plain", &[b'x'; 64])
        .into_request("/api/upload");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("File too large"));
}

#[tokio::test]
async fn test_get_is_405() {
    let app = create_router(test_state(Arc::new(StubClient::new())));
    let response = app
        .oneshot(Request::get("/api/upload").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["error"], "Method GET not allowed");
}
