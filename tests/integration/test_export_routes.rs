//! Integration tests for diagram export

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use genai_flow_api::config::AppConfig;
use genai_flow_api::routes::{AppState, create_app};
use genai_flow_api::storage::MemoryStorageBackend;
use serde_json::{Value, json};
use std::sync::Arc;

const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="10" height="10"/></svg>"#;

async fn authed_server() -> (TestServer, String) {
    let state =
        AppState::with_storage(AppConfig::default(), Arc::new(MemoryStorageBackend::new()))
            .unwrap();
    let server = TestServer::new(create_app(state)).unwrap();

    server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "email": "a@x.com", "password": "secret123"}))
        .await;
    let token = server
        .post("/api/auth/login")
        .json(&json!({"email": "a@x.com", "password": "secret123"}))
        .await
        .json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    (server, token)
}

#[tokio::test]
async fn test_svg_export_is_attachment() {
    let (server, token) = authed_server().await;

    let response = server
        .post("/api/export")
        .authorization_bearer(&token)
        .json(&json!({"svg_content": SVG, "format": "svg", "filename": "flow.svg"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "image/svg+xml");
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment; filename=flow.svg"
    );
    assert_eq!(response.text(), SVG);
}

#[tokio::test]
async fn test_default_filename_and_case_insensitive_format() {
    let (server, token) = authed_server().await;

    let response = server
        .post("/api/export")
        .authorization_bearer(&token)
        .json(&json!({"svg_content": SVG, "format": "SVG"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment; filename=diagram.svg"
    );
}

#[tokio::test]
async fn test_raster_formats_defer_to_client() {
    let (server, token) = authed_server().await;

    for format in ["png", "pdf", "Pdf"] {
        let response = server
            .post("/api/export")
            .authorization_bearer(&token)
            .json(&json!({"svg_content": SVG, "format": format}))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK, "{}", format);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_unsupported_format_rejected() {
    let (server, token) = authed_server().await;

    let response = server
        .post("/api/export")
        .authorization_bearer(&token)
        .json(&json!({"svg_content": SVG, "format": "gif"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Unsupported export format");
}

#[tokio::test]
async fn test_export_requires_authentication() {
    let (server, _) = authed_server().await;

    let response = server
        .post("/api/export")
        .json(&json!({"svg_content": SVG, "format": "svg"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let (server, _) = authed_server().await;

    let response = server.get("/api/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let doc: Value = response.json();
    for path in [
        "/api/auth/register",
        "/api/auth/login",
        "/api/ai/generate",
        "/api/diagrams/{diagram_id}",
        "/api/export",
    ] {
        assert!(doc["paths"].get(path).is_some(), "missing {}", path);
    }
}

#[tokio::test]
async fn test_missing_svg_content_uses_error_envelope() {
    let (server, token) = authed_server().await;

    let response = server
        .post("/api/export")
        .authorization_bearer(&token)
        .json(&json!({"format": "svg"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}
