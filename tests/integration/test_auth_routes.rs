//! Integration tests for registration, login and the current-user endpoint

use axum::http::StatusCode;
use axum_test::TestServer;
use genai_flow_api::config::AppConfig;
use genai_flow_api::routes::{AppState, create_app};
use genai_flow_api::services::JwtService;
use genai_flow_api::storage::{MemoryStorageBackend, StorageBackend};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

fn test_server() -> (TestServer, Arc<MemoryStorageBackend>) {
    let storage = Arc::new(MemoryStorageBackend::new());
    let state = AppState::with_storage(AppConfig::default(), storage.clone()).unwrap();
    (TestServer::new(create_app(state)).unwrap(), storage)
}

async fn register_alice(server: &TestServer) -> axum_test::TestResponse {
    server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "secret123"
        }))
        .await
}

async fn login(server: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = test_server();

    for path in ["/", "/health"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["status"], "ok");
    }
}

#[tokio::test]
async fn test_register_returns_created_user() {
    let (server, _) = test_server();

    let response = register_alice(&server).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "a@x.com");
    assert!(body["avatar_url"].is_null());
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let (server, _) = test_server();
    register_alice(&server).await;

    let response = register_alice(&server).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Email already registered");
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let (server, _) = test_server();
    register_alice(&server).await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "other@x.com",
            "password": "secret123"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Username already taken");
}

#[tokio::test]
async fn test_register_validation() {
    let (server, _) = test_server();

    let cases = [
        json!({"username": "bob", "email": "not-an-email", "password": "secret123"}),
        json!({"username": "", "email": "b@x.com", "password": "secret123"}),
        json!({"username": "bob", "email": "b@x.com", "password": "short"}),
        json!({"username": "x".repeat(51), "email": "b@x.com", "password": "secret123"}),
    ];
    for case in cases {
        let response = server.post("/api/auth/register").json(&case).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", case);
    }
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let (server, _) = test_server();
    register_alice(&server).await;

    let response = login(&server, "a@x.com", "secret123").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["token_type"], "bearer");

    let response = login(&server, "a@x.com", "wrong-password").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = login(&server, "nobody@x.com", "secret123").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user() {
    let (server, _) = test_server();
    register_alice(&server).await;
    let token = login(&server, "a@x.com", "secret123").await.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get("/api/users/me").authorization_bearer(&token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["username"], "alice");
}

#[tokio::test]
async fn test_current_user_requires_valid_token() {
    let (server, _) = test_server();

    let response = server.get("/api/users/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/users/me")
        .authorization_bearer("not-a-jwt")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // Signed with another secret
    let foreign = JwtService::new("some-other-secret-some-other-secret", 60)
        .generate_access_token(Uuid::new_v4(), "a@x.com")
        .unwrap();
    let response = server
        .get("/api/users/me")
        .authorization_bearer(&foreign.access_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_rejected() {
    let (server, _) = test_server();
    let config = AppConfig::default();
    let token = JwtService::from_config(&config.jwt)
        .generate_access_token(Uuid::new_v4(), "ghost@x.com")
        .unwrap();

    let response = server
        .get("/api/users/me")
        .authorization_bearer(&token.access_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_inactive_user_forbidden() {
    let (server, storage) = test_server();
    let user_id: Uuid = register_alice(&server).await.json::<Value>()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    let token = login(&server, "a@x.com", "secret123").await.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    assert!(storage.set_user_active(user_id, false).await);

    let response = server.get("/api/users/me").authorization_bearer(&token).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_rejects_overlong_email() {
    let (server, storage) = test_server();
    let email = format!("{}@{}.com", "a".repeat(60), "b".repeat(60));
    assert!(email.len() > 100);

    let response = server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "email": email, "password": "secret123"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("email"));
    assert!(storage.get_user_by_email(&email).await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let (server, _) = test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "password": "secret123"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": "a@x.com"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], 400);
}
