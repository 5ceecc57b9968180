//! Authentication routes: account registration and password login.
//!
//! Login issues a time-scoped JWT access token; there is no refresh flow.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::app_state::AppState;
use super::error::ApiError;
use super::users::UserResponse;
use crate::models::NewUser;
use crate::services::password_service::{hash_password, verify_against_dummy, verify_password};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub username: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 100, message = "must be at most 100 characters")
    )]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "bearer"
    pub token_type: String,
}

/// Create the authentication router
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// POST /auth/register - Create a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation failed, or email or username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(request) = request?;
    request.validate()?;

    if state.storage.get_user_by_email(&request.email).await?.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }
    if state
        .storage
        .get_user_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request("Username already taken"));
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        warn!("Password hashing failed: {}", e);
        ApiError::internal("Failed to create account")
    })?;

    let user = state
        .storage
        .create_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        })
        .await?;

    info!("Registered user {} ({})", user.username, user.id);
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /auth/login - Exchange email and password for an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = request?;
    let rejected = || ApiError::unauthorized("Incorrect email or password");

    let Some(user) = state.storage.get_user_by_email(&request.email).await? else {
        verify_against_dummy(&request.password);
        return Err(rejected());
    };

    let password_ok = verify_password(&request.password, &user.password_hash).map_err(|e| {
        warn!("Stored password hash for user {} is unreadable: {}", user.id, e);
        rejected()
    })?;
    if !password_ok {
        return Err(rejected());
    }

    let token = state
        .jwt_service
        .generate_access_token(user.id, &user.email)
        .map_err(|e| {
            warn!("Token generation failed: {}", e);
            ApiError::internal("Failed to issue access token")
        })?;

    Ok(Json(TokenResponse {
        access_token: token.access_token,
        token_type: "bearer".to_string(),
    }))
}
