//! Authentication context utilities.
//!
//! Provides the extractor that resolves a bearer token to a stored user.

use super::app_state::AppState;
use super::error::ApiError;
use crate::models::User;
use crate::services::jwt_service::JwtService;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Authentication context extracted from request
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user: User,
}

impl AuthContext {
    pub fn user_id(&self) -> uuid::Uuid {
        self.user.id
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_bearer_token)
            .ok_or_else(|| {
                tracing::warn!("No authorization token provided");
                ApiError::unauthorized("Not authenticated")
            })?;

        let claims = state.jwt_service.validate_access_token(token).map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            ApiError::unauthorized("Could not validate credentials")
        })?;

        let user_id = claims.user_id().map_err(|e| {
            tracing::warn!("JWT subject rejected: {}", e);
            ApiError::unauthorized("Could not validate credentials")
        })?;

        let user = state.storage.get_user(user_id).await?.ok_or_else(|| {
            tracing::warn!("Token refers to unknown user {}", user_id);
            ApiError::unauthorized("Could not validate credentials")
        })?;

        if !user.is_active {
            return Err(ApiError::forbidden("Inactive user"));
        }

        Ok(AuthContext { user })
    }
}
