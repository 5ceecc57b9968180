//! Current-user routes.

use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use crate::models::User;

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

pub fn users_router() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// GET /users/me - The authenticated user
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Account is inactive")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(auth: AuthContext) -> Json<UserResponse> {
    Json(UserResponse::from(auth.user))
}
