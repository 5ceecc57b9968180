//! API routes module - organizes all route handlers.
//!
//! Everything except the health checks is mounted under /api.

pub mod ai;
pub mod app_state;
pub mod auth;
pub mod auth_context;
pub mod diagrams;
pub mod error;
pub mod export;
pub mod openapi;
pub mod users;

use axum::{Router, response::Json, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use app_state::AppState;
pub use auth_context::AuthContext;
pub use error::ApiError;

use crate::middleware::cors::create_cors_layer;

/// Create the main API router combining all route modules
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::auth_router())
        .nest("/users", users::users_router())
        .nest("/ai", ai::ai_router())
        .nest("/diagrams", diagrams::diagrams_router())
        .nest("/export", export::export_router())
        .merge(openapi::openapi_router())
}

/// Build the complete application: health checks, the /api tree, state,
/// request tracing and CORS.
pub fn create_app(state: AppState) -> Router {
    let cors = create_cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .nest("/api", create_api_router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "genai-flow-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
