//! Saved diagram routes.
//!
//! Every operation is scoped to the authenticated owner. Deleting only flags
//! the row; deleted diagrams disappear from reads.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::models::{Diagram, DiagramFamily, NewDiagram};
use crate::storage::{Page, StorageError};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDiagramRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub title: String,
    pub diagram_type: DiagramFamily,
    #[serde(default)]
    pub mermaid_code: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub excalidraw_data: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiagramResponse {
    pub id: Uuid,
    pub title: String,
    pub diagram_type: DiagramFamily,
    pub render_engine: DiagramFamily,
    pub mermaid_code: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub excalidraw_data: Option<Value>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Diagram> for DiagramResponse {
    fn from(d: Diagram) -> Self {
        Self {
            id: d.id,
            title: d.title,
            diagram_type: d.diagram_type,
            render_engine: d.render_engine,
            mermaid_code: d.mermaid_code,
            excalidraw_data: d.excalidraw_data,
            description: d.description,
            tags: d.tags,
            is_public: d.is_public,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDiagramsQuery {
    /// Rows to skip (default 0)
    pub skip: Option<i64>,
    /// Page size (default 20, at most 100)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteDiagramResponse {
    pub success: bool,
    pub message: String,
}

pub fn diagrams_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_diagrams).post(create_diagram))
        .route("/{diagram_id}", get(get_diagram).delete(delete_diagram))
}

/// POST /diagrams - Save a diagram
#[utoipa::path(
    post,
    path = "/api/diagrams",
    tag = "Diagrams",
    request_body = CreateDiagramRequest,
    responses(
        (status = 201, description = "Diagram saved", body = DiagramResponse),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_diagram(
    State(state): State<AppState>,
    auth: AuthContext,
    request: Result<Json<CreateDiagramRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DiagramResponse>), ApiError> {
    let Json(request) = request?;
    request.validate()?;

    let diagram = state
        .storage
        .create_diagram(
            auth.user_id(),
            NewDiagram {
                title: request.title,
                diagram_type: Some(request.diagram_type),
                mermaid_code: request.mermaid_code,
                excalidraw_data: request.excalidraw_data,
                description: request.description,
                tags: request.tags,
                is_public: request.is_public,
            },
        )
        .await?;

    info!("Created diagram {} for user {}", diagram.id, auth.user_id());
    Ok((StatusCode::CREATED, Json(diagram.into())))
}

/// GET /diagrams - List the caller's diagrams, oldest first
#[utoipa::path(
    get,
    path = "/api/diagrams",
    tag = "Diagrams",
    params(ListDiagramsQuery),
    responses(
        (status = 200, description = "Diagrams", body = Vec<DiagramResponse>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_diagrams(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListDiagramsQuery>,
) -> Result<Json<Vec<DiagramResponse>>, ApiError> {
    let page = Page::new(query.skip, query.limit);
    let diagrams = state.storage.list_diagrams(auth.user_id(), page).await?;

    Ok(Json(diagrams.into_iter().map(DiagramResponse::from).collect()))
}

/// GET /diagrams/{diagram_id} - Fetch one diagram
#[utoipa::path(
    get,
    path = "/api/diagrams/{diagram_id}",
    tag = "Diagrams",
    params(("diagram_id" = Uuid, Path, description = "Diagram id")),
    responses(
        (status = 200, description = "Diagram", body = DiagramResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Diagram not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_diagram(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(diagram_id): Path<Uuid>,
) -> Result<Json<DiagramResponse>, ApiError> {
    let diagram = state
        .storage
        .get_diagram(auth.user_id(), diagram_id)
        .await?
        .ok_or_else(|| StorageError::not_found("diagram", diagram_id))?;

    Ok(Json(diagram.into()))
}

/// DELETE /diagrams/{diagram_id} - Soft-delete a diagram
#[utoipa::path(
    delete,
    path = "/api/diagrams/{diagram_id}",
    tag = "Diagrams",
    params(("diagram_id" = Uuid, Path, description = "Diagram id")),
    responses(
        (status = 200, description = "Diagram deleted", body = DeleteDiagramResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Diagram not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_diagram(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(diagram_id): Path<Uuid>,
) -> Result<Json<DeleteDiagramResponse>, ApiError> {
    state
        .storage
        .soft_delete_diagram(auth.user_id(), diagram_id)
        .await?;

    info!("Deleted diagram {} for user {}", diagram_id, auth.user_id());
    Ok(Json(DeleteDiagramResponse {
        success: true,
        message: "Diagram deleted".to_string(),
    }))
}
