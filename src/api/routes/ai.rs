//! AI generation routes.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::models::{ChartType, DiagramFamily, GenerationRequest};

fn default_chart_type() -> Option<String> {
    Some(ChartType::Flowchart.name().to_string())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub prompt: String,
    pub diagram_type: DiagramFamily,
    /// Upstream model; the configured default when omitted
    #[serde(default)]
    pub model: Option<String>,
    /// Mermaid sub-type such as "sequence"; unknown names fall back to "flowchart"
    #[serde(default = "default_chart_type")]
    pub chart_type: Option<String>,
}

/// `code` is set for Mermaid diagrams, `data` for Excalidraw ones.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub success: bool,
    pub diagram_type: DiagramFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChartTypeOption {
    pub id: String,
    pub keyword: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerationOptions {
    pub models: Vec<String>,
    pub default_model: String,
    pub chart_types: Vec<ChartTypeOption>,
}

/// Create the AI service router
pub fn ai_router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate_diagram))
        .route("/options", get(generation_options))
}

/// POST /ai/generate - Generate diagram source from a prompt
#[utoipa::path(
    post,
    path = "/api/ai/generate",
    tag = "AI",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Diagram generated", body = GenerateResponse),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "AI generation failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate_diagram(
    State(state): State<AppState>,
    auth: AuthContext,
    request: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = request?;
    tracing::debug!(user_id = %auth.user_id(), "Generation requested");

    let generation = GenerationRequest {
        prompt: request.prompt,
        diagram_type: request.diagram_type,
        model: request.model,
        chart_type: request.chart_type,
    };
    let result = state.ai_service.generate_diagram(&generation).await?;

    let (code, data) = match result.diagram_type {
        DiagramFamily::Mermaid => (Some(result.content), None),
        DiagramFamily::Excalidraw => (None, Some(result.content)),
    };

    Ok(Json(GenerateResponse {
        success: true,
        diagram_type: result.diagram_type,
        code,
        data,
    }))
}

/// GET /ai/options - Models and chart sub-types a client may offer
#[utoipa::path(
    get,
    path = "/api/ai/options",
    tag = "AI",
    responses(
        (status = 200, description = "Generation options", body = GenerationOptions),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn generation_options(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Json<GenerationOptions> {
    let ai = &state.config.ai;
    let mut models = vec![ai.chat_model.clone(), ai.gemini_model.clone()];
    models.dedup();

    Json(GenerationOptions {
        models,
        default_model: state.ai_service.default_model().to_string(),
        chart_types: ChartType::ALL
            .iter()
            .map(|c| ChartTypeOption {
                id: c.name().to_string(),
                keyword: c.keyword().to_string(),
            })
            .collect(),
    })
}
