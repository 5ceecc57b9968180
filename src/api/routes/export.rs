//! Export route.
//!
//! SVG comes back as a download. PNG and PDF rendering is done by the client,
//! so those formats only get an acknowledgement.

use axum::{
    Json, Router,
    body::Body,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::services::export_service::{ExportFormat, ExportOutcome, ExportService};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExportRequest {
    pub svg_content: String,
    /// "svg", "png" or "pdf" (case-insensitive)
    pub format: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExportMessage {
    pub success: bool,
    pub message: String,
}

pub fn export_router() -> Router<AppState> {
    Router::new().route("/", post(export_diagram))
}

/// POST /export - Export a rendered diagram
#[utoipa::path(
    post,
    path = "/api/export",
    tag = "Export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "SVG attachment, or an acknowledgement for png/pdf", body = ExportMessage),
        (status = 400, description = "Unsupported export format or invalid request body"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn export_diagram(
    _auth: AuthContext,
    request: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request?;
    let format: ExportFormat = request.format.parse().map_err(ApiError::bad_request)?;

    match ExportService::export(&request.svg_content, format, request.filename.as_deref()) {
        ExportOutcome::File {
            content_type,
            filename,
            bytes,
        } => {
            let disposition = HeaderValue::from_str(&format!("attachment; filename={}", filename))
                .map_err(|_| ApiError::bad_request("Invalid filename"))?;

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, HeaderValue::from_static(content_type))
                .header(header::CONTENT_DISPOSITION, disposition)
                .body(Body::from(bytes))
                .map_err(|e| ApiError::internal(format!("Export failed: {}", e)))
        }
        ExportOutcome::ClientSide { message } => Ok(Json(ExportMessage {
            success: true,
            message,
        })
        .into_response()),
    }
}
