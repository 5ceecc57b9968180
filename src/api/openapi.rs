//! OpenAPI specification definition.
//!
//! Aggregates all route handlers and schemas for OpenAPI documentation generation.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Authentication
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::users::get_current_user,
        // AI
        crate::routes::ai::generate_diagram,
        crate::routes::ai::generation_options,
        // Diagrams
        crate::routes::diagrams::create_diagram,
        crate::routes::diagrams::list_diagrams,
        crate::routes::diagrams::get_diagram,
        crate::routes::diagrams::delete_diagram,
        // Export
        crate::routes::export::export_diagram,
        // OpenAPI
        crate::routes::openapi::serve_openapi_json,
    ),
    components(schemas(
        crate::models::DiagramFamily,
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::LoginRequest,
        crate::routes::auth::TokenResponse,
        crate::routes::users::UserResponse,
        crate::routes::ai::GenerateRequest,
        crate::routes::ai::GenerateResponse,
        crate::routes::ai::GenerationOptions,
        crate::routes::ai::ChartTypeOption,
        crate::routes::diagrams::CreateDiagramRequest,
        crate::routes::diagrams::DiagramResponse,
        crate::routes::diagrams::DeleteDiagramResponse,
        crate::routes::export::ExportRequest,
        crate::routes::export::ExportMessage,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and password login"),
        (name = "Users", description = "Current user"),
        (name = "AI", description = "Diagram generation from natural language"),
        (name = "Diagrams", description = "Saved diagrams"),
        (name = "Export", description = "Diagram export"),
        (name = "OpenAPI", description = "OpenAPI specification"),
    ),
    info(
        title = "GenAI Flow API",
        description = "Generate Mermaid and Excalidraw diagrams from prompts, and save them",
        contact(
            name = "API Support",
            email = "mark@olliver.me.uk"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // Update version to match Cargo.toml version
        openapi.info.version = env!("CARGO_PKG_VERSION").to_string();

        openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::new)
            .add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
    }
}
