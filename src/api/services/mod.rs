//! Services module - business logic behind the HTTP routes.

pub mod ai_providers;
pub mod ai_service;
pub mod export_service;
pub mod jwt_service;
pub mod password_service;
pub mod prompt_service;

// Re-export for convenience
pub use ai_providers::{AiError, ProviderAdapter};
pub use ai_service::{AIService, Provider};
pub use export_service::{ExportFormat, ExportOutcome, ExportService};
pub use jwt_service::{AccessToken, Claims, JwtService, SharedJwtService};
pub use prompt_service::PromptSelector;
