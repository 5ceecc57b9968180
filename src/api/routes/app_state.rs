//! Application state management.
//!
//! Defines the AppState struct that holds all shared application state:
//! configuration, the storage backend, and the JWT and AI services.

use crate::config::AppConfig;
use crate::services::ai_service::{AIService, AiError};
use crate::services::jwt_service::JwtService;
use crate::storage::{MemoryStorageBackend, PostgresStorageBackend, StorageBackend, StorageError};
use axum::extract::FromRef;
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Storage backend (PostgreSQL or in-memory)
    pub storage: Arc<dyn StorageBackend>,
    pub jwt_service: Arc<JwtService>,
    pub ai_service: Arc<AIService>,
}

impl AppState {
    /// Build state around an already constructed storage backend.
    pub fn with_storage(
        config: AppConfig,
        storage: Arc<dyn StorageBackend>,
    ) -> Result<Self, AiError> {
        let ai_service = AIService::new(&config.ai)?;
        Ok(Self::from_parts(config, storage, ai_service))
    }

    /// Build state from explicit parts.
    pub fn from_parts(
        config: AppConfig,
        storage: Arc<dyn StorageBackend>,
        ai_service: AIService,
    ) -> Self {
        Self {
            jwt_service: Arc::new(JwtService::from_config(&config.jwt)),
            ai_service: Arc::new(ai_service),
            storage,
            config: Arc::new(config),
        }
    }

    /// Build state with the storage backend selected by configuration.
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let storage = init_storage(config.database_url.as_deref()).await?;
        Ok(Self::with_storage(config, storage)?)
    }
}

/// Initialize the storage backend.
///
/// Connects to PostgreSQL and runs migrations when a database URL is given,
/// otherwise falls back to in-memory storage.
pub async fn init_storage(
    database_url: Option<&str>,
) -> Result<Arc<dyn StorageBackend>, StorageError> {
    let Some(database_url) = database_url else {
        warn!("DATABASE_URL not set; using in-memory storage, data will not persist");
        return Ok(Arc::new(MemoryStorageBackend::new()));
    };

    let pool = sqlx::PgPool::connect(database_url).await.map_err(|e| {
        StorageError::ConnectionError(format!("Failed to connect to database: {}", e))
    })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| StorageError::ConnectionError(format!("Migration failed: {}", e)))?;

    info!("PostgreSQL storage initialized");
    Ok(Arc::new(PostgresStorageBackend::new(pool)))
}

// Allow individual services to be extracted from AppState (for Axum)
impl FromRef<AppState> for Arc<JwtService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.jwt_service.clone()
    }
}

impl FromRef<AppState> for Arc<AIService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ai_service.clone()
    }
}
