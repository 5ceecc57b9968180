//! PostgreSQL storage backend implementation.
//!
//! Uses sqlx for database operations and implements the StorageBackend trait.

use super::memory::{EMAIL_TAKEN, USERNAME_TAKEN};
use super::{StorageError, traits::*};
use crate::models::{Diagram, DiagramFamily, NewDiagram, NewUser, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, avatar_url, created_at, updated_at, is_active";

const DIAGRAM_COLUMNS: &str = "id, user_id, title, diagram_type, render_engine, mermaid_code, \
     excalidraw_data, description, tags, is_public, created_at, updated_at, is_deleted, deleted_at";

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_active: row.is_active,
        }
    }
}

#[derive(FromRow)]
struct DiagramRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    diagram_type: String,
    render_engine: String,
    mermaid_code: Option<String>,
    excalidraw_data: Option<Value>,
    description: Option<String>,
    tags: Option<Json<Vec<String>>>,
    is_public: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<DiagramRow> for Diagram {
    type Error = StorageError;

    fn try_from(row: DiagramRow) -> Result<Self, Self::Error> {
        let family = |raw: &str| {
            raw.parse::<DiagramFamily>()
                .map_err(|e| StorageError::Other(format!("Failed to decode diagram row: {}", e)))
        };

        Ok(Diagram {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            diagram_type: family(&row.diagram_type)?,
            render_engine: family(&row.render_engine)?,
            mermaid_code: row.mermaid_code,
            excalidraw_data: row.excalidraw_data,
            description: row.description,
            tags: row.tags.map(|t| t.0).unwrap_or_default(),
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
        })
    }
}

fn connection_error(e: sqlx::Error) -> StorageError {
    StorageError::ConnectionError(e.to_string())
}

/// Unique violations (SQLSTATE 23505) become `Conflict`, keyed on the constraint name.
fn insert_error(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("23505") {
            let message = match db_err.constraint() {
                Some("uq_users_email") => EMAIL_TAKEN.to_string(),
                Some("uq_users_username") => USERNAME_TAKEN.to_string(),
                _ => db_err.message().to_string(),
            };
            return StorageError::Conflict(message);
        }
    }
    connection_error(e)
}

/// PostgreSQL storage backend implementation.
pub struct PostgresStorageBackend {
    pool: PgPool,
}

impl PostgresStorageBackend {
    /// Create a new PostgreSQL storage backend.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_user(&self, column: &str, value: &str) -> Result<Option<User>, StorageError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(connection_error)?;

        Ok(row.map(User::from))
    }
}

#[async_trait]
impl StorageBackend for PostgresStorageBackend {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StorageError> {
        let user = User::new(new_user);

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, avatar_url, created_at, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar_url)
        .bind(user.created_at)
        .bind(user.is_active)
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, StorageError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(connection_error)?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        self.find_user("email", email).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        self.find_user("username", username).await
    }

    async fn create_diagram(
        &self,
        owner_id: Uuid,
        diagram: NewDiagram,
    ) -> Result<Diagram, StorageError> {
        let diagram = Diagram::new(owner_id, diagram);

        sqlx::query(
            r#"
            INSERT INTO diagrams (
                id, user_id, title, diagram_type, render_engine, mermaid_code,
                excalidraw_data, description, tags, is_public, created_at, is_deleted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(diagram.id)
        .bind(diagram.user_id)
        .bind(&diagram.title)
        .bind(diagram.diagram_type.as_str())
        .bind(diagram.render_engine.as_str())
        .bind(&diagram.mermaid_code)
        .bind(&diagram.excalidraw_data)
        .bind(&diagram.description)
        .bind(Json(&diagram.tags))
        .bind(diagram.is_public)
        .bind(diagram.created_at)
        .bind(diagram.is_deleted)
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(diagram)
    }

    async fn get_diagram(
        &self,
        owner_id: Uuid,
        diagram_id: Uuid,
    ) -> Result<Option<Diagram>, StorageError> {
        let sql = format!(
            "SELECT {} FROM diagrams WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE",
            DIAGRAM_COLUMNS
        );
        let row = sqlx::query_as::<_, DiagramRow>(&sql)
            .bind(diagram_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(connection_error)?;

        row.map(Diagram::try_from).transpose()
    }

    async fn list_diagrams(&self, owner_id: Uuid, page: Page) -> Result<Vec<Diagram>, StorageError> {
        let sql = format!(
            "SELECT {} FROM diagrams WHERE user_id = $1 AND is_deleted = FALSE \
             ORDER BY created_at ASC, id ASC OFFSET $2 LIMIT $3",
            DIAGRAM_COLUMNS
        );
        let rows = sqlx::query_as::<_, DiagramRow>(&sql)
            .bind(owner_id)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(connection_error)?;

        rows.into_iter().map(Diagram::try_from).collect()
    }

    async fn soft_delete_diagram(
        &self,
        owner_id: Uuid,
        diagram_id: Uuid,
    ) -> Result<(), StorageError> {
        let now = Utc::now();

        // COALESCE keeps the first deletion time on repeat deletes
        let result = sqlx::query(
            r#"
            UPDATE diagrams
            SET is_deleted = TRUE,
                deleted_at = COALESCE(deleted_at, $3),
                updated_at = CASE WHEN is_deleted THEN updated_at ELSE $3 END
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(diagram_id)
        .bind(owner_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(connection_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("diagram", diagram_id));
        }
        Ok(())
    }
}
