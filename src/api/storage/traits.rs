//! Storage trait definitions for the API storage backends.

use crate::models::{Diagram, NewDiagram, NewUser, User};
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Offset/limit window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    /// Build a page, applying defaults and clamping `limit` to 1..=100.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            skip: skip.unwrap_or(0).max(0),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Storage backend trait for database operations
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Insert a new user. Duplicate email or username is a `Conflict`.
    async fn create_user(&self, user: NewUser) -> Result<User, super::StorageError>;

    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, super::StorageError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, super::StorageError>;

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, super::StorageError>;

    /// Insert a diagram owned by `owner_id`
    async fn create_diagram(
        &self,
        owner_id: Uuid,
        diagram: NewDiagram,
    ) -> Result<Diagram, super::StorageError>;

    /// Get a live (not deleted) diagram belonging to `owner_id`
    async fn get_diagram(
        &self,
        owner_id: Uuid,
        diagram_id: Uuid,
    ) -> Result<Option<Diagram>, super::StorageError>;

    /// List live diagrams of `owner_id`, oldest first
    async fn list_diagrams(
        &self,
        owner_id: Uuid,
        page: Page,
    ) -> Result<Vec<Diagram>, super::StorageError>;

    /// Mark a diagram deleted. The row is kept.
    ///
    /// Fails with `NotFound` only when the owner has no such diagram at all;
    /// deleting an already-deleted diagram succeeds.
    async fn soft_delete_diagram(
        &self,
        owner_id: Uuid,
        diagram_id: Uuid,
    ) -> Result<(), super::StorageError>;
}
