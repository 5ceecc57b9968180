//! In-memory storage backend.
//!
//! Used when no database is configured and in tests. Data lives for the
//! lifetime of the process only.

use super::{StorageError, traits::*};
use crate::models::{Diagram, NewDiagram, NewUser, User};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub(crate) const EMAIL_TAKEN: &str = "Email already registered";
pub(crate) const USERNAME_TAKEN: &str = "Username already taken";

/// In-memory storage backend implementation.
#[derive(Default)]
pub struct MemoryStorageBackend {
    users: RwLock<HashMap<Uuid, User>>,
    // Insertion order is creation order
    diagrams: RwLock<Vec<Diagram>>,
}

impl MemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a diagram by id regardless of owner or deletion state.
    pub async fn raw_diagram(&self, diagram_id: Uuid) -> Option<Diagram> {
        self.diagrams
            .read()
            .await
            .iter()
            .find(|d| d.id == diagram_id)
            .cloned()
    }

    /// Set a user's active flag. Returns false if the user does not exist.
    pub async fn set_user_active(&self, user_id: Uuid, active: bool) -> bool {
        match self.users.write().await.get_mut(&user_id) {
            Some(user) => {
                user.is_active = active;
                user.updated_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl StorageBackend for MemoryStorageBackend {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StorageError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(StorageError::Conflict(EMAIL_TAKEN.to_string()));
        }
        if users.values().any(|u| u.username == new_user.username) {
            return Err(StorageError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let user = User::new(new_user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_diagram(
        &self,
        owner_id: Uuid,
        diagram: NewDiagram,
    ) -> Result<Diagram, StorageError> {
        let diagram = Diagram::new(owner_id, diagram);
        self.diagrams.write().await.push(diagram.clone());
        Ok(diagram)
    }

    async fn get_diagram(
        &self,
        owner_id: Uuid,
        diagram_id: Uuid,
    ) -> Result<Option<Diagram>, StorageError> {
        Ok(self
            .diagrams
            .read()
            .await
            .iter()
            .find(|d| d.id == diagram_id && d.user_id == owner_id && !d.is_deleted)
            .cloned())
    }

    async fn list_diagrams(&self, owner_id: Uuid, page: Page) -> Result<Vec<Diagram>, StorageError> {
        Ok(self
            .diagrams
            .read()
            .await
            .iter()
            .filter(|d| d.user_id == owner_id && !d.is_deleted)
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn soft_delete_diagram(
        &self,
        owner_id: Uuid,
        diagram_id: Uuid,
    ) -> Result<(), StorageError> {
        let mut diagrams = self.diagrams.write().await;
        let diagram = diagrams
            .iter_mut()
            .find(|d| d.id == diagram_id && d.user_id == owner_id)
            .ok_or_else(|| StorageError::not_found("diagram", diagram_id))?;

        diagram.mark_deleted(Utc::now());
        Ok(())
    }
}
