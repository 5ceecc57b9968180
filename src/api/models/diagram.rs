use super::enums::DiagramFamily;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved diagram, owned by exactly one user.
///
/// Which payload is meaningful depends on the family: `mermaid_code` for
/// Mermaid diagrams, `excalidraw_data` for Excalidraw ones. Both columns exist
/// for either family and are stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub diagram_type: DiagramFamily,
    pub render_engine: DiagramFamily,
    pub mermaid_code: Option<String>,
    pub excalidraw_data: Option<serde_json::Value>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Caller-supplied fields of a diagram about to be saved.
#[derive(Debug, Clone, Default)]
pub struct NewDiagram {
    pub title: String,
    pub diagram_type: Option<DiagramFamily>,
    pub mermaid_code: Option<String>,
    pub excalidraw_data: Option<serde_json::Value>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
}

impl Diagram {
    /// Build a fresh, not-deleted diagram for `user_id`.
    ///
    /// The render engine always matches the diagram family; a missing family
    /// defaults to Mermaid.
    pub fn new(user_id: Uuid, new_diagram: NewDiagram) -> Self {
        let family = new_diagram.diagram_type.unwrap_or(DiagramFamily::Mermaid);
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: new_diagram.title,
            diagram_type: family,
            render_engine: family,
            mermaid_code: new_diagram.mermaid_code,
            excalidraw_data: new_diagram.excalidraw_data,
            description: new_diagram.description,
            tags: new_diagram.tags,
            is_public: new_diagram.is_public,
            created_at: Utc::now(),
            updated_at: None,
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Flip the soft-delete flag. The row itself is kept.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        if !self.is_deleted {
            self.is_deleted = true;
            self.deleted_at = Some(at);
            self.updated_at = Some(at);
        }
    }
}
