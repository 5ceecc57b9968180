//! Unit tests for the in-memory storage backend

use genai_flow_api::models::{DiagramFamily, NewDiagram, NewUser};
use genai_flow_api::storage::{MemoryStorageBackend, Page, StorageBackend, StorageError};
use serde_json::json;
use uuid::Uuid;

fn mermaid(title: &str) -> NewDiagram {
    NewDiagram {
        title: title.to_string(),
        diagram_type: Some(DiagramFamily::Mermaid),
        mermaid_code: Some("graph TD\nA-->B".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_user_lookup() {
    let storage = MemoryStorageBackend::new();
    let user = storage
        .create_user(NewUser {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();

    assert!(user.is_active);
    assert_eq!(storage.get_user(user.id).await.unwrap(), Some(user.clone()));
    assert_eq!(
        storage.get_user_by_email("a@x.com").await.unwrap(),
        Some(user.clone())
    );
    assert_eq!(
        storage.get_user_by_username("alice").await.unwrap(),
        Some(user)
    );
    assert_eq!(storage.get_user_by_email("b@x.com").await.unwrap(), None);
}

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let storage = MemoryStorageBackend::new();
    let owner = Uuid::new_v4();

    let created = storage
        .create_diagram(
            owner,
            NewDiagram {
                title: "Board".to_string(),
                diagram_type: Some(DiagramFamily::Excalidraw),
                excalidraw_data: Some(json!({"elements": [{"type": "rectangle"}]})),
                description: Some("sketch".to_string()),
                tags: vec!["draft".to_string()],
                is_public: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(created.render_engine, DiagramFamily::Excalidraw);
    assert!(!created.is_deleted);

    let fetched = storage.get_diagram(owner, created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_reads_are_owner_scoped() {
    let storage = MemoryStorageBackend::new();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let diagram = storage.create_diagram(owner, mermaid("mine")).await.unwrap();

    assert_eq!(storage.get_diagram(stranger, diagram.id).await.unwrap(), None);
    assert!(
        storage
            .list_diagrams(stranger, Page::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_soft_delete_keeps_the_row() {
    let storage = MemoryStorageBackend::new();
    let owner = Uuid::new_v4();
    let diagram = storage.create_diagram(owner, mermaid("doomed")).await.unwrap();

    storage.soft_delete_diagram(owner, diagram.id).await.unwrap();

    assert_eq!(storage.get_diagram(owner, diagram.id).await.unwrap(), None);
    assert!(
        storage
            .list_diagrams(owner, Page::default())
            .await
            .unwrap()
            .is_empty()
    );

    let raw = storage.raw_diagram(diagram.id).await.unwrap();
    assert!(raw.is_deleted);
    let deleted_at = raw.deleted_at.unwrap();
    assert_eq!(raw.title, "doomed");

    // Deleting again succeeds and keeps the first deletion time
    storage.soft_delete_diagram(owner, diagram.id).await.unwrap();
    let raw = storage.raw_diagram(diagram.id).await.unwrap();
    assert_eq!(raw.deleted_at, Some(deleted_at));
}

#[tokio::test]
async fn test_delete_unknown_diagram_is_not_found() {
    let storage = MemoryStorageBackend::new();
    let err = storage
        .soft_delete_diagram(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn test_list_is_ordered_and_paginated() {
    let storage = MemoryStorageBackend::new();
    let owner = Uuid::new_v4();
    for i in 0..5 {
        storage
            .create_diagram(owner, mermaid(&format!("d{}", i)))
            .await
            .unwrap();
    }

    let titles = |diagrams: Vec<genai_flow_api::models::Diagram>| {
        diagrams.into_iter().map(|d| d.title).collect::<Vec<_>>()
    };

    let all = storage.list_diagrams(owner, Page::default()).await.unwrap();
    assert_eq!(titles(all), ["d0", "d1", "d2", "d3", "d4"]);

    let page = storage
        .list_diagrams(owner, Page::new(Some(1), Some(2)))
        .await
        .unwrap();
    assert_eq!(titles(page), ["d1", "d2"]);

    let past_end = storage
        .list_diagrams(owner, Page::new(Some(10), None))
        .await
        .unwrap();
    assert!(past_end.is_empty());
}
