mod common;

use async_trait::async_trait;
use futures_util::future::join_all;

use common::SIGNING_KEY;
use rusty_todo::auth::{IdentityContext, TokenManager, UserRole};
use rusty_todo::error::{Result, RustyTodoError};
use rusty_todo::storage::{MemoryStorage, StorageProvider};
use rusty_todo::todos::{Enricher, NoopEnricher, TodoFields, TodoGate};

fn identity(username: &str, user_id: u64) -> IdentityContext {
    let tokens = TokenManager::new(SIGNING_KEY);
    let token = tokens
        .issue(username, user_id, UserRole::User, chrono::Duration::minutes(5))
        .unwrap();
    tokens.validate(&token).unwrap()
}

fn fields(title: &str, description: &str, priority: u8, complete: bool) -> TodoFields {
    TodoFields {
        title: title.to_string(),
        description: description.to_string(),
        priority,
        complete,
    }
}

struct ShoutingEnricher;

#[async_trait]
impl Enricher for ShoutingEnricher {
    async fn enrich(&self, text: &str) -> Result<String> {
        Ok(text.to_uppercase())
    }

    fn enricher_name(&self) -> &'static str {
        "SHOUT"
    }
}

struct BrokenEnricher;

#[async_trait]
impl Enricher for BrokenEnricher {
    async fn enrich(&self, _text: &str) -> Result<String> {
        Err(RustyTodoError::EnrichmentError("service down".to_string()))
    }

    fn enricher_name(&self) -> &'static str {
        "BROKEN"
    }
}

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let storage = MemoryStorage::new();
    let session = storage.open_session().await.unwrap();
    let alice = identity("alice", 1);
    let gate = TodoGate::new(&*session, &alice);

    let id = gate
        .create(fields("Groceries", "milk and eggs", 3, false), &NoopEnricher)
        .await
        .unwrap();

    let todo = gate.get(id).await.unwrap();
    assert_eq!(todo.id, id);
    assert_eq!(todo.title, "Groceries");
    assert_eq!(todo.description, "milk and eggs");
    assert_eq!(todo.priority, 3);
    assert!(!todo.complete);
    assert_eq!(todo.owner_id, 1);
}

#[tokio::test]
async fn test_other_owners_todo_is_not_found() {
    let storage = MemoryStorage::new();
    let session = storage.open_session().await.unwrap();
    let alice = identity("alice", 1);
    let bob = identity("bob", 2);

    let id = TodoGate::new(&*session, &alice)
        .create(fields("Secret", "alice only", 1, false), &NoopEnricher)
        .await
        .unwrap();

    let bob_gate = TodoGate::new(&*session, &bob);

    // Every operation reports the foreign todo exactly like a missing one
    let foreign = bob_gate.get(id).await.unwrap_err();
    let missing = bob_gate.get(id + 100).await.unwrap_err();
    assert!(matches!(foreign, RustyTodoError::NotFound(_)));
    assert_eq!(foreign.to_string(), missing.to_string());

    let update = bob_gate
        .update(id, fields("Hijacked", "bob was here", 5, true))
        .await;
    assert!(matches!(update, Err(RustyTodoError::NotFound(_))));

    let delete = bob_gate.delete(id).await;
    assert!(matches!(delete, Err(RustyTodoError::NotFound(_))));

    // Alice's todo is untouched
    let todo = TodoGate::new(&*session, &alice).get(id).await.unwrap();
    assert_eq!(todo.title, "Secret");
    assert_eq!(todo.priority, 1);
}

#[tokio::test]
async fn test_update_stores_submitted_fields() {
    let storage = MemoryStorage::new();
    let session = storage.open_session().await.unwrap();
    let alice = identity("alice", 1);
    let gate = TodoGate::new(&*session, &alice);

    let id = gate
        .create(fields("Draft", "first version", 1, false), &NoopEnricher)
        .await
        .unwrap();
    gate.update(id, fields("Final", "second version", 4, true))
        .await
        .unwrap();

    let todo = gate.get(id).await.unwrap();
    assert_eq!(todo.title, "Final");
    assert_eq!(todo.description, "second version");
    assert_eq!(todo.priority, 4);
    assert!(todo.complete);
    assert_eq!(todo.owner_id, 1);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let storage = MemoryStorage::new();
    let session = storage.open_session().await.unwrap();
    let alice = identity("alice", 1);
    let gate = TodoGate::new(&*session, &alice);

    let id = gate
        .create(fields("Temporary", "going away", 2, false), &NoopEnricher)
        .await
        .unwrap();
    gate.delete(id).await.unwrap();

    assert!(matches!(gate.get(id).await, Err(RustyTodoError::NotFound(_))));
    assert!(matches!(gate.delete(id).await, Err(RustyTodoError::NotFound(_))));
}

#[tokio::test]
async fn test_interleaved_creates_stay_separated() {
    let storage = MemoryStorage::new();
    let alice = identity("alice", 1);
    let bob = identity("bob", 2);

    let creates = (0..20).map(|i| {
        let storage = &storage;
        let caller = if i % 2 == 0 { &alice } else { &bob };
        async move {
            let session = storage.open_session().await.unwrap();
            TodoGate::new(&*session, caller)
                .create(
                    fields(&format!("Todo {}", i), "interleaved", 2, false),
                    &NoopEnricher,
                )
                .await
                .unwrap()
        }
    });
    let ids = join_all(creates).await;
    assert_eq!(ids.len(), 20);

    let session = storage.open_session().await.unwrap();
    let alice_todos = TodoGate::new(&*session, &alice).list().await.unwrap();
    let bob_todos = TodoGate::new(&*session, &bob).list().await.unwrap();

    assert_eq!(alice_todos.len(), 10);
    assert_eq!(bob_todos.len(), 10);
    assert!(alice_todos.iter().all(|t| t.owner_id == 1));
    assert!(bob_todos.iter().all(|t| t.owner_id == 2));
    drop(session);

    assert_eq!(storage.open_sessions(), 0);
}

#[tokio::test]
async fn test_enriched_description_is_stored() {
    let storage = MemoryStorage::new();
    let session = storage.open_session().await.unwrap();
    let alice = identity("alice", 1);
    let gate = TodoGate::new(&*session, &alice);

    let id = gate
        .create(fields("Call mom", "call mom on sunday", 2, false), &ShoutingEnricher)
        .await
        .unwrap();
    assert_eq!(gate.get(id).await.unwrap().description, "CALL MOM ON SUNDAY");
}

#[tokio::test]
async fn test_enrichment_failure_keeps_original() {
    let storage = MemoryStorage::new();
    let session = storage.open_session().await.unwrap();
    let alice = identity("alice", 1);
    let gate = TodoGate::new(&*session, &alice);

    let id = gate
        .create(fields("Call mom", "call mom on sunday", 2, false), &BrokenEnricher)
        .await
        .unwrap();
    assert_eq!(gate.get(id).await.unwrap().description, "call mom on sunday");
}
