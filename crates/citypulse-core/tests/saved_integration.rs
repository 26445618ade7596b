//! Integration tests for saved events on disk.
//!
//! Drives the synchronizer against the JSON file store through a sign-in,
//! edits, a sign-out and a second session.

use citypulse_core::saved::{JsonFileStore, SavedCollection, SessionState, UserId};
use citypulse_core::{Event, RawEvent, SyncError};

fn event(id: &str, name: &str) -> Event {
    RawEvent {
        id: Some(id.into()),
        name: Some(name.into()),
        time: Some("2025-06-01T18:00:00Z".into()),
        ..Default::default()
    }
    .normalize()
}

#[tokio::test]
async fn test_saved_events_survive_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let alice = UserId::new("alice").unwrap();

    let sync = SavedCollection::new(JsonFileStore::new(dir.path()));
    assert_eq!(
        sync.add(event("a", "Opening Night")).await,
        Err(SyncError::NotAuthenticated)
    );

    sync.sign_in(alice.clone()).await.unwrap();
    sync.add(event("a", "Opening Night")).await.unwrap();
    sync.add(event("b", "Closing Night")).await.unwrap();
    sync.add(event("c", "Matinee")).await.unwrap();

    let pending = sync.prepare_remove("b").unwrap();
    assert_eq!(pending.name(), "Closing Night");
    sync.commit_remove(pending).await.unwrap();

    sync.sign_out();
    assert_eq!(sync.state(), SessionState::SignedOut);
    assert!(sync.is_empty());

    // A fresh process sees the same collection.
    let next = SavedCollection::new(JsonFileStore::new(dir.path()));
    let loaded = next.sign_in(alice).await.unwrap();
    let ids: Vec<_> = loaded.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(loaded["c"].name, "Matinee");
}

#[tokio::test]
async fn test_users_do_not_see_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let sync = SavedCollection::new(JsonFileStore::new(dir.path()));

    sync.sign_in(UserId::new("alice").unwrap()).await.unwrap();
    sync.add(event("a", "Alice's pick")).await.unwrap();

    let loaded = sync.sign_in(UserId::new("bob").unwrap()).await.unwrap();
    assert!(loaded.is_empty());
    assert!(!sync.contains("a"));
}

#[tokio::test]
async fn test_similar_user_ids_stay_separate() {
    let dir = tempfile::tempdir().unwrap();
    let sync = SavedCollection::new(JsonFileStore::new(dir.path()));

    sync.sign_in(UserId::new("a b").unwrap()).await.unwrap();
    sync.add(event("secret", "Private Show")).await.unwrap();

    for other in ["a_b", "a/b", "a%20b"] {
        let loaded = sync.sign_in(UserId::new(other).unwrap()).await.unwrap();
        assert!(loaded.is_empty(), "{other} sees another user's events");
    }

    let loaded = sync.sign_in(UserId::new("a b").unwrap()).await.unwrap();
    assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["secret"]);
}
