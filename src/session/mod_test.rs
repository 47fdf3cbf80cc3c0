use super::storage::{MemoryStorage, StoredEntries};
use super::*;

struct FailingStorage;

impl SessionStorage for FailingStorage {
    fn load(&self) -> Result<StoredEntries, StorageError> {
        Err(StorageError::Corrupt { path: "mem".into(), message: "boom".into() })
    }

    fn store(&mut self, _entries: &StoredEntries) -> Result<(), StorageError> {
        Err(StorageError::Corrupt { path: "mem".into(), message: "boom".into() })
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        Err(StorageError::Corrupt { path: "mem".into(), message: "boom".into() })
    }
}

// =============================================================================
// open
// =============================================================================

#[test]
fn open_empty_storage_is_signed_out() {
    let store = SessionStore::open(MemoryStorage::new());
    assert!(!store.is_authenticated());
    assert!(store.token().is_none());
}

#[test]
fn open_restores_persisted_session() {
    let store = SessionStore::open(MemoryStorage::with_entries(StoredEntries::authenticated("abc")));
    assert!(store.is_authenticated());
    assert_eq!(store.token().as_deref(), Some("abc"));
}

#[test]
fn open_ignores_flag_without_token() {
    let entries = StoredEntries { token: Some(String::new()), authenticated: Some("true".into()) };
    let store = SessionStore::open(MemoryStorage::with_entries(entries));
    assert!(!store.is_authenticated());
}

#[test]
fn open_ignores_token_without_flag() {
    let entries = StoredEntries { token: Some("abc".into()), authenticated: None };
    let store = SessionStore::open(MemoryStorage::with_entries(entries));
    assert!(!store.is_authenticated());
    assert!(store.token().is_none());
}

#[test]
fn open_unreadable_storage_is_signed_out() {
    let store = SessionStore::open(FailingStorage);
    assert!(!store.is_authenticated());
}

// =============================================================================
// save / clear
// =============================================================================

#[test]
fn save_marks_authenticated() {
    let store = SessionStore::open(MemoryStorage::new());
    store.save("abc").unwrap();
    assert!(store.is_authenticated());
    assert_eq!(store.token().as_deref(), Some("abc"));
    assert_eq!(store.session().unwrap().token(), "abc");
}

#[test]
fn save_empty_token_is_rejected() {
    let store = SessionStore::open(MemoryStorage::new());
    let err = store.save("").unwrap_err();
    assert!(matches!(err, SessionError::EmptyToken));
    assert!(!store.is_authenticated());
}

#[test]
fn save_storage_failure_leaves_session_untouched() {
    let store = SessionStore::open(FailingStorage);
    assert!(store.save("abc").is_err());
    assert!(!store.is_authenticated());
}

#[test]
fn clear_removes_session() {
    let store = SessionStore::open(MemoryStorage::new());
    store.save("abc").unwrap();
    store.clear().unwrap();
    assert!(!store.is_authenticated());
    assert!(store.token().is_none());
}

#[test]
fn clear_drops_memory_session_even_if_storage_fails() {
    let store = SessionStore::open(FailingStorage);
    assert!(store.clear().is_err());
    assert!(!store.is_authenticated());
}

#[test]
fn session_survives_file_reopen_until_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    SessionStore::open(storage::FileStorage::new(&path))
        .save("abc")
        .unwrap();

    let reopened = SessionStore::open(storage::FileStorage::new(&path));
    assert_eq!(reopened.token().as_deref(), Some("abc"));
    reopened.clear().unwrap();

    let after_logout = SessionStore::open(storage::FileStorage::new(&path));
    assert!(!after_logout.is_authenticated());
}

#[test]
fn debug_output_redacts_token() {
    let store = SessionStore::open(MemoryStorage::new());
    store.save("super-secret").unwrap();
    let rendered = format!("{:?} {:?}", store, store.session().unwrap());
    assert!(!rendered.contains("super-secret"));
}

#[test]
fn readers_never_see_flag_without_token() {
    use std::sync::Arc;

    let store = Arc::new(SessionStore::open(MemoryStorage::new()));
    let writer = {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            for i in 0..200 {
                store.save(&format!("token-{i}")).unwrap();
                store.clear().unwrap();
            }
        })
    };

    for _ in 0..2000 {
        if let Some(session) = store.session() {
            assert!(!session.token().is_empty());
        }
    }
    writer.join().unwrap();
}
