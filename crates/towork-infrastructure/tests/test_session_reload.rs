use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use towork_core::auth::{Role, Session};
use towork_core::session::SessionStore;
use towork_infrastructure::storage::FileKeyValueStore;

fn session(role: Role) -> Session {
    Session {
        token: "tok-42".into(),
        token_type: "Bearer".into(),
        user_id: 42,
        email: "lea@towork.io".into(),
        role,
        first_name: Some("Lea".into()),
        last_name: None,
    }
}

/// Opens the two session files the way a fresh process would.
fn open(dir: &Path) -> SessionStore {
    SessionStore::restore(
        Arc::new(FileKeyValueStore::new(dir.join("session.json"))),
        Arc::new(FileKeyValueStore::new(dir.join("session.ephemeral.json"))),
    )
    .unwrap()
}

#[test]
fn test_remembered_session_survives_reload() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(temp_dir.path());
    store.persist_session(&session(Role::Freelancer), true).unwrap();
    drop(store);

    let reloaded = open(temp_dir.path());
    assert!(reloaded.is_logged_in());
    assert_eq!(reloaded.role(), Some(Role::Freelancer));
    assert_eq!(reloaded.token().as_deref(), Some("tok-42"));
}

#[test]
fn test_session_only_login_reloads_from_ephemeral_scope() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(temp_dir.path());
    store.persist_session(&session(Role::Client), false).unwrap();
    drop(store);

    let reloaded = open(temp_dir.path());
    assert!(reloaded.is_logged_in());
    assert_eq!(reloaded.role(), Some(Role::Client));

    reloaded.logout().unwrap();
    drop(reloaded);
    assert!(!open(temp_dir.path()).is_logged_in());
}

#[test]
fn test_switching_scope_leaves_no_stale_token() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(temp_dir.path());
    store.persist_session(&session(Role::Client), true).unwrap();
    store.persist_session(&session(Role::Admin), false).unwrap();
    drop(store);

    let reloaded = open(temp_dir.path());
    assert_eq!(reloaded.role(), Some(Role::Admin));
}
