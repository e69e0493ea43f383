// lodge-client/tests/session.rs
// 凭证文件持久化测试

use std::sync::Arc;

use lodge_client::{ClientConfig, FileTokenStore, Session, TokenStore};
use tempfile::TempDir;

#[test]
fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = FileTokenStore::new(dir.path().join("nested/auth/token.json"));
    assert!(store.load().is_none());

    store.save("tok-1").unwrap();
    assert_eq!(store.load().as_deref(), Some("tok-1"));
    let entry = store.load_entry().unwrap();
    assert!(entry.saved_at > 0);

    store.clear().unwrap();
    assert!(!store.path().exists());
    // clearing twice is fine
    store.clear().unwrap();
}

#[test]
fn test_corrupt_file_reads_as_logged_out() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(FileTokenStore::new(&path).load().is_none());
}

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");

    let first = Session::new(Arc::new(FileTokenStore::new(&path)));
    first.set_token("persisted").unwrap();
    drop(first);

    let second = Session::new(Arc::new(FileTokenStore::new(&path)));
    assert_eq!(second.bearer().as_deref(), Some("Bearer persisted"));

    second.clear().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_reload_picks_up_login_from_another_process() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");
    let session = Session::new(Arc::new(FileTokenStore::new(&path)));
    let mut rx = session.subscribe();
    assert!(!session.is_logged_in());

    FileTokenStore::new(&path).save("other-tab").unwrap();
    assert!(session.reload());
    assert_eq!(rx.borrow_and_update().as_deref(), Some("other-tab"));
}

#[test]
fn test_config_session_uses_token_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");
    let session = ClientConfig::new("http://localhost:4000")
        .with_token("from-env")
        .with_token_file(&path)
        .build_session()
        .unwrap();

    assert!(session.is_logged_in());
    assert_eq!(FileTokenStore::new(&path).load().as_deref(), Some("from-env"));
}
