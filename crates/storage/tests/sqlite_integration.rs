use mastery_core::model::FileRef;
use storage::repository::{SessionKey, SessionStore};
use storage::sqlite::{SessionId, SqliteSessionStore};
use storage::{load_uploaded_files, save_uploaded_files};

async fn connect(url: &str, session: SessionId) -> SqliteSessionStore {
    let store = SqliteSessionStore::connect_with_session(url, session)
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");
    store
}

#[tokio::test]
async fn sqlite_round_trips_uploaded_files() {
    let store = connect(
        "sqlite:file:memdb_files?mode=memory&cache=shared",
        SessionId::new_random(),
    )
    .await;

    let files = vec![
        FileRef::new("lecture.md", "# Week 1", "text/markdown"),
        FileRef::new("rubric.txt", "10 points", "text/plain"),
    ];
    save_uploaded_files(&store, &files).await.unwrap();

    let loaded = load_uploaded_files(&store).await.unwrap();
    assert_eq!(loaded, Some(files));
}

#[tokio::test]
async fn sqlite_set_overwrites_previous_value() {
    let store = connect(
        "sqlite:file:memdb_overwrite?mode=memory&cache=shared",
        SessionId::new_random(),
    )
    .await;

    store.set(SessionKey::AnswersDocument, "first").await.unwrap();
    store.set(SessionKey::AnswersDocument, "second").await.unwrap();
    assert_eq!(
        store.get(SessionKey::AnswersDocument).await.unwrap().as_deref(),
        Some("second")
    );

    store.remove(SessionKey::AnswersDocument).await.unwrap();
    assert!(store.get(SessionKey::AnswersDocument).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_clear_only_touches_own_session() {
    let url = "sqlite:file:memdb_scoped?mode=memory&cache=shared";
    let first = connect(url, SessionId::new_random()).await;
    let second = connect(url, SessionId::new_random()).await;

    first.set(SessionKey::UploadedFiles, "[]").await.unwrap();
    second.set(SessionKey::UploadedFiles, "[]").await.unwrap();

    first.clear().await.unwrap();
    assert!(first.get(SessionKey::UploadedFiles).await.unwrap().is_none());
    assert!(second.get(SessionKey::UploadedFiles).await.unwrap().is_some());
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let store = connect(
        "sqlite:file:memdb_migrate?mode=memory&cache=shared",
        SessionId::new_random(),
    )
    .await;
    store.migrate().await.expect("second migrate");
}
