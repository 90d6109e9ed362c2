//! Typed accessors for the JSON payloads kept in the session store.

use mastery_core::model::FileRef;

use crate::repository::{SessionKey, SessionStore, StorageError};

/// Load the uploaded files, or `None` when nothing was stored yet.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the payload is not a JSON array of files.
pub async fn load_uploaded_files(
    store: &dyn SessionStore,
) -> Result<Option<Vec<FileRef>>, StorageError> {
    let Some(raw) = store.get(SessionKey::UploadedFiles).await? else {
        return Ok(None);
    };
    let files: Vec<FileRef> =
        serde_json::from_str(&raw).map_err(|err| StorageError::Serialization(err.to_string()))?;
    tracing::debug!(count = files.len(), "loaded uploaded files from session");
    Ok(Some(files))
}

/// # Errors
///
/// Returns `StorageError` if the payload cannot be encoded or written.
pub async fn save_uploaded_files(
    store: &dyn SessionStore,
    files: &[FileRef],
) -> Result<(), StorageError> {
    let raw =
        serde_json::to_string(files).map_err(|err| StorageError::Serialization(err.to_string()))?;
    store.set(SessionKey::UploadedFiles, &raw).await
}

/// # Errors
///
/// Returns `StorageError::Serialization` if the payload is not a JSON file ref.
pub async fn load_answers_document(
    store: &dyn SessionStore,
) -> Result<Option<FileRef>, StorageError> {
    let Some(raw) = store.get(SessionKey::AnswersDocument).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StorageError::Serialization(err.to_string()))
}

/// # Errors
///
/// Returns `StorageError` if the payload cannot be encoded or written.
pub async fn save_answers_document(
    store: &dyn SessionStore,
    document: &FileRef,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(document)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    store.set(SessionKey::AnswersDocument, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemorySessionStore;

    #[tokio::test]
    async fn uploaded_files_round_trip_through_store() {
        let store = InMemorySessionStore::new();
        assert!(load_uploaded_files(&store).await.unwrap().is_none());

        let files = vec![FileRef::new("notes.md", "# Notes", "text/markdown")];
        save_uploaded_files(&store, &files).await.unwrap();
        assert_eq!(load_uploaded_files(&store).await.unwrap(), Some(files));
    }

    #[tokio::test]
    async fn stored_payload_uses_browser_field_names() {
        let store = InMemorySessionStore::new();
        let files = vec![FileRef::new("a.txt", "hi", "text/plain")];
        save_uploaded_files(&store, &files).await.unwrap();
        let raw = store.get(SessionKey::UploadedFiles).await.unwrap().unwrap();
        assert_eq!(raw, r#"[{"name":"a.txt","content":"hi","type":"text/plain"}]"#);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_serialization_error() {
        let store = InMemorySessionStore::new();
        store.set(SessionKey::UploadedFiles, "{not json").await.unwrap();
        let err = load_uploaded_files(&store).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn answers_document_is_stored_separately() {
        let store = InMemorySessionStore::new();
        let doc = FileRef::new("answers.txt", "42", "text/plain");
        save_answers_document(&store, &doc).await.unwrap();
        assert!(load_uploaded_files(&store).await.unwrap().is_none());
        assert_eq!(load_answers_document(&store).await.unwrap(), Some(doc));
    }
}
