#![forbid(unsafe_code)]

pub mod repository;
pub mod session;
pub mod sqlite;

pub use repository::{InMemorySessionStore, SessionKey, SessionStore, Storage, StorageError};
pub use session::{
    load_answers_document, load_uploaded_files, save_answers_document, save_uploaded_files,
};
