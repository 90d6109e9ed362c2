use mastery_core::model::FileRef;

/// MIME type from the file extension, `application/octet-stream` when unknown.
#[must_use]
pub fn guess_mime_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_owned()
}

/// Build a file ref from raw bytes, reading them as text.
#[must_use]
pub fn file_ref_from_bytes(name: &str, bytes: &[u8]) -> FileRef {
    FileRef::new(
        name,
        String::from_utf8_lossy(bytes).into_owned(),
        guess_mime_type(name),
    )
}
