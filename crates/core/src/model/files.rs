use serde::{Deserialize, Serialize};

/// An uploaded file as carried between pages: name, text payload and MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

impl FileRef {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            mime_type: mime_type.into(),
        }
    }
}
