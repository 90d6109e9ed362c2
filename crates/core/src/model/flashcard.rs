use serde::{Deserialize, Serialize};

/// Heading/content pair shown one at a time during the flashcard phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub heading: String,
    #[serde(alias = "flashcard_content")]
    pub content: String,
}

impl Flashcard {
    #[must_use]
    pub fn new(heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_long_content_key() {
        let card: Flashcard =
            serde_json::from_str(r#"{"heading": "Term", "flashcard_content": "Meaning"}"#).unwrap();
        assert_eq!(card, Flashcard::new("Term", "Meaning"));
    }
}
