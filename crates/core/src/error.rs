use thiserror::Error;

/// Validation errors raised while building domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("level id {0} is outside 0..=6")]
    LevelOutOfRange(i64),
    #[error("assistance level {0} is outside 1..=5")]
    InvalidAssistanceLevel(u8),
    #[error("invalid level id: {0}")]
    InvalidLevelId(String),
}
