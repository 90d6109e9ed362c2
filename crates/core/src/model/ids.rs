use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Ordinal of a learning level, `0..=6`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct LevelId(u8);

impl LevelId {
    pub const OVERVIEW: Self = Self(0);
    pub const MASTERY: Self = Self(5);
    pub const FINAL_REVIEW: Self = Self(6);
    pub const MAX: u8 = 6;

    /// Creates a `LevelId`, rejecting values above the final review level.
    ///
    /// # Errors
    ///
    /// Returns `Error::LevelOutOfRange` for values above 6.
    pub fn new(id: u8) -> Result<Self, Error> {
        if id > Self::MAX {
            return Err(Error::LevelOutOfRange(i64::from(id)));
        }
        Ok(Self(id))
    }

    /// Returns the underlying ordinal.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// The level that follows this one, or `None` after the final review.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        (self.0 < Self::MAX).then(|| Self(self.0 + 1))
    }

    #[must_use]
    pub fn is_overview(self) -> bool {
        self.0 == 0
    }

    /// Every level in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=Self::MAX).map(Self)
    }
}

impl TryFrom<i64> for LevelId {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|id| *id <= Self::MAX)
            .map(Self)
            .ok_or(Error::LevelOutOfRange(value))
    }
}

impl From<LevelId> for u8 {
    fn from(id: LevelId) -> Self {
        id.0
    }
}

impl FromStr for LevelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidLevelId(s.to_string()))?;
        Self::try_from(raw)
    }
}

impl Default for LevelId {
    fn default() -> Self {
        Self::OVERVIEW
    }
}

impl fmt::Debug for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelId({})", self.0)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an assessment question, unique within one level.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a course picked in the assignment wizard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How much help the guided-learning step gives, `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssistanceLevel(u8);

impl AssistanceLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns `Error::InvalidAssistanceLevel` outside `1..=5`.
    pub fn new(level: u8) -> Result<Self, Error> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(Error::InvalidAssistanceLevel(level))
        }
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for AssistanceLevel {
    fn default() -> Self {
        Self(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_id_rejects_out_of_range() {
        assert!(LevelId::new(6).is_ok());
        assert_eq!(LevelId::new(7), Err(Error::LevelOutOfRange(7)));
        assert_eq!(LevelId::try_from(-1), Err(Error::LevelOutOfRange(-1)));
    }

    #[test]
    fn level_id_next_stops_at_final_review() {
        assert_eq!(LevelId::new(4).unwrap().next(), Some(LevelId::MASTERY));
        assert_eq!(LevelId::FINAL_REVIEW.next(), None);
    }

    #[test]
    fn level_id_parses_route_segment() {
        assert_eq!("3".parse::<LevelId>().unwrap().value(), 3);
        assert!(matches!("x".parse::<LevelId>(), Err(Error::InvalidLevelId(_))));
        assert!(matches!("9".parse::<LevelId>(), Err(Error::LevelOutOfRange(9))));
    }

    #[test]
    fn level_id_serializes_as_number() {
        let json = serde_json::to_string(&LevelId::MASTERY).unwrap();
        assert_eq!(json, "5");
        let back: LevelId = serde_json::from_str("2").unwrap();
        assert_eq!(back.value(), 2);
        assert!(serde_json::from_str::<LevelId>("12").is_err());
    }

    #[test]
    fn assistance_level_defaults_to_middle() {
        assert_eq!(AssistanceLevel::default().value(), 3);
        assert!(AssistanceLevel::new(0).is_err());
        assert!(AssistanceLevel::new(6).is_err());
    }
}
