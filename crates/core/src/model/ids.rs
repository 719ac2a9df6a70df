use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a question within one generated question set.
///
/// The generation service may hand out numeric or textual ids, so the value is
/// kept as text. Numeric ids render as their decimal form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for QuestionId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<usize> for QuestionId {
    fn from(value: usize) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_display() {
        let id = QuestionId::from(42_u64);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_question_id_debug() {
        let id = QuestionId::new("q-7");
        assert_eq!(format!("{id:?}"), "QuestionId(q-7)");
    }

    #[test]
    fn test_numeric_and_text_ids_compare_by_text() {
        assert_eq!(QuestionId::from(3_usize), QuestionId::from("3"));
    }
}
