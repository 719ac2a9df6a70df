use serde::Deserialize;
use serde_json::Value;

use crate::model::ids::QuestionId;

//
// ─── RAW RECORDS ───────────────────────────────────────────────────────────────
//

/// A question record exactly as the generation service returned it.
///
/// Records come in several shapes (`question` or `text`, `choices` or
/// `options`, `correct` or `answer`), and any field may be missing or of an
/// unexpected type. The record is therefore kept as an untyped JSON value and
/// only interpreted by [`normalize`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawQuestion(Value);

impl RawQuestion {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// First present, non-null field among `keys`.
    fn field(&self, keys: &[&str]) -> Option<&Value> {
        let object = self.0.as_object()?;
        keys.iter()
            .filter_map(|key| object.get(*key))
            .find(|value| !value.is_null())
    }
}

impl From<Value> for RawQuestion {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

//
// ─── CANONICAL QUESTION ────────────────────────────────────────────────────────
//

/// How a record identifies its correct choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectReference {
    /// Zero-based position parsed from a letter code `A`–`D`.
    Letter(usize),
    /// Literal choice text, matched by trimmed equality.
    Text(String),
}

impl CorrectReference {
    /// Parse a raw reference. Single letters `A`–`D` (any case, surrounding
    /// whitespace ignored) are letter codes; everything else is literal text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            let upper = ch.to_ascii_uppercase();
            if ('A'..='D').contains(&upper) {
                return Self::Letter(usize::from(upper as u8 - b'A'));
            }
        }
        Self::Text(raw.to_owned())
    }
}

/// Canonical question consumed by every engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    choices: Vec<String>,
    correct: Option<CorrectReference>,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        choices: Vec<String>,
        correct: Option<CorrectReference>,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            choices,
            correct,
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn correct_reference(&self) -> Option<&CorrectReference> {
        self.correct.as_ref()
    }

    /// Open-answer items carry no choices.
    #[must_use]
    pub fn is_open_answer(&self) -> bool {
        self.choices.is_empty()
    }

    /// Resolve the correct reference to a position in `choices`.
    ///
    /// Returns `None` when the letter points past the choice list, when no
    /// choice matches the literal text, or when the record had no reference.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        match self.correct.as_ref()? {
            CorrectReference::Letter(index) => (*index < self.choices.len()).then_some(*index),
            CorrectReference::Text(text) => {
                let wanted = text.trim();
                self.choices.iter().position(|choice| choice.trim() == wanted)
            }
        }
    }

    /// Display text of the resolved correct choice.
    #[must_use]
    pub fn correct_text(&self) -> Option<&str> {
        self.correct_index()
            .and_then(|index| self.choices.get(index))
            .map(String::as_str)
    }

    /// Answer shown on the back of a flashcard: the resolved choice when there
    /// is one, otherwise the literal reference, without a leading `"A. "`
    /// style label.
    #[must_use]
    pub fn answer_text(&self) -> String {
        let raw = match (self.correct_text(), self.correct.as_ref()) {
            (Some(text), _) => text,
            (None, Some(CorrectReference::Text(text))) => text.as_str(),
            (None, _) => "",
        };
        strip_letter_label(raw).to_owned()
    }
}

/// Removes a leading `"A."`..`"D."` label and the whitespace after it.
fn strip_letter_label(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && (b'A'..=b'D').contains(&bytes[0]) && bytes[1] == b'.' {
        text[2..].trim_start()
    } else {
        text
    }
}

//
// ─── NORMALIZER ────────────────────────────────────────────────────────────────
//

/// Adapt a raw record at zero-based `position` into the canonical shape.
///
/// Never fails: a missing prompt becomes `"Question N"`, missing choices an
/// empty list, a missing id the position itself, and a non-string correct
/// value no reference at all.
#[must_use]
pub fn normalize(position: usize, raw: &RawQuestion) -> Question {
    let id = match raw.field(&["id"]) {
        Some(Value::String(text)) => QuestionId::new(text.clone()),
        Some(other) => QuestionId::new(other.to_string()),
        None => QuestionId::from(position),
    };

    let prompt = raw
        .field(&["question", "text"])
        .map_or_else(|| format!("Question {}", position + 1), display_text);

    let choices = match raw.field(&["choices", "options"]) {
        Some(Value::Array(items)) => items.iter().map(display_text).collect(),
        _ => Vec::new(),
    };

    let correct = match raw.field(&["correct", "answer"]) {
        Some(Value::String(text)) => Some(CorrectReference::parse(text)),
        _ => None,
    };

    Question::new(id, prompt, choices, correct)
}

/// Normalize a whole question set, keeping source order.
#[must_use]
pub fn normalize_all(raw: &[RawQuestion]) -> Vec<Question> {
    raw.iter()
        .enumerate()
        .map(|(position, record)| normalize(position, record))
        .collect()
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
