use thiserror::Error;

use crate::model::mode::{Difficulty, GameMode};
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot start game: no questions selected")]
    NoQuestions,
}

/// Settings being edited on the configuration screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfigDraft {
    mode: GameMode,
    difficulty: Difficulty,
    question_count: usize,
    questions: Vec<Question>,
}

impl SessionConfigDraft {
    /// Start from a generated set: medium difficulty, every question selected.
    #[must_use]
    pub fn new(mode: GameMode, questions: Vec<Question>) -> Self {
        Self {
            mode,
            difficulty: Difficulty::default(),
            question_count: questions.len(),
            questions,
        }
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the requested count from raw user input, clamped into
    /// `1..=available`.
    #[must_use]
    pub fn with_question_count(mut self, requested: i64) -> Self {
        self.set_question_count(requested);
        self
    }

    pub fn set_question_count(&mut self, requested: i64) {
        let available = self.questions.len();
        let requested = usize::try_from(requested.max(1)).unwrap_or(usize::MAX);
        self.question_count = requested.min(available);
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn available(&self) -> usize {
        self.questions.len()
    }

    /// Confirm the settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoQuestions` when nothing is left to play.
    pub fn confirm(self) -> Result<SessionConfig, ConfigError> {
        if self.questions.is_empty() || self.question_count == 0 {
            return Err(ConfigError::NoQuestions);
        }
        Ok(SessionConfig {
            mode: self.mode,
            difficulty: self.difficulty,
            question_count: self.question_count,
            questions: self.questions,
        })
    }
}

/// Confirmed configuration handed to the timed quiz.
///
/// `questions` is the full source set; the quiz draws `question_count` of
/// them when it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    mode: GameMode,
    difficulty: Difficulty,
    question_count: usize,
    questions: Vec<Question>,
}

impl SessionConfig {
    /// Build a configuration without the draft step. A count of zero is
    /// raised to one.
    #[must_use]
    pub fn new(
        mode: GameMode,
        difficulty: Difficulty,
        question_count: usize,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            mode,
            difficulty,
            question_count: question_count.max(1),
            questions,
        }
    }

    #[must_use]
    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
