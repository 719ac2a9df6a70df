use std::sync::Arc;

use rand::Rng;

use levelup_core::Clock;
use levelup_core::adventure::AdventureSession;
use levelup_core::flashcard::FlashcardDeck;
use levelup_core::model::{
    Difficulty, GameMode, Question, Screen, SessionConfig, SessionConfigDraft, normalize_all,
};
use levelup_core::quiz::QuizSession;

use crate::error::ReviewerError;
use crate::generation::{GenerationRequest, QuestionSource};
use crate::runner::SessionRunner;

/// A normalized question set together with the mode it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSet {
    pub mode: GameMode,
    pub questions: Vec<Question>,
}

impl GeneratedSet {
    /// Screen the set opens on.
    #[must_use]
    pub fn entry_screen(&self) -> Screen {
        self.mode.entry_screen()
    }

    #[must_use]
    pub fn draft(&self) -> SessionConfigDraft {
        SessionConfigDraft::new(self.mode.clone(), self.questions.clone())
    }
}

/// Composition root for the review flow: generation, configuration and
/// session hosting.
#[derive(Clone)]
pub struct ReviewerService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
}

impl ReviewerService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self { clock, source }
    }

    /// Generate and normalize a question set.
    ///
    /// # Errors
    ///
    /// Returns `ReviewerError::Generation` when the source fails or returns
    /// nothing usable.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GeneratedSet, ReviewerError> {
        let records = match self.source.generate(&request).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(error = %err, "question generation failed");
                return Err(err.into());
            }
        };
        let questions = normalize_all(&records);
        tracing::info!(mode = %request.mode, count = questions.len(), "questions generated");
        Ok(GeneratedSet {
            mode: request.mode,
            questions,
        })
    }

    /// Confirm quiz settings for a generated set.
    ///
    /// # Errors
    ///
    /// Returns `ReviewerError::Config` when the set is empty.
    pub fn configure(
        &self,
        set: &GeneratedSet,
        difficulty: Difficulty,
        question_count: i64,
    ) -> Result<SessionConfig, ReviewerError> {
        let config = set
            .draft()
            .with_difficulty(difficulty)
            .with_question_count(question_count)
            .confirm()?;
        Ok(config)
    }

    /// Host a timed quiz and start its first question.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_quiz<R: Rng + ?Sized>(
        &self,
        config: SessionConfig,
        rng: &mut R,
    ) -> SessionRunner<QuizSession> {
        let mut runner = SessionRunner::new(QuizSession::new(config, self.clock));
        runner.dispatch(|quiz| quiz.start(rng));
        runner
    }

    #[must_use]
    pub fn start_adventure(&self, questions: Vec<Question>) -> SessionRunner<AdventureSession> {
        SessionRunner::new(AdventureSession::new(questions))
    }

    #[must_use]
    pub fn start_flashcards(&self, questions: Vec<Question>) -> SessionRunner<FlashcardDeck> {
        SessionRunner::new(FlashcardDeck::new(questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::generation::{MaterialFile, StaticQuestionSource};
    use levelup_core::time::fixed_now;

    fn service(json: &str) -> ReviewerService {
        let source = StaticQuestionSource::from_json(json).unwrap();
        ReviewerService::new(Clock::fixed(fixed_now()), Arc::new(source))
    }

    fn request(mode: GameMode) -> GenerationRequest {
        GenerationRequest::new(MaterialFile::new("notes.txt", b"notes".to_vec()), mode)
    }

    #[tokio::test]
    async fn generate_normalizes_and_routes() {
        let service = service(
            r#"[{"text":"Q","options":["x","y"],"answer":"B"},{"question":"R"}]"#,
        );
        let set = service
            .generate(request(GameMode::AdventurePath))
            .await
            .unwrap();

        assert_eq!(set.questions.len(), 2);
        assert_eq!(set.questions[0].correct_index(), Some(1));
        assert_eq!(set.entry_screen(), Screen::Adventure);
    }

    #[tokio::test]
    async fn empty_source_is_reported() {
        let service = ReviewerService::new(
            Clock::fixed(fixed_now()),
            Arc::new(StaticQuestionSource::default()),
        );
        let err = service
            .generate(request(GameMode::QuizChallenge))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewerError::Generation(GenerationError::EmptyQuestions)
        ));
    }

    #[tokio::test]
    async fn configure_clamps_count() {
        let service = service(r#"[{"question":"a"},{"question":"b"}]"#);
        let set = service
            .generate(request(GameMode::QuizChallenge))
            .await
            .unwrap();

        let config = service.configure(&set, Difficulty::Easy, 40).unwrap();
        assert_eq!(config.question_count(), 2);
        assert_eq!(config.difficulty(), Difficulty::Easy);
    }
}
