//! Timed multiple-choice quiz.
//!
//! One question at a time from a shuffled, truncated sequence. Every question
//! gets a fifteen second countdown; the first answer (or the timeout) locks it,
//! and two seconds later the quiz moves on by itself.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::Clock;
use crate::alarm::{Alarm, Effect, Effects, Engine, Epoch};
use crate::model::{Difficulty, GameMode, Question, SessionConfig};

pub const TIME_PER_QUESTION_SECS: u32 = 15;
pub const LOW_TIME_SECS: u32 = 5;
pub const TICK: Duration = Duration::from_secs(1);
pub const REVEAL_DELAY: Duration = Duration::from_secs(2);

pub const EMPTY_MESSAGE: &str =
    "No valid questions were passed. Please go back and generate a new reviewer.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAlarm {
    /// One second of the countdown elapsed.
    Tick,
    /// The reveal delay after an answer elapsed.
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    Unanswered,
    /// `selected` is `None` when the countdown ran out.
    Answered {
        selected: Option<usize>,
        correct: bool,
    },
}

/// How a choice button is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    Neutral,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveQuestion {
    pub position: usize,
    pub remaining_secs: u32,
    pub answer: AnswerState,
}

impl ActiveQuestion {
    fn fresh(position: usize) -> Self {
        Self {
            position,
            remaining_secs: TIME_PER_QUESTION_SECS,
            answer: AnswerState::Unanswered,
        }
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        matches!(self.answer, AnswerState::Answered { .. })
    }
}

/// Final tally of a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub score: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    /// The question sequence has not been drawn yet.
    Loading,
    Active(ActiveQuestion),
    Finished(QuizSummary),
}

/// Pick `count` questions in random order, clamped into `1..=questions.len()`.
#[must_use]
pub fn draw_questions<R: Rng + ?Sized>(
    questions: &[Question],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut drawn = questions.to_vec();
    drawn.as_mut_slice().shuffle(rng);
    drawn.truncate(count.max(1));
    drawn
}

pub struct QuizSession {
    config: SessionConfig,
    clock: Clock,
    ordered: Vec<Question>,
    score: usize,
    phase: QuizPhase,
    epoch: Epoch,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    #[must_use]
    pub fn new(config: SessionConfig, clock: Clock) -> Self {
        let started_at = clock.now();
        Self {
            config,
            clock,
            ordered: Vec::new(),
            score: 0,
            phase: QuizPhase::Loading,
            epoch: Epoch::default(),
            started_at,
        }
    }

    /// Draw the question sequence and show the first question.
    ///
    /// An empty source set finishes the quiz immediately with 0/0. Calling
    /// this outside `Loading` does nothing.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Effects<QuizAlarm> {
        if !matches!(self.phase, QuizPhase::Loading) {
            return Vec::new();
        }
        self.begin(rng)
    }

    /// Build the session again from scratch. Only available once finished.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Effects<QuizAlarm> {
        if !self.is_finished() {
            return Vec::new();
        }
        self.begin(rng)
    }

    /// Answer the current question with the choice at `index`.
    ///
    /// Ignored once the question is answered, outside `Active`, or for an
    /// index that is not on screen.
    pub fn choose(&mut self, index: usize) -> Effects<QuizAlarm> {
        let Some(question) = self.current_question() else {
            return Vec::new();
        };
        if index >= question.choices().len() {
            return Vec::new();
        }
        self.answer(Some(index))
    }

    #[must_use]
    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    #[must_use]
    pub fn mode(&self) -> &GameMode {
        self.config.mode()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of questions in the drawn sequence.
    #[must_use]
    pub fn total(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn ordered_questions(&self) -> &[Question] {
        &self.ordered
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveQuestion> {
        match &self.phase {
            QuizPhase::Active(active) => Some(active),
            QuizPhase::Loading | QuizPhase::Finished(_) => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.active()
            .and_then(|active| self.ordered.get(active.position))
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.active().map(|active| active.remaining_secs)
    }

    #[must_use]
    pub fn is_low_time(&self) -> bool {
        self.remaining_secs()
            .is_some_and(|secs| secs <= LOW_TIME_SECS)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, QuizPhase::Finished(_))
    }

    #[must_use]
    pub fn summary(&self) -> Option<&QuizSummary> {
        match &self.phase {
            QuizPhase::Finished(summary) => Some(summary),
            QuizPhase::Loading | QuizPhase::Active(_) => None,
        }
    }

    /// Marks for the current question's choices.
    ///
    /// Before answering everything is neutral. Afterwards every choice showing
    /// the correct text is marked correct and a wrong pick is marked
    /// incorrect, so both are visible together.
    #[must_use]
    pub fn choice_marks(&self) -> Vec<ChoiceMark> {
        let (Some(active), Some(question)) = (self.active(), self.current_question()) else {
            return Vec::new();
        };
        let AnswerState::Answered { selected, .. } = active.answer else {
            return vec![ChoiceMark::Neutral; question.choices().len()];
        };
        let correct_text = question.correct_text();
        question
            .choices()
            .iter()
            .enumerate()
            .map(|(index, choice)| {
                if Some(choice.as_str()) == correct_text {
                    ChoiceMark::Correct
                } else if Some(index) == selected {
                    ChoiceMark::Incorrect
                } else {
                    ChoiceMark::Neutral
                }
            })
            .collect()
    }

    fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Effects<QuizAlarm> {
        self.score = 0;
        self.started_at = self.clock.now();
        self.ordered = if self.config.questions().is_empty() {
            Vec::new()
        } else {
            draw_questions(self.config.questions(), self.config.question_count(), rng)
        };
        info!(
            mode = %self.config.mode(),
            total = self.ordered.len(),
            "quiz session started"
        );

        if self.ordered.is_empty() {
            return self.finish();
        }
        self.enter(0)
    }

    fn enter(&mut self, position: usize) -> Effects<QuizAlarm> {
        let epoch = self.epoch.bump();
        self.phase = QuizPhase::Active(ActiveQuestion::fresh(position));
        debug!(position, "quiz question opened");
        vec![
            Effect::CancelPending,
            Effect::Schedule(Alarm::new(epoch, QuizAlarm::Tick, TICK)),
        ]
    }

    fn answer(&mut self, selected: Option<usize>) -> Effects<QuizAlarm> {
        let QuizPhase::Active(active) = &self.phase else {
            return Vec::new();
        };
        if active.is_answered() {
            return Vec::new();
        }
        let position = active.position;
        let remaining_secs = active.remaining_secs;

        let correct = self.ordered.get(position).is_some_and(|question| {
            let picked = selected.and_then(|index| question.choices().get(index));
            match (picked, question.correct_text()) {
                (Some(picked), Some(correct)) => picked == correct,
                _ => false,
            }
        });
        if correct {
            self.score += 1;
        }

        self.phase = QuizPhase::Active(ActiveQuestion {
            position,
            remaining_secs,
            answer: AnswerState::Answered { selected, correct },
        });
        debug!(position, ?selected, correct, "quiz answer locked");

        vec![
            Effect::CancelPending,
            Effect::Schedule(Alarm::new(
                self.epoch.current(),
                QuizAlarm::Advance,
                REVEAL_DELAY,
            )),
        ]
    }

    fn tick(&mut self) -> Effects<QuizAlarm> {
        let QuizPhase::Active(active) = &mut self.phase else {
            return Vec::new();
        };
        if active.is_answered() {
            return Vec::new();
        }
        active.remaining_secs = active.remaining_secs.saturating_sub(1);
        if active.remaining_secs == 0 {
            debug!(position = active.position, "quiz countdown expired");
            return self.answer(None);
        }
        vec![Effect::Schedule(Alarm::new(
            self.epoch.current(),
            QuizAlarm::Tick,
            TICK,
        ))]
    }

    fn advance(&mut self) -> Effects<QuizAlarm> {
        let Some(active) = self.active() else {
            return Vec::new();
        };
        if !active.is_answered() {
            return Vec::new();
        }
        let next = active.position + 1;
        if next < self.ordered.len() {
            self.enter(next)
        } else {
            self.finish()
        }
    }

    fn finish(&mut self) -> Effects<QuizAlarm> {
        self.epoch.bump();
        let summary = QuizSummary {
            mode: self.config.mode().clone(),
            difficulty: self.config.difficulty(),
            score: self.score,
            total: self.ordered.len(),
            started_at: self.started_at,
            completed_at: self.clock.now(),
        };
        info!(score = summary.score, total = summary.total, "quiz session finished");
        self.phase = QuizPhase::Finished(summary);
        vec![Effect::CancelPending, Effect::Completed]
    }
}

impl Engine for QuizSession {
    type Alarm = QuizAlarm;

    fn on_alarm(&mut self, alarm: Alarm<QuizAlarm>) -> Effects<QuizAlarm> {
        if !self.epoch.is_current(&alarm) {
            return Vec::new();
        }
        match alarm.kind {
            QuizAlarm::Tick => self.tick(),
            QuizAlarm::Advance => self.advance(),
        }
    }

    fn exit(&mut self) -> Effects<QuizAlarm> {
        self.epoch.bump();
        vec![Effect::CancelPending, Effect::Exit]
    }

    fn is_complete(&self) -> bool {
        self.is_finished()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", self.config.mode())
            .field("ordered_len", &self.ordered.len())
            .field("score", &self.score)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
