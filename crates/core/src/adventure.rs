//! Level-gated adventure map.
//!
//! Every question is a level on the map and levels are cleared strictly in
//! order. A wrong pick is shaken out and removed from the open level without
//! revealing the answer; a correct pick clears the level and unlocks the next.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::alarm::{Alarm, Effect, Effects, Engine, Epoch};
use crate::model::Question;

pub const WRONG_FADE: Duration = Duration::from_millis(300);
pub const WRONG_FADE_BUFFER: Duration = Duration::from_millis(120);
pub const CORRECT_HOLD: Duration = Duration::from_millis(900);
pub const EXIT_DELAY: Duration = Duration::from_millis(200);

pub const EMPTY_MESSAGE: &str = "No questions available.";
pub const COMPLETED_MESSAGE: &str = "Adventure Completed!";
pub const HINT: &str = "Hint: eliminate wrong choices, but no auto-reveals.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdventureAlarm {
    /// The shake and fade of a wrong pick finished.
    WrongFaded { choice: usize },
    /// The correct highlight was shown long enough.
    CorrectHeld,
    /// Grace period between completing the map and leaving it.
    ExitDelay,
}

/// Highlight currently drawn in the open level. Anything but `Idle` locks
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Idle,
    Wrong { choice: usize },
    Correct { choice: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceState {
    Available,
    Removed,
    Wrong,
    Correct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Completed,
    Current,
    Locked,
}

/// State of the question modal for the current level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenLevel {
    level: usize,
    correct_index: Option<usize>,
    removed: BTreeSet<usize>,
    feedback: Feedback,
}

impl OpenLevel {
    fn new(level: usize, question: &Question) -> Self {
        Self {
            level,
            correct_index: question.correct_index(),
            removed: BTreeSet::new(),
            feedback: Feedback::Idle,
        }
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    #[must_use]
    pub fn removed(&self) -> &BTreeSet<usize> {
        &self.removed
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.feedback != Feedback::Idle
    }

    #[must_use]
    pub fn choice_state(&self, choice: usize) -> ChoiceState {
        match self.feedback {
            Feedback::Wrong { choice: picked } if picked == choice => ChoiceState::Wrong,
            Feedback::Correct { choice: picked } if picked == choice => ChoiceState::Correct,
            _ if self.removed.contains(&choice) => ChoiceState::Removed,
            _ => ChoiceState::Available,
        }
    }
}

/// Letter label drawn next to a choice (`A`, `B`, ...).
#[must_use]
pub fn choice_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|offset| b'A'.checked_add(offset))
        .map_or('?', char::from)
}

pub struct AdventureSession {
    levels: Vec<Question>,
    current: usize,
    completed: BTreeSet<usize>,
    modal: Option<OpenLevel>,
    finished: bool,
    epoch: Epoch,
}

impl AdventureSession {
    #[must_use]
    pub fn new(levels: Vec<Question>) -> Self {
        info!(levels = levels.len(), "adventure session started");
        Self {
            levels,
            current: 0,
            completed: BTreeSet::new(),
            modal: None,
            finished: false,
            epoch: Epoch::default(),
        }
    }

    #[must_use]
    pub fn levels(&self) -> &[Question] {
        &self.levels
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[must_use]
    pub fn current_level(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn completed_levels(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn modal(&self) -> Option<&OpenLevel> {
        self.modal.as_ref()
    }

    /// Question of the open level, if the modal is showing.
    #[must_use]
    pub fn open_question(&self) -> Option<&Question> {
        self.modal
            .as_ref()
            .and_then(|open| self.levels.get(open.level))
    }

    #[must_use]
    pub fn level_status(&self, level: usize) -> LevelStatus {
        if self.completed.contains(&level) {
            LevelStatus::Completed
        } else if level == self.current {
            LevelStatus::Current
        } else {
            LevelStatus::Locked
        }
    }

    /// Share of levels completed, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.levels.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.completed.len() as f64 / self.levels.len() as f64;
        ratio
    }

    #[must_use]
    pub fn hint(&self) -> &'static str {
        HINT
    }

    /// Open the question modal for `level`. Only the current level opens.
    pub fn open_level(&mut self, level: usize) -> Effects<AdventureAlarm> {
        if self.finished || self.modal.is_some() || level != self.current {
            return Vec::new();
        }
        let Some(question) = self.levels.get(level) else {
            return Vec::new();
        };
        self.epoch.bump();
        self.modal = Some(OpenLevel::new(level, question));
        debug!(level, "adventure level opened");
        Vec::new()
    }

    /// Close the modal without answering. Refused while feedback is showing.
    pub fn close_level(&mut self) -> Effects<AdventureAlarm> {
        match &self.modal {
            Some(open) if !open.is_locked() => {
                self.epoch.bump();
                self.modal = None;
                vec![Effect::CancelPending]
            }
            _ => Vec::new(),
        }
    }

    /// Pick the choice at `choice` in the open level.
    ///
    /// Ignored while feedback is animating and for removed or unknown choices.
    pub fn choose(&mut self, choice: usize) -> Effects<AdventureAlarm> {
        let Some(open) = self.modal.as_mut() else {
            return Vec::new();
        };
        let choice_count = self
            .levels
            .get(open.level)
            .map_or(0, |question| question.choices().len());
        if open.is_locked() || choice >= choice_count || open.removed.contains(&choice) {
            return Vec::new();
        }

        let epoch = self.epoch.current();
        if open.correct_index == Some(choice) {
            open.feedback = Feedback::Correct { choice };
            self.completed.insert(self.current);
            debug!(level = self.current, choice, "adventure choice correct");
            vec![Effect::Schedule(Alarm::new(
                epoch,
                AdventureAlarm::CorrectHeld,
                CORRECT_HOLD,
            ))]
        } else {
            open.feedback = Feedback::Wrong { choice };
            debug!(level = self.current, choice, "adventure choice wrong");
            vec![Effect::Schedule(Alarm::new(
                epoch,
                AdventureAlarm::WrongFaded { choice },
                WRONG_FADE + WRONG_FADE_BUFFER,
            ))]
        }
    }

    /// Mark the current level complete and move on without answering.
    pub fn skip(&mut self) -> Effects<AdventureAlarm> {
        if self.finished || self.levels.is_empty() {
            return Vec::new();
        }
        self.completed.insert(self.current);
        debug!(level = self.current, "adventure level skipped");
        self.leave_current_level()
    }

    fn leave_current_level(&mut self) -> Effects<AdventureAlarm> {
        let epoch = self.epoch.bump();
        self.modal = None;

        if self.current + 1 < self.levels.len() {
            self.current += 1;
            return vec![Effect::CancelPending];
        }

        self.finished = true;
        info!(levels = self.levels.len(), "adventure completed");
        vec![
            Effect::CancelPending,
            Effect::Completed,
            Effect::Schedule(Alarm::new(epoch, AdventureAlarm::ExitDelay, EXIT_DELAY)),
        ]
    }

    fn wrong_faded(&mut self, choice: usize) -> Effects<AdventureAlarm> {
        let Some(open) = self.modal.as_mut() else {
            return Vec::new();
        };
        if open.feedback == (Feedback::Wrong { choice }) {
            open.removed.insert(choice);
            open.feedback = Feedback::Idle;
        }
        Vec::new()
    }

    fn correct_held(&mut self) -> Effects<AdventureAlarm> {
        match self.modal.as_ref().map(OpenLevel::feedback) {
            Some(Feedback::Correct { .. }) => self.leave_current_level(),
            _ => Vec::new(),
        }
    }
}

impl Engine for AdventureSession {
    type Alarm = AdventureAlarm;

    fn on_alarm(&mut self, alarm: Alarm<AdventureAlarm>) -> Effects<AdventureAlarm> {
        if !self.epoch.is_current(&alarm) {
            return Vec::new();
        }
        match alarm.kind {
            AdventureAlarm::WrongFaded { choice } => self.wrong_faded(choice),
            AdventureAlarm::CorrectHeld => self.correct_held(),
            AdventureAlarm::ExitDelay if self.finished => vec![Effect::Exit],
            AdventureAlarm::ExitDelay => Vec::new(),
        }
    }

    fn exit(&mut self) -> Effects<AdventureAlarm> {
        self.epoch.bump();
        self.modal = None;
        vec![Effect::CancelPending, Effect::Exit]
    }

    fn is_complete(&self) -> bool {
        self.finished || self.levels.is_empty()
    }
}

impl fmt::Debug for AdventureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdventureSession")
            .field("levels_len", &self.levels.len())
            .field("current", &self.current)
            .field("completed", &self.completed)
            .field("modal", &self.modal)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawQuestion, normalize_all};
    use serde_json::json;

    fn level(choices: &[&str], correct: &str) -> serde_json::Value {
        json!({ "question": "pick one", "choices": choices, "correct": correct })
    }

    fn session(records: Vec<serde_json::Value>) -> AdventureSession {
        let raw: Vec<RawQuestion> = records.into_iter().map(RawQuestion::new).collect();
        AdventureSession::new(normalize_all(&raw))
    }

    fn four_levels() -> AdventureSession {
        session(vec![
            level(&["a", "b"], "A"),
            level(&["a", "b"], "B"),
            level(&["a", "b"], "A"),
            level(&["a", "b"], "B"),
        ])
    }

    fn only_alarm(effects: &Effects<AdventureAlarm>) -> Alarm<AdventureAlarm> {
        let alarms: Vec<_> = effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Schedule(alarm) => Some(*alarm),
                _ => None,
            })
            .collect();
        assert_eq!(alarms.len(), 1, "expected exactly one alarm in {effects:?}");
        alarms[0]
    }

    #[test]
    fn wrong_pick_is_removed_after_fade() {
        let mut adventure = session(vec![level(&["x", "y", "z"], "B")]);
        adventure.open_level(0);
        assert_eq!(adventure.modal().unwrap().correct_index, Some(1));

        let alarm = only_alarm(&adventure.choose(0));
        assert_eq!(alarm.kind, AdventureAlarm::WrongFaded { choice: 0 });
        assert_eq!(alarm.delay, Duration::from_millis(420));

        let open = adventure.modal().unwrap();
        assert_eq!(open.feedback(), Feedback::Wrong { choice: 0 });
        assert_eq!(open.choice_state(0), ChoiceState::Wrong);
        assert_eq!(open.choice_state(1), ChoiceState::Available);

        adventure.on_alarm(alarm);
        let open = adventure.modal().unwrap();
        assert_eq!(open.feedback(), Feedback::Idle);
        assert_eq!(open.removed().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(open.choice_state(0), ChoiceState::Removed);
        assert_eq!(open.choice_state(1), ChoiceState::Available);
        assert_eq!(open.choice_state(2), ChoiceState::Available);
        assert!(adventure.completed_levels().is_empty());
    }

    #[test]
    fn removed_choice_cannot_be_picked_again() {
        let mut adventure = session(vec![level(&["x", "y", "z"], "B")]);
        adventure.open_level(0);
        let alarm = only_alarm(&adventure.choose(0));
        adventure.on_alarm(alarm);

        let before = format!("{adventure:?}");
        assert!(adventure.choose(0).is_empty());
        assert_eq!(format!("{adventure:?}"), before);
    }

    #[test]
    fn clicks_during_feedback_are_ignored() {
        let mut adventure = session(vec![level(&["x", "y", "z"], "B")]);
        adventure.open_level(0);
        adventure.choose(0);

        let before = format!("{adventure:?}");
        assert!(adventure.choose(1).is_empty());
        assert!(adventure.choose(2).is_empty());
        assert!(adventure.close_level().is_empty());
        assert_eq!(format!("{adventure:?}"), before);
    }

    #[test]
    fn only_current_level_opens() {
        let mut adventure = four_levels();
        assert!(adventure.open_level(2).is_empty());
        assert!(adventure.modal().is_none());
        assert_eq!(adventure.level_status(0), LevelStatus::Current);
        assert_eq!(adventure.level_status(2), LevelStatus::Locked);

        adventure.open_level(0);
        assert_eq!(adventure.modal().unwrap().level(), 0);
    }

    #[test]
    fn reopening_starts_clean() {
        let mut adventure = session(vec![level(&["x", "y", "z"], "C")]);
        adventure.open_level(0);
        let alarm = only_alarm(&adventure.choose(0));
        adventure.on_alarm(alarm);
        assert!(!adventure.modal().unwrap().removed().is_empty());

        adventure.close_level();
        assert!(adventure.modal().is_none());
        adventure.open_level(0);
        assert!(adventure.modal().unwrap().removed().is_empty());
        assert_eq!(adventure.modal().unwrap().choice_state(0), ChoiceState::Available);
    }

    #[test]
    fn correct_pick_clears_level_after_hold() {
        let mut adventure = four_levels();
        adventure.open_level(0);

        let alarm = only_alarm(&adventure.choose(0));
        assert_eq!(alarm.kind, AdventureAlarm::CorrectHeld);
        assert_eq!(alarm.delay, CORRECT_HOLD);
        assert_eq!(adventure.modal().unwrap().choice_state(0), ChoiceState::Correct);
        assert_eq!(adventure.modal().unwrap().choice_state(1), ChoiceState::Available);
        assert!(adventure.completed_levels().contains(&0));
        assert_eq!(adventure.current_level(), 0);

        let effects = adventure.on_alarm(alarm);
        assert_eq!(effects, vec![Effect::CancelPending]);
        assert_eq!(adventure.current_level(), 1);
        assert!(adventure.modal().is_none());
        assert_eq!(adventure.level_status(0), LevelStatus::Completed);
        assert_eq!(adventure.level_status(1), LevelStatus::Current);
    }

    #[test]
    fn clearing_last_level_completes_then_exits() {
        let mut adventure = session(vec![level(&["a", "b"], "B")]);
        adventure.open_level(0);
        let hold = only_alarm(&adventure.choose(1));

        let effects = adventure.on_alarm(hold);
        assert!(effects.contains(&Effect::Completed));
        assert!(adventure.is_finished());
        let exit = only_alarm(&effects);
        assert_eq!(exit.kind, AdventureAlarm::ExitDelay);
        assert_eq!(exit.delay, EXIT_DELAY);

        assert_eq!(adventure.on_alarm(exit), vec![Effect::Exit]);
        assert!((adventure.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn skip_marks_current_complete_and_advances() {
        let mut adventure = four_levels();
        adventure.skip();
        assert_eq!(adventure.current_level(), 1);

        let effects = adventure.skip();
        assert_eq!(effects, vec![Effect::CancelPending]);
        assert!(adventure.completed_levels().contains(&1));
        assert_eq!(adventure.current_level(), 2);
        assert!(adventure.modal().is_none());
        assert!((adventure.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn skip_cancels_in_flight_feedback() {
        let mut adventure = four_levels();
        adventure.open_level(0);
        let hold = only_alarm(&adventure.choose(0));

        adventure.skip();
        assert_eq!(adventure.current_level(), 1);
        assert_eq!(adventure.completed_levels().len(), 1);

        assert!(adventure.on_alarm(hold).is_empty());
        assert_eq!(adventure.current_level(), 1);
    }

    #[test]
    fn skipping_last_level_completes() {
        let mut adventure = session(vec![level(&["a"], "A")]);
        let effects = adventure.skip();
        assert!(effects.contains(&Effect::Completed));
        assert!(adventure.is_finished());
        assert!(adventure.skip().is_empty());
        assert_eq!(adventure.completed_levels().len(), 1);
    }

    #[test]
    fn unresolvable_reference_makes_every_pick_wrong() {
        let mut adventure = session(vec![level(&["x", "y", "z"], "none of these")]);
        adventure.open_level(0);

        for choice in 0..3 {
            let alarm = only_alarm(&adventure.choose(choice));
            assert_eq!(alarm.kind, AdventureAlarm::WrongFaded { choice });
            adventure.on_alarm(alarm);
        }
        assert_eq!(adventure.modal().unwrap().removed().len(), 3);
        assert!(adventure.completed_levels().is_empty());
        assert!(adventure.choose(0).is_empty());
    }

    #[test]
    fn open_answer_level_has_nothing_to_pick() {
        let mut adventure = session(vec![json!({ "question": "explain" })]);
        adventure.open_level(0);
        assert!(adventure.choose(0).is_empty());
    }

    #[test]
    fn empty_map_ignores_everything() {
        let mut adventure = session(Vec::new());
        assert!(adventure.is_empty());
        assert!(adventure.is_complete());
        assert!(adventure.open_level(0).is_empty());
        assert!(adventure.skip().is_empty());
        assert!(adventure.progress().abs() < f64::EPSILON);
    }

    #[test]
    fn completed_levels_never_duplicate() {
        let mut adventure = four_levels();
        adventure.open_level(0);
        adventure.choose(0);
        adventure.skip();
        assert_eq!(adventure.completed_levels().len(), 1);
    }

    #[test]
    fn exit_makes_pending_alarms_stale() {
        let mut adventure = four_levels();
        adventure.open_level(0);
        let fade = only_alarm(&adventure.choose(1));

        assert_eq!(adventure.exit(), vec![Effect::CancelPending, Effect::Exit]);
        assert!(adventure.on_alarm(fade).is_empty());
    }

    #[test]
    fn letters_label_choices() {
        assert_eq!(choice_letter(0), 'A');
        assert_eq!(choice_letter(3), 'D');
    }
}
