//! Flip-card review over a generated question set.

use std::fmt;
use std::time::Duration;

use crate::alarm::{Alarm, Effect, Effects, Engine, Epoch};
use crate::model::Question;

pub const FLIP_DURATION: Duration = Duration::from_millis(800);
pub const MOVE_DELAY: Duration = Duration::from_millis(300);

pub const EMPTY_MESSAGE: &str = "No flashcards available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashcardAlarm {
    FlipSettled,
    Move(Direction),
}

/// Keys the deck reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Other,
}

impl NavKey {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            _ => Self::Other,
        }
    }
}

pub struct FlashcardDeck {
    cards: Vec<Question>,
    index: usize,
    flipped: bool,
    animating: bool,
    epoch: Epoch,
}

impl FlashcardDeck {
    #[must_use]
    pub fn new(cards: Vec<Question>) -> Self {
        Self {
            cards,
            index: 0,
            flipped: false,
            animating: false,
            epoch: Epoch::default(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Prompt on the front of the current card.
    #[must_use]
    pub fn front(&self) -> Option<&str> {
        self.cards.get(self.index).map(Question::prompt)
    }

    /// Answer on the back of the current card.
    #[must_use]
    pub fn back(&self) -> Option<String> {
        self.cards.get(self.index).map(Question::answer_text)
    }

    /// Share of the deck seen so far, counting the current card.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = (self.index + 1) as f64 / self.cards.len() as f64;
        ratio
    }

    #[must_use]
    pub fn can_navigate(&self) -> bool {
        self.cards.len() > 1 && !self.animating
    }

    pub fn flip(&mut self) -> Effects<FlashcardAlarm> {
        if self.cards.is_empty() || self.animating {
            return Vec::new();
        }
        self.animating = true;
        self.flipped = !self.flipped;
        vec![Effect::Schedule(Alarm::new(
            self.epoch.current(),
            FlashcardAlarm::FlipSettled,
            FLIP_DURATION,
        ))]
    }

    pub fn next(&mut self) -> Effects<FlashcardAlarm> {
        self.start_move(Direction::Next)
    }

    pub fn prev(&mut self) -> Effects<FlashcardAlarm> {
        self.start_move(Direction::Prev)
    }

    pub fn key(&mut self, key: NavKey) -> Effects<FlashcardAlarm> {
        match key {
            NavKey::ArrowRight => self.next(),
            NavKey::ArrowLeft => self.prev(),
            NavKey::Other => Vec::new(),
        }
    }

    fn start_move(&mut self, direction: Direction) -> Effects<FlashcardAlarm> {
        if !self.can_navigate() {
            return Vec::new();
        }
        self.animating = true;
        self.flipped = false;
        vec![Effect::Schedule(Alarm::new(
            self.epoch.current(),
            FlashcardAlarm::Move(direction),
            MOVE_DELAY,
        ))]
    }
}

impl Engine for FlashcardDeck {
    type Alarm = FlashcardAlarm;

    fn on_alarm(&mut self, alarm: Alarm<FlashcardAlarm>) -> Effects<FlashcardAlarm> {
        if !self.epoch.is_current(&alarm) || self.cards.is_empty() {
            return Vec::new();
        }
        let len = self.cards.len();
        match alarm.kind {
            FlashcardAlarm::FlipSettled => {}
            FlashcardAlarm::Move(Direction::Next) => self.index = (self.index + 1) % len,
            FlashcardAlarm::Move(Direction::Prev) => self.index = (self.index + len - 1) % len,
        }
        self.animating = false;
        Vec::new()
    }

    fn exit(&mut self) -> Effects<FlashcardAlarm> {
        self.epoch.bump();
        vec![Effect::CancelPending, Effect::Exit]
    }
}

impl fmt::Debug for FlashcardDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashcardDeck")
            .field("cards_len", &self.cards.len())
            .field("index", &self.index)
            .field("flipped", &self.flipped)
            .field("animating", &self.animating)
            .finish_non_exhaustive()
    }
}
