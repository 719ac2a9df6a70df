//! Deferred transitions shared by every engine.
//!
//! Engines never sleep. Each operation returns the effects it wants applied;
//! a delayed transition is requested as an [`Alarm`] which the host fires back
//! through [`Engine::on_alarm`] once `delay` has elapsed.

use std::time::Duration;

/// A one-shot delayed event.
///
/// `epoch` identifies the question or level that was on screen when the alarm
/// was requested. Engines bump their epoch whenever that identity changes and
/// ignore alarms carrying an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alarm<K> {
    pub epoch: u64,
    pub kind: K,
    pub delay: Duration,
}

impl<K> Alarm<K> {
    #[must_use]
    pub fn new(epoch: u64, kind: K, delay: Duration) -> Self {
        Self { epoch, kind, delay }
    }
}

/// Side effects an engine asks its host to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect<K> {
    /// Fire `alarm` after its delay.
    Schedule(Alarm<K>),
    /// Drop every alarm that has not fired yet.
    CancelPending,
    /// The session reached its terminal state.
    Completed,
    /// Leave the screen; the host invokes its exit callback.
    Exit,
}

pub type Effects<K> = Vec<Effect<K>>;

/// An interaction engine driven by user input and fired alarms.
pub trait Engine {
    type Alarm: Clone + Send + std::fmt::Debug + 'static;

    /// Apply a fired alarm. Stale alarms produce no effects.
    fn on_alarm(&mut self, alarm: Alarm<Self::Alarm>) -> Effects<Self::Alarm>;

    /// Tear the session down and return to the previous screen.
    fn exit(&mut self) -> Effects<Self::Alarm>;

    /// Whether the session sits in its terminal state.
    fn is_complete(&self) -> bool {
        false
    }
}

/// Monotonic counter handing out alarm epochs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Epoch(u64);

impl Epoch {
    pub(crate) fn current(self) -> u64 {
        self.0
    }

    pub(crate) fn bump(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    pub(crate) fn is_current<K>(self, alarm: &Alarm<K>) -> bool {
        alarm.epoch == self.0
    }
}
