use std::fmt;

use levelup_core::alarm::{Effect, Effects, Engine};

use crate::timers::AlarmScheduler;

/// Where a hosted session stands after the last applied effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerStatus {
    Running,
    Completed,
    Exited,
}

type ExitCallback = Box<dyn FnOnce() + Send>;

/// Hosts one engine: applies its effects, owns its timers and invokes the
/// exit callback when the engine asks to leave.
///
/// Dropping the runner aborts every pending timer.
pub struct SessionRunner<E: Engine> {
    engine: E,
    alarms: AlarmScheduler<E::Alarm>,
    on_exit: Option<ExitCallback>,
    status: RunnerStatus,
}

impl<E: Engine> SessionRunner<E> {
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            alarms: AlarmScheduler::new(),
            on_exit: None,
            status: RunnerStatus::Running,
        }
    }

    #[must_use]
    pub fn with_exit_callback(mut self, on_exit: impl FnOnce() + Send + 'static) -> Self {
        self.on_exit = Some(Box::new(on_exit));
        self
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[must_use]
    pub fn status(&self) -> RunnerStatus {
        self.status
    }

    #[must_use]
    pub fn has_pending_alarms(&self) -> bool {
        self.alarms.has_pending()
    }

    /// Run a user action against the engine and apply what it returns.
    /// Ignored once the session has exited.
    pub fn dispatch<F>(&mut self, action: F) -> RunnerStatus
    where
        F: FnOnce(&mut E) -> Effects<E::Alarm>,
    {
        if self.status == RunnerStatus::Exited {
            return self.status;
        }
        let effects = action(&mut self.engine);
        self.apply(effects)
    }

    /// Leave the screen.
    pub fn exit(&mut self) -> RunnerStatus {
        self.dispatch(E::exit)
    }

    /// Wait for the next timer and feed it to the engine. Returns `None` when
    /// no timer is pending.
    ///
    /// Cancel safe.
    pub async fn next_alarm(&mut self) -> Option<RunnerStatus> {
        if self.status == RunnerStatus::Exited {
            return None;
        }
        let alarm = self.alarms.next().await?;
        tracing::trace!(?alarm, "alarm fired");
        Some(self.dispatch(|engine| engine.on_alarm(alarm)))
    }

    /// Fire timers until none is pending or the session exits.
    pub async fn run_until_idle(&mut self) -> RunnerStatus {
        while let Some(status) = self.next_alarm().await {
            if status == RunnerStatus::Exited {
                break;
            }
        }
        self.status
    }

    fn apply(&mut self, effects: Effects<E::Alarm>) -> RunnerStatus {
        for effect in effects {
            match effect {
                Effect::Schedule(alarm) => self.alarms.schedule(alarm),
                Effect::CancelPending => self.alarms.cancel_all(),
                Effect::Completed => tracing::debug!("session completed"),
                Effect::Exit => {
                    self.alarms.cancel_all();
                    self.status = RunnerStatus::Exited;
                    if let Some(on_exit) = self.on_exit.take() {
                        on_exit();
                    }
                    return self.status;
                }
            }
        }
        self.status = if self.engine.is_complete() {
            RunnerStatus::Completed
        } else {
            RunnerStatus::Running
        };
        self.status
    }
}

impl<E: Engine + fmt::Debug> fmt::Debug for SessionRunner<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRunner")
            .field("engine", &self.engine)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
