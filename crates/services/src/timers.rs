//! One-shot timers backing engine alarms.

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use levelup_core::alarm::Alarm;

/// Sleeps on every scheduled alarm and hands it back once its delay has
/// elapsed. Dropping the scheduler aborts every pending timer.
///
/// Must be used from within a tokio runtime.
pub struct AlarmScheduler<K> {
    tasks: JoinSet<()>,
    tx: mpsc::UnboundedSender<Alarm<K>>,
    rx: mpsc::UnboundedReceiver<Alarm<K>>,
}

impl<K: Send + 'static> AlarmScheduler<K> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tasks: JoinSet::new(),
            tx,
            rx,
        }
    }

    pub fn schedule(&mut self, alarm: Alarm<K>) {
        while self.tasks.try_join_next().is_some() {}

        let tx = self.tx.clone();
        self.tasks.spawn(async move {
            tokio::time::sleep(alarm.delay).await;
            let _ = tx.send(alarm);
        });
    }

    /// Abort every timer and drop alarms that fired but were not consumed.
    pub fn cancel_all(&mut self) {
        // Dropping the old set aborts its tasks.
        self.tasks = JoinSet::new();
        while self.rx.try_recv().is_ok() {}
    }

    /// Whether any alarm may still be delivered.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty() || !self.rx.is_empty()
    }

    /// Wait for the next alarm. Returns `None` once nothing is pending.
    ///
    /// Cancel safe.
    pub async fn next(&mut self) -> Option<Alarm<K>> {
        loop {
            if let Ok(alarm) = self.rx.try_recv() {
                return Some(alarm);
            }
            if self.tasks.is_empty() {
                return None;
            }
            tokio::select! {
                alarm = self.rx.recv() => return alarm,
                _ = self.tasks.join_next() => {}
            }
        }
    }
}

impl<K: Send + 'static> Default for AlarmScheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
