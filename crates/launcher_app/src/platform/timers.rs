use std::time::{Duration, Instant};

use launcher_core::Msg;

/// Messages waiting for their deadline; drained by the UI loop every frame.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    entries: Vec<(Instant, Msg)>,
}

impl DeferredQueue {
    pub fn schedule(&mut self, now: Instant, after: Duration, msg: Msg) {
        self.entries.push((now + after, msg));
    }

    /// Removes and returns every message whose deadline is at or before `now`,
    /// earliest first. Equal deadlines keep scheduling order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<Msg> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(deadline, _)| *deadline <= now);
        self.entries = pending;
        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, msg)| msg).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|(deadline, _)| *deadline).min()
    }
}
