//! Cancel-and-replace timer slot for debounced submissions
//!
//! One `DebounceTimer` backs one debounced field. Scheduling always cancels
//! the pending deadline first, so the slot never holds more than one.

/// A single-deadline timer with a fixed delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceTimer {
    delay_ms: u64,
    deadline_ms: Option<u64>,
}

impl DebounceTimer {
    /// Build an idle timer with the given delay
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline_ms: None,
        }
    }

    /// Delay applied by `schedule`
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Pending deadline, if any
    pub fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// True while a deadline is pending
    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Cancel any pending deadline, then set a new one `delay_ms` after
    /// `now_ms`. Returns the superseded deadline when one was pending.
    pub fn schedule(&mut self, now_ms: u64) -> Option<u64> {
        let superseded = self.deadline_ms.take();
        self.deadline_ms = Some(now_ms.saturating_add(self.delay_ms));
        superseded
    }

    /// Clear the pending deadline, returning it
    pub fn cancel(&mut self) -> Option<u64> {
        self.deadline_ms.take()
    }

    /// Clear and report the deadline when it is due at or before `now_ms`
    pub fn fire_due(&mut self, now_ms: u64) -> Option<u64> {
        match self.deadline_ms {
            Some(deadline) if deadline <= now_ms => self.deadline_ms.take(),
            _ => None,
        }
    }
}
