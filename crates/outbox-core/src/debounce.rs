//! Debounce policy with a caller-supplied clock.
//!
//! The wasm layer maps `trigger` to a raw DOM event and `fire_due` to the
//! timer landing; tests drive both with a simulated clock.

/// Quiet period for resize handling.
pub const RESIZE_DELAY_MS: u64 = 250;

/// Quiet period for scroll handling, roughly one frame.
pub const SCROLL_DELAY_MS: u64 = 16;

/// Deadline tracker for one debounced action.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debounce {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Records a raw event at `now_ms`, replacing any pending deadline.
    pub fn trigger(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consumes the deadline if it has passed. True means the action runs now.
    pub fn fire_due(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_quiet_period() {
        let mut d = Debounce::new(250);
        d.trigger(0);
        assert!(d.is_pending());
        assert!(!d.fire_due(249));
        assert!(d.fire_due(250));
        assert!(!d.is_pending());
    }

    #[test]
    fn rapid_triggers_push_the_deadline_back() {
        let mut d = Debounce::new(250);
        d.trigger(0);
        d.trigger(100);
        d.trigger(200);
        assert!(!d.fire_due(250));
        assert!(!d.fire_due(449));
        assert!(d.fire_due(450));
    }

    #[test]
    fn fires_at_most_once_per_trigger() {
        let mut d = Debounce::new(16);
        d.trigger(0);
        assert!(d.fire_due(16));
        assert!(!d.fire_due(32));
    }
}
