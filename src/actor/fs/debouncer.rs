use std::time::{Duration, Instant};

/// Consumer-side debouncer keyed on the last *accepted* trigger.
///
/// Triggers inside the window after an accepted one are dropped outright;
/// nothing is coalesced or replayed later.
pub struct Debouncer {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Accept `at` if it is at least one window past the last accepted trigger.
    pub fn accept(&mut self, at: Instant) -> bool {
        if let Some(last) = self.last_accepted
            && at.saturating_duration_since(last) < self.window
        {
            return false;
        }
        self.last_accepted = Some(at);
        true
    }
}
