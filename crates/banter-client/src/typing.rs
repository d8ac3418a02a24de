//! Typing-indicator debounce.
//!
//! Derives start/stop-typing signals from local input activity. A keystroke
//! while idle emits `typing`; further keystrokes re-arm the quiet-period
//! deadline without emitting (true debounce, not throttle); the deadline
//! elapsing, or an explicit send, emits `stop_typing`.

use std::time::Duration;

/// Quiet period after the last keystroke before `stop_typing` fires.
pub const TYPING_QUIET_PERIOD: Duration = Duration::from_millis(3000);

/// Debouncer for the local user's typing indicator.
///
/// Holds at most one pending deadline, so a single `stop_typing` is emitted
/// per typing burst no matter how many keystrokes re-armed it.
#[derive(Debug, Clone)]
pub struct TypingDebouncer<I> {
    /// Whether the local user is currently marked as typing.
    active: bool,
    /// Time of the most recent keystroke. `None` when no deadline is armed.
    last_activity: Option<I>,
}

// Manual impl: the derive would demand `I: Default`, but an idle debouncer
// holds no instant at all.
impl<I> Default for TypingDebouncer<I> {
    fn default() -> Self {
        Self { active: false, last_activity: None }
    }
}

impl<I> TypingDebouncer<I>
where
    I: Copy + Ord + std::ops::Sub<Output = Duration>,
{
    /// Create an idle debouncer.
    pub fn new() -> Self {
        Self { active: false, last_activity: None }
    }

    /// Record input activity, re-arming the deadline.
    ///
    /// Returns `true` on the idle-to-typing edge, meaning the caller should
    /// emit a `typing` intent.
    pub fn touch(&mut self, now: I) -> bool {
        self.last_activity = Some(now);
        if self.active {
            return false;
        }
        self.active = true;
        true
    }

    /// Check the deadline.
    ///
    /// Returns `true` once the quiet period has elapsed after the last
    /// keystroke, meaning the caller should emit a `stop_typing` intent.
    pub fn poll(&mut self, now: I) -> bool {
        let Some(armed_at) = self.last_activity else {
            return false;
        };
        if !self.active || now - armed_at < TYPING_QUIET_PERIOD {
            return false;
        }
        self.active = false;
        self.last_activity = None;
        true
    }

    /// Stop typing immediately (message sent).
    ///
    /// Returns `true` if the user was marked as typing, meaning the caller
    /// should emit a `stop_typing` intent even though the deadline had not
    /// fired.
    pub fn flush(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.last_activity = None;
        was_active
    }

    /// Drop any pending deadline without emitting (session teardown).
    pub fn reset(&mut self) {
        self.active = false;
        self.last_activity = None;
    }

    /// Whether the local user is currently marked as typing.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
