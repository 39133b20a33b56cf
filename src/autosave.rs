//! Dirty tracking and the debounced save deadline
//!
//! A single deadline is armed on the clean-to-dirty transition; edits that
//! arrive while already dirty coalesce into the pending deadline instead of
//! restarting it. This is fixed-latency batching, not a sliding debounce:
//! a burst of edits produces exactly one save, `delay` after the first
//! edit of the burst.
//!
//! Time never comes from an ambient clock; every operation takes `now`,
//! which keeps the scheduler deterministic and lets the owning session (or
//! a test) drive it from its own event loop.

use std::time::{Duration, Instant};

/// Default delay between the first dirtying edit and the save attempt.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(5);

/// State of the single save timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerState {
    /// No save pending
    Idle,
    /// A save is due at the deadline
    Armed { deadline: Instant },
}

/// Dirty-tracking save scheduler.
#[derive(Clone, Debug)]
pub struct AutoSave {
    /// Whether the document differs from the last persisted version
    dirty: bool,
    timer: TimerState,
    delay: Duration,
    /// When the document was last successfully persisted (session creation
    /// counts as the starting point)
    last_saved: Instant,
}

impl AutoSave {
    pub fn new(delay: Duration, now: Instant) -> Self {
        Self {
            dirty: false,
            timer: TimerState::Idle,
            delay,
            last_saved: now,
        }
    }

    /// Record an edit. Arms the deadline only on the clean-to-dirty
    /// transition; while already dirty this only coalesces.
    pub fn mark_dirty(&mut self, now: Instant) {
        if !self.dirty {
            self.dirty = true;
            self.timer = TimerState::Armed {
                deadline: now + self.delay,
            };
            tracing::debug!(delay_ms = self.delay.as_millis() as u64, "autosave armed");
        }
    }

    /// Record a successful save: clears dirty, disarms, stamps `last_saved`.
    pub fn mark_clean(&mut self, now: Instant) {
        self.dirty = false;
        self.timer = TimerState::Idle;
        self.last_saved = now;
    }

    /// Consume the deadline if it has elapsed.
    ///
    /// Returns `true` at most once per arming, and only at or after the
    /// deadline. The timer is disarmed either way the save then goes: on
    /// failure the document stays dirty but nothing re-arms until a new
    /// clean-to-dirty transition or a manual save.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.timer {
            TimerState::Armed { deadline } if now >= deadline => {
                self.timer = TimerState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Disarm without touching the dirty flag. Used on session teardown so
    /// no save callback can run against a destroyed session.
    pub fn cancel(&mut self) {
        self.timer = TimerState::Idle;
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_saved(&self) -> Instant {
        self.last_saved
    }

    /// The pending deadline, if armed. The owning event loop sleeps until
    /// this and then calls the session's tick.
    pub fn deadline(&self) -> Option<Instant> {
        match self.timer {
            TimerState::Armed { deadline } => Some(deadline),
            TimerState::Idle => None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(now: Instant) -> AutoSave {
        AutoSave::new(Duration::from_secs(5), now)
    }

    #[test]
    fn test_arms_on_clean_to_dirty_transition() {
        let t0 = Instant::now();
        let mut a = scheduler(t0);
        assert_eq!(a.deadline(), None);

        a.mark_dirty(t0);
        assert!(a.dirty());
        assert_eq!(a.deadline(), Some(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_edit_burst_coalesces_into_one_deadline() {
        let t0 = Instant::now();
        let mut a = scheduler(t0);

        a.mark_dirty(t0);
        a.mark_dirty(t0 + Duration::from_secs(1));
        a.mark_dirty(t0 + Duration::from_secs(4));

        // later edits do not slide the deadline
        assert_eq!(a.deadline(), Some(t0 + Duration::from_secs(5)));
        assert!(!a.fire(t0 + Duration::from_secs(4)));
        assert!(a.fire(t0 + Duration::from_secs(5)));
        // exactly once
        assert!(!a.fire(t0 + Duration::from_secs(6)));
    }

    #[test]
    fn test_never_fires_before_the_delay() {
        let t0 = Instant::now();
        let mut a = scheduler(t0);
        a.mark_dirty(t0);

        assert!(!a.fire(t0));
        assert!(!a.fire(t0 + Duration::from_millis(4999)));
        assert!(a.dirty());
    }

    #[test]
    fn test_failure_leaves_dirty_without_rearming() {
        let t0 = Instant::now();
        let mut a = scheduler(t0);
        a.mark_dirty(t0);
        assert!(a.fire(t0 + Duration::from_secs(5)));

        // the save failed: still dirty, and a further edit is not a
        // transition, so nothing re-arms
        a.mark_dirty(t0 + Duration::from_secs(6));
        assert!(a.dirty());
        assert_eq!(a.deadline(), None);

        // a successful (manual) save restores the cycle
        a.mark_clean(t0 + Duration::from_secs(7));
        a.mark_dirty(t0 + Duration::from_secs(8));
        assert_eq!(a.deadline(), Some(t0 + Duration::from_secs(13)));
    }

    #[test]
    fn test_mark_clean_stamps_last_saved() {
        let t0 = Instant::now();
        let mut a = scheduler(t0);
        assert_eq!(a.last_saved(), t0);

        a.mark_dirty(t0);
        let t1 = t0 + Duration::from_secs(5);
        assert!(a.fire(t1));
        a.mark_clean(t1);
        assert!(!a.dirty());
        assert_eq!(a.last_saved(), t1);
    }

    #[test]
    fn test_cancel_disarms_but_keeps_dirty() {
        let t0 = Instant::now();
        let mut a = scheduler(t0);
        a.mark_dirty(t0);
        a.cancel();

        assert!(a.dirty());
        assert_eq!(a.deadline(), None);
        assert!(!a.fire(t0 + Duration::from_secs(60)));
    }
}
