use crate::SystemClock;
use core::time::Duration;

/// A recurring timer which an owner polls from its control loop.
///
/// Rather than storing a callback, the timer reports each elapsed period
/// through [`PeriodicTimer::poll_expired()`] and the owner runs whatever the
/// callback would have done. That way the timer never needs a reference back
/// to the thing that owns it.
pub trait PeriodicTimer {
    /// Start (or restart) the timer so it expires every `interval`.
    fn start(&mut self, interval: Duration);

    /// Stop the timer. Cancelling a timer which isn't running is a no-op.
    fn cancel(&mut self);

    fn is_running(&self) -> bool;

    /// Has another period elapsed since the last time this returned `true`?
    ///
    /// This returns `true` at most once per call, and never for a cancelled
    /// timer.
    fn poll_expired(&mut self) -> bool;
}

impl<'a, T: PeriodicTimer + ?Sized> PeriodicTimer for &'a mut T {
    fn start(&mut self, interval: Duration) { (**self).start(interval) }

    fn cancel(&mut self) { (**self).cancel() }

    fn is_running(&self) -> bool { (**self).is_running() }

    fn poll_expired(&mut self) -> bool { (**self).poll_expired() }
}

/// A [`PeriodicTimer`] which compares deadlines against a [`SystemClock`]
/// whenever it is polled (i.e. a busy-waiting "spin" timer).
///
/// Timers only borrow the clock, so several can share a single clock by
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTimer<C> {
    clock: C,
    interval: Duration,
    deadline: Option<Duration>,
}

impl<C: SystemClock> SpinTimer<C> {
    /// Create a stopped timer which reads the time from `clock`.
    pub fn new(clock: C) -> SpinTimer<C> {
        SpinTimer {
            clock,
            interval: Duration::new(0, 0),
            deadline: None,
        }
    }

    /// The period most recently passed to [`PeriodicTimer::start()`].
    pub fn interval(&self) -> Duration { self.interval }

    /// The clock deadlines are measured against.
    pub fn clock(&self) -> &C { &self.clock }
}

impl<C: SystemClock> PeriodicTimer for SpinTimer<C> {
    fn start(&mut self, interval: Duration) {
        self.interval = interval;
        self.deadline = Some(self.clock.elapsed() + interval);
    }

    fn cancel(&mut self) { self.deadline = None; }

    fn is_running(&self) -> bool { self.deadline.is_some() }

    fn poll_expired(&mut self) -> bool {
        let deadline = match self.deadline {
            Some(d) => d,
            None => return false,
        };

        let now = self.clock.elapsed();

        if now < deadline {
            return false;
        }

        let next = deadline + self.interval;

        // If we've fallen more than a whole period behind (e.g. the control
        // loop stalled), pick up from now instead of firing a burst of ticks
        // to catch up.
        self.deadline = if next > now {
            Some(next)
        } else {
            Some(now + self.interval)
        };

        true
    }
}
