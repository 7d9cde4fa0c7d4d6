use core::{cell::Cell, time::Duration};

/// A source of monotonic time for [`crate::SpinTimer`]s.
///
/// Timers read it through a shared reference, so one clock can drive every
/// axis in a control loop.
pub trait SystemClock {
    /// Time since the clock's origin (power-on, process start, or whatever
    /// else the implementation counts from).
    fn elapsed(&self) -> Duration;
}

impl<'a, C> SystemClock for &'a C
where
    C: SystemClock + ?Sized,
{
    fn elapsed(&self) -> Duration { C::elapsed(*self) }
}

/// A clock which only moves when it is told to.
///
/// Handy for simulations and tests, where the control loop should run
/// against a deterministic notion of time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// A clock stopped at time zero.
    pub fn new() -> ManualClock { ManualClock::default() }

    /// Move the clock forward.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Jump to an absolute point in time.
    ///
    /// Going backwards is allowed, but timers polled against this clock will
    /// simply wait until it catches up with their deadline again.
    pub fn set(&self, now: Duration) { self.now.set(now); }
}

impl SystemClock for ManualClock {
    fn elapsed(&self) -> Duration { self.now.get() }
}

/// Wall-clock time from [`std::time::Instant`], measured from when the
/// clock was created.
///
/// Use this to run servos for real on a hosted target. Requires the `std`
/// feature.
#[cfg(feature = "std")]
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingSystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl OperatingSystemClock {
    /// Start counting from now.
    pub fn new() -> OperatingSystemClock {
        OperatingSystemClock {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for OperatingSystemClock {
    fn default() -> OperatingSystemClock { OperatingSystemClock::new() }
}

#[cfg(feature = "std")]
impl SystemClock for OperatingSystemClock {
    fn elapsed(&self) -> Duration { self.origin.elapsed() }
}
