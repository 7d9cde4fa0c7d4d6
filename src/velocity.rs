use core::time::Duration;

/// An angular speed in `degrees/second`.
///
/// Speeds are never zero: anything below `1°/s` is bumped up to `1°/s` so a
/// tick interval can always be derived from it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Velocity(u32);

impl Velocity {
    pub const MIN: Velocity = Velocity(1);

    pub fn new(degrees_per_second: u32) -> Velocity {
        Velocity(degrees_per_second.max(Velocity::MIN.0))
    }

    pub fn degrees_per_second(self) -> u32 { self.0 }
}

impl Default for Velocity {
    fn default() -> Velocity { Velocity::MIN }
}

impl From<u32> for Velocity {
    fn from(degrees_per_second: u32) -> Velocity {
        Velocity::new(degrees_per_second)
    }
}

/// How the control loop realises a [`Velocity`]: move `step` degrees every
/// `interval`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TickPlan {
    pub interval: Duration,
    pub step: u32,
}

impl TickPlan {
    /// No single tick ever needs to move further than a full turn.
    pub const MAX_STEP: u32 = 360;

    /// Work out the tick interval and step size for a particular speed.
    ///
    /// Slow speeds move one degree per tick and stretch the interval
    /// (`1000 / speed` milliseconds). Once that interval would drop below
    /// `min_interval_ms` the step grows instead, and the interval is
    /// recalculated so the average speed is unchanged.
    ///
    /// A step never exceeds [`TickPlan::MAX_STEP`]. Speeds which would need
    /// more than that per tick run at the cap, once every `min_interval_ms`.
    pub fn for_velocity(velocity: Velocity, min_interval_ms: u32) -> TickPlan {
        debug_assert!(min_interval_ms > 0);

        let speed = u64::from(velocity.degrees_per_second());
        let min_interval_ms = u64::from(min_interval_ms.max(1));
        let one_degree_ms = 1000 / speed;

        if one_degree_ms >= min_interval_ms {
            return TickPlan {
                interval: Duration::from_millis(one_degree_ms),
                step: 1,
            };
        }

        // smallest step which keeps us at or above the minimum interval
        let step = (speed * min_interval_ms + 999) / 1000;

        if step > u64::from(TickPlan::MAX_STEP) {
            return TickPlan {
                interval: Duration::from_millis(min_interval_ms),
                step: TickPlan::MAX_STEP,
            };
        }

        let interval_ms = (step * 1000 / speed).max(1);

        TickPlan {
            interval: Duration::from_millis(interval_ms),
            step: step as u32,
        }
    }

    /// The number of ticks needed to cover `distance` degrees.
    pub fn ticks_for(&self, distance: u32) -> u32 {
        let step = u64::from(self.step.max(1));
        ((u64::from(distance) + step - 1) / step) as u32
    }
}
