use crate::{
    AngleLimits, AngleSink, AxisConfig, ConfigError, PeriodicTimer,
    TargetReachedNotifier, TickPlan, Velocity,
};
use core::{fmt, mem};
use tracing::{debug, trace, warn};

/// A single servo axis which moves towards a target angle at a limited speed.
///
/// Motion happens in ticks. [`Axis::go_to_target_angle()`] starts the owned
/// [`PeriodicTimer`], and every time it expires (see [`Axis::poll()`]) the
/// axis moves one step closer to the target and forwards the new angle to
/// the attached [`AngleSink`]. The last step is shortened so the target is
/// never overshot. On arrival the timer is cancelled, the "target reached"
/// flag is latched, and the attached [`TargetReachedNotifier`] is called.
///
/// The sink and notifier are borrowed, not owned, and either may be missing.
/// Without a sink the axis still runs through the motion internally, it just
/// doesn't tell any hardware about it.
///
/// # Note
///
/// An axis deliberately isn't `Clone`. It owns its timer and is the only
/// thing allowed to start or cancel it.
pub struct Axis<'a, T: PeriodicTimer> {
    name: &'a str,
    config: AxisConfig,
    angle: i32,
    target_angle: i32,
    velocity: Velocity,
    tick_plan: TickPlan,
    target_reached: bool,
    timer: T,
    angle_sink: Option<&'a mut dyn AngleSink>,
    notifier: Option<&'a mut dyn TargetReachedNotifier>,
}

impl<'a, T: PeriodicTimer> Axis<'a, T> {
    /// Create an axis using the default [`AxisConfig`].
    pub fn new(name: &'a str, timer: T) -> Axis<'a, T> {
        Axis::from_valid_config(name, timer, AxisConfig::default())
    }

    /// Create an axis with a custom configuration, making sure it is
    /// consistent first.
    pub fn with_config(
        name: &'a str,
        timer: T,
        config: AxisConfig,
    ) -> Result<Axis<'a, T>, ConfigError> {
        config.validate()?;

        Ok(Axis::from_valid_config(name, timer, config))
    }

    fn from_valid_config(
        name: &'a str,
        mut timer: T,
        config: AxisConfig,
    ) -> Axis<'a, T> {
        // we own the timer now, nothing should be running until asked
        timer.cancel();

        let velocity = Velocity::default();

        Axis {
            name,
            config,
            angle: config.initial_angle,
            target_angle: config.initial_angle,
            velocity,
            tick_plan: TickPlan::for_velocity(
                velocity,
                config.min_tick_interval_ms,
            ),
            target_reached: false,
            timer,
            angle_sink: None,
            notifier: None,
        }
    }

    /// The label this axis was created with.
    pub fn name(&self) -> &'a str { self.name }

    /// The current configuration, including any limits adopted from the sink.
    pub fn config(&self) -> &AxisConfig { &self.config }

    /// The timer driving the control loop.
    pub fn timer(&self) -> &T { &self.timer }

    /// Attach the device which actually moves the servo, returning whatever
    /// was attached previously.
    ///
    /// Passing `None` detaches the current sink. This has no effect on any
    /// motion in progress.
    pub fn attach_angle_sink(
        &mut self,
        sink: Option<&'a mut dyn AngleSink>,
    ) -> Option<&'a mut dyn AngleSink> {
        mem::replace(&mut self.angle_sink, sink)
    }

    /// Attach something to be told whenever the target is reached, returning
    /// whatever was attached previously.
    pub fn attach_target_reached_notifier(
        &mut self,
        notifier: Option<&'a mut dyn TargetReachedNotifier>,
    ) -> Option<&'a mut dyn TargetReachedNotifier> {
        mem::replace(&mut self.notifier, notifier)
    }

    pub fn has_angle_sink(&self) -> bool { self.angle_sink.is_some() }

    pub fn has_target_reached_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    pub fn limits(&self) -> AngleLimits { self.config.limits }

    /// Restrict this axis to the range of angles the attached sink says it
    /// can reach.
    ///
    /// The sink's limits are in hardware terms, so they get mirrored first
    /// when the axis is reversed. Returns the new limits, or `None` (leaving
    /// the limits untouched) when there is no sink or the two ranges don't
    /// overlap.
    ///
    /// A target outside the new limits is pulled back inside, so a move in
    /// progress stops at the nearest limit. The current angle is left alone,
    /// even if it now lies outside the limits. The next step will bring it
    /// back inside.
    pub fn adopt_sink_limits(&mut self) -> Option<AngleLimits> {
        let sink_limits = self.angle_sink.as_ref()?.angle_limits();

        let sink_limits = if self.config.reversed {
            AngleLimits::new(
                sink_limits.max().saturating_neg(),
                sink_limits.min().saturating_neg(),
            )
            .ok()?
        } else {
            sink_limits
        };

        let limits = self.config.limits.intersect(&sink_limits)?;
        debug!(axis = self.name, min = limits.min(), max = limits.max(), "Adopted the angle sink's limits");
        self.config.limits = limits;

        let clamped = limits.clamp(self.target_angle);
        if clamped != self.target_angle {
            warn!(
                axis = self.name,
                previous = self.target_angle,
                clamped,
                "The target angle is outside the new limits"
            );
            self.target_angle = clamped;
        }

        Some(limits)
    }

    pub fn is_reversed(&self) -> bool { self.config.reversed }

    /// Flip the mounting orientation. Takes effect with the next angle sent
    /// to the sink.
    pub fn set_reversed(&mut self, reversed: bool) {
        self.config.reversed = reversed;
    }

    /// Start moving towards `target_angle` at `speed` degrees per second.
    ///
    /// Targets outside [`Axis::limits()`] are clamped to the nearest limit
    /// and a speed of `0` is treated as `1°/s`. Calling this while already
    /// moving retargets straight away.
    ///
    /// Asking for the current angle still takes a tick, the arrival is
    /// reported on the next one.
    pub fn go_to_target_angle(&mut self, target_angle: i32, speed: u32) {
        let clamped = self.config.limits.clamp(target_angle);

        if clamped != target_angle {
            warn!(
                axis = self.name,
                requested = target_angle,
                clamped,
                "The target angle is outside the axis limits"
            );
        }

        self.target_reached = false;
        self.target_angle = clamped;
        self.velocity = Velocity::new(speed);
        self.tick_plan =
            TickPlan::for_velocity(self.velocity, self.config.min_tick_interval_ms);

        debug!(
            axis = self.name,
            angle = self.angle,
            target = self.target_angle,
            speed = self.velocity.degrees_per_second(),
            interval_ms = self.tick_plan.interval.as_millis() as u64,
            step = self.tick_plan.step,
            "Moving to target"
        );

        self.timer.start(self.tick_plan.interval);
    }

    /// Stop moving, leaving the current and target angles as they are.
    ///
    /// Stopping an idle axis does nothing.
    pub fn stop(&mut self) {
        if self.timer.is_running() {
            debug!(axis = self.name, angle = self.angle, target = self.target_angle, "Stopped");
        }

        self.timer.cancel();
    }

    /// Run the control loop, taking a step if the timer says one is due.
    ///
    /// This must be called at least once per tick interval, preferably as
    /// part of the main loop. Returns `true` if a tick was executed.
    pub fn poll(&mut self) -> bool {
        if self.timer.poll_expired() {
            self.do_angle_control();
            true
        } else {
            false
        }
    }

    /// One tick of the control loop.
    pub(crate) fn do_angle_control(&mut self) {
        let delta = i64::from(self.target_angle) - i64::from(self.angle);
        let step_size = i64::from(self.tick_plan.step);

        // the last step gets shortened so we land exactly on the target
        let step = if delta.abs() < step_size {
            delta
        } else {
            delta.signum() * step_size
        };

        if step != 0 {
            self.angle = (i64::from(self.angle) + step) as i32;
            trace!(axis = self.name, angle = self.angle, target = self.target_angle, "Step");
            self.forward_angle();
        }

        if self.angle == self.target_angle {
            self.timer.cancel();
            self.target_reached = true;
            debug!(axis = self.name, target = self.target_angle, "Target reached");

            if let Some(notifier) = self.notifier.as_mut() {
                notifier.notify_target_reached(self.target_angle);
            }
        }
    }

    /// The most recently commanded angle, including part way through a
    /// motion.
    pub fn angle(&self) -> i32 { self.angle }

    pub fn target_angle(&self) -> i32 { self.target_angle }

    /// Jump straight to `angle` without going through the control loop.
    ///
    /// The angle is clamped to [`Axis::limits()`] and sent to the sink
    /// immediately. A motion in progress carries on from the new angle.
    pub fn set_angle(&mut self, angle: i32) {
        self.angle = self.config.limits.clamp(angle);
        trace!(axis = self.name, angle = self.angle, "Set angle directly");
        self.forward_angle();
    }

    /// The speed most recently passed to [`Axis::go_to_target_angle()`].
    pub fn velocity(&self) -> Velocity { self.velocity }

    pub fn tick_plan(&self) -> TickPlan { self.tick_plan }

    /// Is the axis still moving towards its target?
    pub fn is_busy(&self) -> bool { self.timer.is_running() }

    /// Has the target been reached since the last time this was asked?
    ///
    /// Reading the flag clears it, so each arrival is only reported once.
    pub fn take_target_reached(&mut self) -> bool {
        mem::replace(&mut self.target_reached, false)
    }

    fn forward_angle(&mut self) {
        let angle = if self.config.reversed {
            self.angle.saturating_neg()
        } else {
            self.angle
        };

        if let Some(sink) = self.angle_sink.as_mut() {
            sink.set_angle(angle);
        }
    }
}

impl<'a, T: PeriodicTimer> Drop for Axis<'a, T> {
    fn drop(&mut self) {
        // nothing may tick an axis which no longer exists
        self.timer.cancel();
    }
}

impl<'a, T> fmt::Debug for Axis<'a, T>
where
    T: PeriodicTimer + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("angle", &self.angle)
            .field("target_angle", &self.target_angle)
            .field("velocity", &self.velocity)
            .field("tick_plan", &self.tick_plan)
            .field("target_reached", &self.target_reached)
            .field("timer", &self.timer)
            .field("has_angle_sink", &self.angle_sink.is_some())
            .field("has_notifier", &self.notifier.is_some())
            .finish()
    }
}
