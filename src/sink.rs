use crate::AngleLimits;

/// Something which can physically move the servo (e.g. a PWM channel).
///
/// [`AngleSink::set_angle()`] is called from inside the control loop, so it
/// shouldn't block for any significant amount of time.
pub trait AngleSink {
    /// Drive the servo to an absolute angle, in degrees.
    fn set_angle(&mut self, angle: i32);

    /// The range of angles this device can reach.
    ///
    /// Devices which don't know their own range don't need to override this.
    fn angle_limits(&self) -> AngleLimits { AngleLimits::default() }
}

impl<'a, S: AngleSink + ?Sized> AngleSink for &'a mut S {
    fn set_angle(&mut self, angle: i32) { (**self).set_angle(angle) }

    fn angle_limits(&self) -> AngleLimits { (**self).angle_limits() }
}

/// Gets told when an [`crate::Axis`] arrives at its target.
pub trait TargetReachedNotifier {
    /// Called exactly once per arrival, with the angle that was reached.
    fn notify_target_reached(&mut self, target_angle: i32);
}

impl<'a, N: TargetReachedNotifier + ?Sized> TargetReachedNotifier for &'a mut N {
    fn notify_target_reached(&mut self, target_angle: i32) {
        (**self).notify_target_reached(target_angle)
    }
}

/// An [`AngleSink`] which passes every angle to a closure.
pub fn func_sink<F, T>(set_angle: F) -> impl AngleSink
where
    F: FnMut(i32) -> T,
{
    FuncSink { set_angle }
}

struct FuncSink<F> {
    set_angle: F,
}

impl<F, T> AngleSink for FuncSink<F>
where
    F: FnMut(i32) -> T,
{
    #[inline]
    fn set_angle(&mut self, angle: i32) { (self.set_angle)(angle); }
}

/// A [`TargetReachedNotifier`] which invokes a closure on arrival.
pub fn func_notifier<F, T>(on_reached: F) -> impl TargetReachedNotifier
where
    F: FnMut(i32) -> T,
{
    FuncNotifier { on_reached }
}

struct FuncNotifier<F> {
    on_reached: F,
}

impl<F, T> TargetReachedNotifier for FuncNotifier<F>
where
    F: FnMut(i32) -> T,
{
    #[inline]
    fn notify_target_reached(&mut self, target_angle: i32) {
        (self.on_reached)(target_angle);
    }
}
