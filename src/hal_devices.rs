use crate::{AngleLimits, AngleSink};
use embedded_hal::PwmPin;

/// An [`AngleSink`] which drives a hobby servo from a PWM channel.
///
/// The angle range is mapped linearly onto a pulse width range, by default
/// `1000µs` to `2000µs` inside the usual 50Hz (`20_000µs`) frame. The PWM
/// channel is expected to already be running at the frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PwmServo<P> {
    pwm: P,
    limits: AngleLimits,
    min_pulse_us: u32,
    max_pulse_us: u32,
    period_us: u32,
}

impl<P> PwmServo<P>
where
    P: PwmPin<Duty = u16>,
{
    pub const DEFAULT_MIN_PULSE_US: u32 = 1000;
    pub const DEFAULT_MAX_PULSE_US: u32 = 2000;
    pub const DEFAULT_PERIOD_US: u32 = 20_000;

    /// Take control of a PWM channel and enable it.
    pub fn new(mut pwm: P) -> PwmServo<P> {
        pwm.enable();

        PwmServo {
            pwm,
            limits: AngleLimits::default(),
            min_pulse_us: PwmServo::<P>::DEFAULT_MIN_PULSE_US,
            max_pulse_us: PwmServo::<P>::DEFAULT_MAX_PULSE_US,
            period_us: PwmServo::<P>::DEFAULT_PERIOD_US,
        }
    }

    /// The angles which correspond to the shortest and longest pulse.
    pub fn with_limits(mut self, limits: AngleLimits) -> PwmServo<P> {
        self.limits = limits;
        self
    }

    /// Change the pulse widths (in microseconds) and frame period used.
    pub fn with_timing(
        mut self,
        min_pulse_us: u32,
        max_pulse_us: u32,
        period_us: u32,
    ) -> PwmServo<P> {
        debug_assert!(min_pulse_us <= max_pulse_us);
        debug_assert!(max_pulse_us <= period_us);
        debug_assert!(period_us > 0);

        self.min_pulse_us = min_pulse_us;
        self.max_pulse_us = max_pulse_us;
        self.period_us = period_us;
        self
    }

    /// The pulse width used to hold a particular angle.
    pub fn pulse_width_us(&self, angle: i32) -> u32 {
        let angle = self.limits.clamp(angle);
        let span = i64::from(self.limits.max()) - i64::from(self.limits.min());

        if span == 0 {
            return self.min_pulse_us;
        }

        let offset = i64::from(angle) - i64::from(self.limits.min());
        let pulse_span = i64::from(self.max_pulse_us - self.min_pulse_us);

        self.min_pulse_us + (offset * pulse_span / span) as u32
    }

    fn duty_for(&self, angle: i32) -> u16 {
        let max_duty = u64::from(self.pwm.get_max_duty());
        let pulse = u64::from(self.pulse_width_us(angle));
        let period = u64::from(self.period_us.max(1));

        (max_duty * pulse / period).min(max_duty) as u16
    }

    /// Stop sending pulses, letting the servo go limp.
    pub fn relax(&mut self) { self.pwm.disable(); }

    pub fn into_inner(self) -> P { self.pwm }
}

impl<P> AngleSink for PwmServo<P>
where
    P: PwmPin<Duty = u16>,
{
    fn set_angle(&mut self, angle: i32) {
        let duty = self.duty_for(angle);
        tracing::trace!(angle, duty, "Updating PWM duty");

        self.pwm.enable();
        self.pwm.set_duty(duty);
    }

    fn angle_limits(&self) -> AngleLimits { self.limits }
}
