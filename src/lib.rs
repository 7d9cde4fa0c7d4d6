//! Speed-limited angle control for a single hobby servo.
//!
//! An [`Axis`] moves a servo from its current angle to a commanded target one
//! step at a time. Each step is driven by a [`PeriodicTimer`] whose interval is
//! derived from the requested speed, and each new angle is forwarded to an
//! [`AngleSink`] (usually a PWM channel). Once the target is reached the timer
//! is cancelled and an optional [`TargetReachedNotifier`] is told about it.
//!
//! ```rust
//! use core::time::Duration;
//! use servo_axis::{Axis, ManualClock, SpinTimer};
//!
//! let clock = ManualClock::new();
//! let mut axis = Axis::new("pan", SpinTimer::new(&clock));
//!
//! // 50°/s means one degree every 20ms
//! axis.go_to_target_angle(3, 50);
//!
//! while axis.is_busy() {
//!     clock.advance(Duration::from_millis(20));
//!     axis.poll();
//! }
//!
//! assert_eq!(axis.angle(), 3);
//! assert!(axis.take_target_reached());
//! ```
//!
//! # Cargo Features
//!
//! - `std` - enables the [`OperatingSystemClock`] and the cooperative
//!   [`Scheduler`]
//! - `hal` - a [`PwmServo`] sink built on top of `embedded-hal`'s `PwmPin`
//! - `serde` - (de)serializing [`AxisConfig`]

#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

mod axis;
mod clock;
mod config;
#[cfg(feature = "hal")]
mod hal_devices;
#[cfg(feature = "std")]
mod scheduler;
mod sink;
mod timer;
mod velocity;

pub use crate::{
    axis::Axis,
    clock::{ManualClock, SystemClock},
    config::{AngleLimits, AxisConfig, ConfigError},
    sink::{func_notifier, func_sink, AngleSink, TargetReachedNotifier},
    timer::{PeriodicTimer, SpinTimer},
    velocity::{TickPlan, Velocity},
};

#[cfg(feature = "std")]
pub use crate::clock::OperatingSystemClock;
#[cfg(feature = "hal")]
pub use crate::hal_devices::PwmServo;
#[cfg(feature = "std")]
pub use crate::scheduler::{Pollable, Scheduler};
