#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems detected while building an [`AxisConfig`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("the minimum angle ({min}°) is larger than the maximum ({max}°)")]
    InvertedLimits { min: i32, max: i32 },
    #[error("the minimum tick interval must be at least 1ms")]
    ZeroTickInterval,
    #[error("the initial angle ({angle}°) lies outside {limits}")]
    InitialAngleOutOfRange { angle: i32, limits: AngleLimits },
}

/// An inclusive range of angles, in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngleLimits {
    min: i32,
    max: i32,
}

impl AngleLimits {
    pub const DEFAULT_MIN: i32 = -90;
    pub const DEFAULT_MAX: i32 = 90;

    pub fn new(min: i32, max: i32) -> Result<AngleLimits, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedLimits { min, max });
        }

        Ok(AngleLimits { min, max })
    }

    pub fn min(&self) -> i32 { self.min }

    pub fn max(&self) -> i32 { self.max }

    pub fn contains(&self, angle: i32) -> bool {
        self.min <= angle && angle <= self.max
    }

    /// Pull an angle back inside the limits.
    pub fn clamp(&self, angle: i32) -> i32 {
        if angle < self.min {
            self.min
        } else if angle > self.max {
            self.max
        } else {
            angle
        }
    }

    /// The overlap between two sets of limits, if there is one.
    pub fn intersect(&self, other: &AngleLimits) -> Option<AngleLimits> {
        AngleLimits::new(self.min.max(other.min), self.max.min(other.max)).ok()
    }
}

impl Default for AngleLimits {
    fn default() -> AngleLimits {
        AngleLimits {
            min: AngleLimits::DEFAULT_MIN,
            max: AngleLimits::DEFAULT_MAX,
        }
    }
}

impl core::fmt::Display for AngleLimits {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}°, {}°]", self.min, self.max)
    }
}

/// Static configuration for an [`crate::Axis`].
///
/// The defaults match a typical hobby servo mounted the "right way round": a
/// travel of ±90° starting at the centre, and at most one update per 20ms PWM
/// frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxisConfig {
    pub limits: AngleLimits,
    /// Mirror every angle sent to the [`crate::AngleSink`] (e.g. because the
    /// servo is mounted upside down).
    pub reversed: bool,
    /// The shortest period the control loop may run at, in milliseconds.
    ///
    /// Faster speeds are reached by moving more than one degree per tick.
    pub min_tick_interval_ms: u32,
    pub initial_angle: i32,
}

impl AxisConfig {
    pub const DEFAULT_MIN_TICK_INTERVAL_MS: u32 = 20;

    pub fn with_limits(mut self, limits: AngleLimits) -> AxisConfig {
        self.limits = limits;
        self
    }

    pub fn with_reversed(mut self, reversed: bool) -> AxisConfig {
        self.reversed = reversed;
        self
    }

    pub fn with_min_tick_interval_ms(mut self, millis: u32) -> AxisConfig {
        self.min_tick_interval_ms = millis;
        self
    }

    pub fn with_initial_angle(mut self, angle: i32) -> AxisConfig {
        self.initial_angle = angle;
        self
    }

    /// Check the configuration is self-consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // re-run the constructor's check in case we were deserialized
        AngleLimits::new(self.limits.min, self.limits.max)?;

        if self.min_tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        if !self.limits.contains(self.initial_angle) {
            return Err(ConfigError::InitialAngleOutOfRange {
                angle: self.initial_angle,
                limits: self.limits,
            });
        }

        Ok(())
    }
}

impl Default for AxisConfig {
    fn default() -> AxisConfig {
        AxisConfig {
            limits: AngleLimits::default(),
            reversed: false,
            min_tick_interval_ms: AxisConfig::DEFAULT_MIN_TICK_INTERVAL_MS,
            initial_angle: 0,
        }
    }
}
