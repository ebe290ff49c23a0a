//! Time-stepped interpolation between two values

use std::time::Duration;

use bevy_math::curve::{Curve, EaseFunction};
use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized tween progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    SinusoidalInOut,
    QuadraticInOut,
}

impl Easing {
    fn curve(self) -> EaseFunction {
        match self {
            Easing::Linear => EaseFunction::Linear,
            Easing::SinusoidalInOut => EaseFunction::SineInOut,
            Easing::QuadraticInOut => EaseFunction::QuadraticInOut,
        }
    }

    /// Map progress `t` in `[0, 1]` to eased progress in `[0, 1]`
    pub fn apply(self, t: f32) -> f32 {
        self.curve().sample_clamped(t)
    }
}

/// Values a tween can interpolate
pub trait Interpolate: Copy {
    fn interpolate(from: Self, to: Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from.lerp(to, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from.slerp(to, t)
    }
}

/// Result of advancing a tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep<T> {
    pub value: T,
    /// Unused part of the time step, present once the tween has finished
    pub overflow: Option<Duration>,
}

impl<T> TweenStep<T> {
    pub fn is_finished(&self) -> bool {
        self.overflow.is_some()
    }
}

/// Interpolates from one value to another over a fixed duration
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Advance by `dt` and return the value at the new time
    pub fn advance(&mut self, dt: Duration) -> TweenStep<T> {
        let remaining = self.duration.saturating_sub(self.elapsed);
        if dt >= remaining {
            self.elapsed = self.duration;
            return TweenStep {
                value: self.to,
                overflow: Some(dt - remaining),
            };
        }
        self.elapsed += dt;
        TweenStep {
            value: self.value(),
            overflow: None,
        }
    }

    /// Value at the current time
    pub fn value(&self) -> T {
        T::interpolate(self.from, self.to, self.easing.apply(self.progress()))
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
