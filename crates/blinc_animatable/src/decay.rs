//! Decay (fling) curves
//!
//! A decay curve has no target of its own: it starts with a velocity and
//! slows down under friction until the velocity is negligible. The resting
//! point is a projection of the friction model.

use std::rc::Rc;

use crate::animation::Animation;
use crate::error::AnimationError;
use crate::vector::AnimationVector1D;

/// Friction model for free-running deceleration of a scalar
pub trait DecayModel {
    /// Where a value starting at `initial` with `start_velocity` comes to rest
    fn target_value(&self, initial: f32, start_velocity: f32) -> f32;

    /// Value after `play_time_ms`
    fn value_at(&self, play_time_ms: u64, initial: f32, start_velocity: f32) -> f32;

    /// Velocity after `play_time_ms`, in units per second
    fn velocity_at(&self, play_time_ms: u64, initial: f32, start_velocity: f32) -> f32;

    /// Play time until the velocity drops below the model's threshold
    fn duration_ms(&self, initial: f32, start_velocity: f32) -> u64;
}

/// Exponential friction: `v(t) = v0 * e^(-4.2 * friction_multiplier * t)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExponentialDecay {
    friction_multiplier: f32,
    abs_velocity_threshold: f32,
}

impl ExponentialDecay {
    const FRICTION_SCALE: f32 = -4.2;

    /// Create a decay model
    ///
    /// `friction_multiplier` scales the friction; higher values stop sooner.
    /// `abs_velocity_threshold` is the speed (units per second) at which the
    /// decay is considered finished; its sign is ignored. Both must be
    /// positive and finite.
    pub fn new(
        friction_multiplier: f32,
        abs_velocity_threshold: f32,
    ) -> Result<Self, AnimationError> {
        let threshold = abs_velocity_threshold.abs();
        let valid = |x: f32| x.is_finite() && x > 0.0;
        if !valid(friction_multiplier) || !valid(threshold) {
            tracing::warn!(
                "ExponentialDecay: rejected friction {} / threshold {}",
                friction_multiplier,
                abs_velocity_threshold
            );
            return Err(AnimationError::InvalidDecay {
                friction_multiplier,
                abs_velocity_threshold,
            });
        }
        Ok(Self {
            friction_multiplier,
            abs_velocity_threshold: threshold,
        })
    }

    pub fn friction_multiplier(&self) -> f32 {
        self.friction_multiplier
    }

    pub fn abs_velocity_threshold(&self) -> f32 {
        self.abs_velocity_threshold
    }

    fn friction(&self) -> f32 {
        self.friction_multiplier * Self::FRICTION_SCALE
    }
}

impl Default for ExponentialDecay {
    fn default() -> Self {
        Self {
            friction_multiplier: 1.0,
            abs_velocity_threshold: 0.1,
        }
    }
}

impl DecayModel for ExponentialDecay {
    fn target_value(&self, initial: f32, start_velocity: f32) -> f32 {
        initial - start_velocity / self.friction()
    }

    fn value_at(&self, play_time_ms: u64, initial: f32, start_velocity: f32) -> f32 {
        let friction = self.friction();
        let t = play_time_ms as f32 / 1000.0;
        initial - start_velocity / friction + start_velocity / friction * (friction * t).exp()
    }

    fn velocity_at(&self, play_time_ms: u64, _initial: f32, start_velocity: f32) -> f32 {
        let t = play_time_ms as f32 / 1000.0;
        start_velocity * (self.friction() * t).exp()
    }

    fn duration_ms(&self, _initial: f32, start_velocity: f32) -> u64 {
        let speed = start_velocity.abs();
        if speed <= self.abs_velocity_threshold {
            return 0;
        }
        let seconds = (self.abs_velocity_threshold / speed).ln() / self.friction();
        (seconds * 1000.0).ceil() as u64
    }
}

/// A scalar curve produced by a [`DecayModel`]
pub struct DecayAnimation {
    model: Rc<dyn DecayModel>,
    initial: f32,
    start_velocity: f32,
    target: f32,
    duration_ms: u64,
}

impl DecayAnimation {
    pub fn new(model: Rc<dyn DecayModel>, initial: f32, start_velocity: f32) -> Self {
        let target = model.target_value(initial, start_velocity);
        let duration_ms = model.duration_ms(initial, start_velocity);
        Self {
            model,
            initial,
            start_velocity,
            target,
            duration_ms,
        }
    }

    /// Projected resting point
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

impl Animation<f32, AnimationVector1D> for DecayAnimation {
    fn value_at(&self, play_time_ms: u64) -> f32 {
        self.model
            .value_at(play_time_ms, self.initial, self.start_velocity)
    }

    fn velocity_at(&self, play_time_ms: u64) -> AnimationVector1D {
        AnimationVector1D::new(
            self.model
                .velocity_at(play_time_ms, self.initial, self.start_velocity),
        )
    }

    fn is_finished(&self, play_time_ms: u64) -> bool {
        play_time_ms >= self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projected_target() {
        let decay = ExponentialDecay::default();
        let target = decay.target_value(0.0, 420.0);
        assert!((target - 100.0).abs() < 1e-3);

        // Negative velocity moves the other way
        assert!(decay.target_value(50.0, -420.0) < 50.0);
    }

    #[test]
    fn test_value_approaches_target() {
        let decay = ExponentialDecay::default();
        let target = decay.target_value(0.0, 1000.0);
        let duration = decay.duration_ms(0.0, 1000.0);

        assert_eq!(decay.value_at(0, 0.0, 1000.0), 0.0);
        assert!(decay.value_at(duration / 2, 0.0, 1000.0) < target);
        assert!((decay.value_at(duration, 0.0, 1000.0) - target).abs() < 0.1);
        assert!(decay.velocity_at(duration, 0.0, 1000.0).abs() <= 0.1 + 1e-3);
    }

    #[test]
    fn test_slow_fling_is_finished_immediately() {
        let animation = DecayAnimation::new(Rc::new(ExponentialDecay::default()), 10.0, 0.05);
        assert_eq!(animation.duration_ms(), 0);
        assert!(animation.is_finished(0));
    }

    #[test]
    fn test_higher_friction_stops_sooner() {
        let loose = ExponentialDecay::new(0.5, 0.1).unwrap();
        let tight = ExponentialDecay::new(2.0, 0.1).unwrap();
        assert!(tight.duration_ms(0.0, 800.0) < loose.duration_ms(0.0, 800.0));
        assert!(tight.target_value(0.0, 800.0) < loose.target_value(0.0, 800.0));
    }

    #[test]
    fn test_degenerate_decay_is_rejected() {
        for (friction, threshold) in [
            (0.0, 0.1),
            (-1.0, 0.1),
            (f32::NAN, 0.1),
            (f32::INFINITY, 0.1),
            (1.0, 0.0),
            (1.0, f32::NAN),
        ] {
            assert!(
                ExponentialDecay::new(friction, threshold).is_err(),
                "friction {friction}, threshold {threshold}"
            );
        }

        assert_eq!(
            ExponentialDecay::new(0.0, 0.1),
            Err(AnimationError::InvalidDecay {
                friction_multiplier: 0.0,
                abs_velocity_threshold: 0.1,
            })
        );

        // Threshold sign is ignored
        let decay = ExponentialDecay::new(1.0, -0.1).unwrap();
        assert_eq!(decay.abs_velocity_threshold(), 0.1);
        assert_eq!(decay, ExponentialDecay::default());
    }
}
