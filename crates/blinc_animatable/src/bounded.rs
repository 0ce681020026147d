//! Bounded scalar driver
//!
//! Bounds are not applied to the curve. A curve may still be moving when it
//! crosses a bound, so the driver lets the frame run, then clamps the result
//! and ends the run with [`EndReason::BoundReached`]. Curves that finish as
//! soon as they start are clamped the same way.

use crate::animation::Animation;
use crate::converter::TypeConverter;
use crate::driver::{AnimationDriver, Completion, Completions, Drive, EndReason, OnEnd};
use crate::error::AnimationError;
use crate::vector::AnimationVector1D;

/// A scalar driver confined to `[min, max]`
pub struct BoundedDriver {
    base: AnimationDriver<f32, AnimationVector1D>,
    min: f32,
    max: f32,
}

impl BoundedDriver {
    /// Create an unbounded driver resting at `initial`
    pub fn new(initial: f32) -> Self {
        Self {
            base: AnimationDriver::new(initial, TypeConverter::float()),
            min: f32::NEG_INFINITY,
            max: f32::INFINITY,
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Set the allowed range
    ///
    /// Rejects `max < min` and NaN bounds, keeping the previous range.
    /// The new range applies from the next snap or frame.
    pub fn set_bounds(&mut self, min: f32, max: f32) -> Result<(), AnimationError> {
        // Negated comparison also rejects NaN
        if !(min <= max) {
            tracing::warn!("BoundedDriver: rejected bounds [{}, {}]", min, max);
            return Err(AnimationError::InvalidBounds { min, max });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

impl Drive for BoundedDriver {
    type Value = f32;
    type Vector = AnimationVector1D;

    fn base(&self) -> &AnimationDriver<f32, AnimationVector1D> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationDriver<f32, AnimationVector1D> {
        &mut self.base
    }

    fn start_toward(
        &mut self,
        target: f32,
        animation: Box<dyn Animation<f32, AnimationVector1D>>,
        on_end: Option<OnEnd<f32>>,
    ) -> Completions<f32> {
        let mut completions = self.base.start_toward(target, animation, on_end);
        if self.base.is_running() {
            return completions;
        }

        // Finished at elapsed 0: the run already ended, so only the value moves
        let value = self.base.value();
        let clamped = self.clamp(value);
        if clamped != value {
            tracing::debug!(
                "BoundedDriver: {} clamped to [{}, {}] on start",
                value,
                self.min,
                self.max
            );
            self.base.set_value(clamped);
            if let Some(finished) = completions.last_mut() {
                finished.set_value(clamped);
            }
        }
        completions
    }

    fn advance(&mut self, frame_time: u64) -> Option<Completion<f32>> {
        if !self.base.is_running() {
            return None;
        }

        let mut completion = self.base.advance(frame_time);

        let value = self.base.value();
        let clamped = self.clamp(value);
        if clamped != value {
            self.base.set_value(clamped);
            match completion.as_mut() {
                // Curve finished on this frame anyway; report the clamped value
                Some(finished) => finished.set_value(clamped),
                None => {
                    tracing::debug!(
                        "BoundedDriver: {} crossed [{}, {}]",
                        value,
                        self.min,
                        self.max
                    );
                    completion = Some(self.base.end_animation(EndReason::BoundReached));
                }
            }
        }

        completion
    }

    fn snap(&mut self, target: f32) {
        let clamped = self.clamp(target);
        self.base.assign(clamped);
    }
}
