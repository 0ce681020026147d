//! Fling
//!
//! A fling starts a bounded scalar moving with a release velocity and lets
//! a [`DecayModel`] bring it to rest. The projected resting point can be
//! redirected, e.g. to the nearest snap point, in which case a target-based
//! curve takes over from the same release velocity.

use std::rc::Rc;

use crate::animated::AnimatedFloat;
use crate::animation::AnimationSpec;
use crate::decay::{DecayAnimation, DecayModel, ExponentialDecay};
use crate::driver::{Drive, EndReason, OnEnd};
use crate::vector::AnimationVector1D;

/// Fling completion callback: end reason, final value and the velocity left
/// at the moment the run ended
pub type FlingEnd = Box<dyn FnOnce(EndReason, f32, f32)>;

/// Replacement target for a fling
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetOverride {
    pub target: f32,
    /// Curve used to reach `target` from the release velocity
    pub spec: AnimationSpec,
}

impl TargetOverride {
    pub fn new(target: f32, spec: impl Into<AnimationSpec>) -> Self {
        Self {
            target,
            spec: spec.into(),
        }
    }
}

/// Called with the projected resting point; `Some` redirects the fling
pub type AdjustTarget = Box<dyn FnOnce(f32) -> Option<TargetOverride>>;

/// Options for [`AnimatedFloat::fling`]
pub struct FlingOptions {
    pub decay: Rc<dyn DecayModel>,
    pub adjust_target: Option<AdjustTarget>,
    pub on_end: Option<FlingEnd>,
}

impl FlingOptions {
    /// Default exponential decay, no redirect, no callback
    pub fn new() -> Self {
        Self {
            decay: Rc::new(ExponentialDecay::default()),
            adjust_target: None,
            on_end: None,
        }
    }

    pub fn decay(mut self, decay: impl DecayModel + 'static) -> Self {
        self.decay = Rc::new(decay);
        self
    }

    pub fn adjust_target<F>(mut self, adjust: F) -> Self
    where
        F: FnOnce(f32) -> Option<TargetOverride> + 'static,
    {
        self.adjust_target = Some(Box::new(adjust));
        self
    }

    pub fn on_end<F>(mut self, on_end: F) -> Self
    where
        F: FnOnce(EndReason, f32, f32) + 'static,
    {
        self.on_end = Some(Box::new(on_end));
        self
    }
}

impl Default for FlingOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatedFloat {
    /// Start a decay run with `start_velocity` (units per second)
    ///
    /// A running animation is interrupted first. The target becomes the
    /// decay's projected resting point, unless `adjust_target` redirects it.
    pub fn fling(&self, start_velocity: f32, options: FlingOptions) {
        self.interrupt();

        let FlingOptions {
            decay,
            adjust_target,
            on_end,
        } = options;
        let on_end = on_end.map(|on_end| self.with_remaining_velocity(on_end));

        let projected = decay.target_value(self.value(), start_velocity);
        let redirect = adjust_target.and_then(|adjust| adjust(projected));

        self.update(move |driver| {
            let initial = driver.base().value();
            match redirect {
                None => {
                    tracing::debug!(
                        "AnimatedFloat: fling at {}/s from {} toward {}",
                        start_velocity,
                        initial,
                        projected
                    );
                    let animation = DecayAnimation::new(decay, initial, start_velocity);
                    driver.start_toward(animation.target(), Box::new(animation), on_end)
                }
                Some(TargetOverride { target, spec }) => {
                    tracing::debug!(
                        "AnimatedFloat: fling redirected from {} to {}",
                        projected,
                        target
                    );
                    let animation = spec.build(
                        driver.base().converter(),
                        &initial,
                        &target,
                        AnimationVector1D::new(start_velocity),
                    );
                    driver.start_toward(target, Box::new(animation), on_end)
                }
            }
        });
    }

    /// Adapt a fling callback, reading the velocity when the run ends
    fn with_remaining_velocity(&self, on_end: FlingEnd) -> OnEnd<f32> {
        let weak = self.downgrade();
        Box::new(move |reason, value| {
            let remaining = weak.upgrade().map_or(0.0, |animated| animated.velocity().v1);
            on_end(reason, value, remaining);
        })
    }
}
