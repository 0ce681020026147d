//! Blinc Animatable Values
//!
//! A per-frame driver for animated values: a value is moved toward a target
//! by a time-parameterized curve that is advanced once per display frame.
//!
//! # Features
//!
//! - **Retargeting**: `animate_to` on a running value swaps the curve without
//!   resetting its clock, and the new curve inherits the current velocity
//! - **Completion Callbacks**: every run reports exactly one [`EndReason`]
//! - **Bounds**: [`AnimatedFloat`] clamps to `[min, max]` and stops on contact
//! - **Fling**: decay animations seeded by a release velocity, optionally
//!   redirected to a snap point
//! - **Injectable Frame Clock**: drivers only talk to a [`FrameClock`], so a
//!   [`FrameScheduler`] can be ticked by hand in tests
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use blinc_animatable::{AnimateOptions, AnimatedFloat, AnimationSpec, Easing, FrameScheduler};
//!
//! let scheduler = FrameScheduler::new();
//! let offset = AnimatedFloat::new(0.0, Rc::new(scheduler.handle()));
//!
//! offset.animate_to(
//!     100.0,
//!     AnimateOptions::new().spec(AnimationSpec::tween(100, Easing::Linear)),
//! );
//!
//! let mut now = 0;
//! while scheduler.tick_at(now) {
//!     now += 16;
//! }
//! assert_eq!(offset.value(), 100.0);
//! assert!(!offset.is_running());
//! ```

pub mod animated;
pub mod animation;
pub mod bounded;
pub mod converter;
pub mod decay;
pub mod driver;
pub mod easing;
pub mod error;
pub mod fling;
pub mod scheduler;
pub mod spring;
pub mod vector;

pub use animated::{Animated, AnimatedFloat, AnimatedValue, WeakAnimated};
pub use animation::{Animation, AnimationSpec, TargetBasedAnimation};
pub use bounded::BoundedDriver;
pub use converter::TypeConverter;
pub use decay::{DecayAnimation, DecayModel, ExponentialDecay};
pub use driver::{AnimateOptions, AnimationDriver, Completion, Completions, Drive, EndReason, OnEnd};
pub use easing::Easing;
pub use error::AnimationError;
pub use fling::{AdjustTarget, FlingEnd, FlingOptions, TargetOverride};
pub use scheduler::{FrameCallback, FrameCallbackId, FrameClock, FrameScheduler, SchedulerHandle};
pub use spring::SpringConfig;
pub use vector::{
    AnimationVector, AnimationVector1D, AnimationVector2D, AnimationVector3D, AnimationVector4D,
};
