//! Animation driver state machine
//!
//! [`AnimationDriver`] owns everything about one animated value: the current
//! value and velocity, the target, the active curve and the pending
//! completion callback. It is a plain state machine. It does not talk to the
//! frame clock and never calls user code; operations that end a run hand
//! back a [`Completion`] for the caller to deliver once it has released any
//! borrow of the driver. [`Animated`](crate::Animated) is that caller.
//!
//! A run goes through these steps:
//!
//! 1. **Start**: a curve is installed. A curve that is already finished at
//!    elapsed time 0 ends the run on the spot with
//!    [`EndReason::TargetReached`].
//! 2. **Frames**: [`advance`](AnimationDriver::advance) samples the curve at
//!    `frame_time - start_time`. The first frame of a run anchors
//!    `start_time`.
//! 3. **Retarget**: starting a curve while running keeps the clock going.
//!    The new curve's time zero is the last frame the old one saw.
//! 4. **End**: the run stops, and the callback slot is emptied into a
//!    [`Completion`]. Velocity drops to zero only after the completion has
//!    been delivered (see [`settle`](AnimationDriver::settle)).

use smallvec::SmallVec;

use crate::animation::{Animation, AnimationSpec};
use crate::converter::TypeConverter;
use crate::vector::AnimationVector;

/// Why a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// The curve reported that it finished
    TargetReached,
    /// A bounded value crossed one of its bounds
    BoundReached,
    /// A new animation or an explicit stop took over
    Interrupted,
}

/// Completion callback, invoked with the end reason and the value at the end
pub type OnEnd<T> = Box<dyn FnOnce(EndReason, T)>;

/// A run's completion waiting to be delivered
#[must_use = "a completion must be notified or its callback never fires"]
pub struct Completion<T> {
    on_end: Option<OnEnd<T>>,
    reason: EndReason,
    value: T,
}

impl<T> Completion<T> {
    pub(crate) fn new(on_end: Option<OnEnd<T>>, reason: EndReason, value: T) -> Self {
        Self {
            on_end,
            reason,
            value,
        }
    }

    pub fn reason(&self) -> EndReason {
        self.reason
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: T) {
        self.value = value;
    }

    /// Invoke the completion callback, if there was one
    pub fn notify(self) {
        if let Some(on_end) = self.on_end {
            on_end(self.reason, self.value);
        }
    }
}

/// Completions produced by a single driver operation, in delivery order
pub type Completions<T> = SmallVec<[Completion<T>; 2]>;

/// Options for [`Animated::animate_to`](crate::Animated::animate_to)
pub struct AnimateOptions<T> {
    /// Curve used to reach the target
    pub spec: AnimationSpec,
    /// Called once when this run ends, whatever the reason
    pub on_end: Option<OnEnd<T>>,
}

impl<T> AnimateOptions<T> {
    /// Default spring, no completion callback
    pub fn new() -> Self {
        Self {
            spec: AnimationSpec::default(),
            on_end: None,
        }
    }

    pub fn spec(mut self, spec: impl Into<AnimationSpec>) -> Self {
        self.spec = spec.into();
        self
    }

    pub fn on_end<F>(mut self, on_end: F) -> Self
    where
        F: FnOnce(EndReason, T) + 'static,
    {
        self.on_end = Some(Box::new(on_end));
        self
    }
}

impl<T> Default for AnimateOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The animation state machine for one value
pub struct AnimationDriver<T, V> {
    converter: TypeConverter<T, V>,
    value: T,
    velocity: V,
    target_value: T,
    running: bool,
    start_time: Option<u64>,
    last_frame_time: Option<u64>,
    animation: Option<Box<dyn Animation<T, V>>>,
    on_end: Option<OnEnd<T>>,
}

impl<T: Clone + 'static, V: AnimationVector> AnimationDriver<T, V> {
    /// Create an idle driver resting at `initial`
    pub fn new(initial: T, converter: TypeConverter<T, V>) -> Self {
        Self {
            converter,
            target_value: initial.clone(),
            value: initial,
            velocity: V::zero(),
            running: false,
            start_time: None,
            last_frame_time: None,
            animation: None,
            on_end: None,
        }
    }

    pub fn value(&self) -> T {
        self.value.clone()
    }

    pub fn velocity(&self) -> V {
        self.velocity
    }

    pub fn target_value(&self) -> T {
        self.target_value.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frame time the current run's curve counts from
    pub fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    pub fn last_frame_time(&self) -> Option<u64> {
        self.last_frame_time
    }

    pub fn converter(&self) -> TypeConverter<T, V> {
        self.converter
    }

    pub(crate) fn set_value(&mut self, value: T) {
        self.value = value;
    }

    pub(crate) fn set_target_value(&mut self, target: T) {
        self.target_value = target;
    }

    /// Take the pending callback of a running animation that is about to be
    /// superseded. The run itself keeps going; the next start retargets it.
    pub fn take_interruption(&mut self) -> Option<Completion<T>> {
        if !self.running {
            return None;
        }
        tracing::debug!("AnimationDriver: run interrupted by a new animation");
        Some(Completion::new(
            self.on_end.take(),
            EndReason::Interrupted,
            self.value.clone(),
        ))
    }

    /// Start a target-based curve from the current value and velocity
    pub fn animate_to(
        &mut self,
        target: T,
        spec: &AnimationSpec,
        on_end: Option<OnEnd<T>>,
    ) -> Completions<T> {
        let animation = spec.build(self.converter, &self.value, &target, self.velocity);
        self.start_toward(target, Box::new(animation), on_end)
    }

    /// Install `animation` as the curve heading to `target` and start it
    pub fn start_toward(
        &mut self,
        target: T,
        animation: Box<dyn Animation<T, V>>,
        on_end: Option<OnEnd<T>>,
    ) -> Completions<T> {
        self.target_value = target;

        let mut completions = Completions::new();
        // A callback that ran during the interruption may have started a run
        // of its own; that run is superseded here.
        if let Some(displaced) = std::mem::replace(&mut self.on_end, on_end) {
            completions.push(Completion::new(
                Some(displaced),
                EndReason::Interrupted,
                self.value.clone(),
            ));
        }
        completions.extend(self.start_animation(animation));
        completions
    }

    /// Install `animation` and begin (or retarget) a run
    pub fn start_animation(
        &mut self,
        animation: Box<dyn Animation<T, V>>,
    ) -> Option<Completion<T>> {
        if animation.is_finished(0) {
            self.value = animation.value_at(0);
            self.velocity = animation.velocity_at(0);
            self.animation = Some(animation);
            return Some(self.end_animation(EndReason::TargetReached));
        }

        self.animation = Some(animation);
        if self.running {
            tracing::debug!(
                "AnimationDriver: retargeted, clock continues from {:?}",
                self.last_frame_time
            );
            self.start_time = self.last_frame_time;
        } else {
            tracing::debug!("AnimationDriver: run started");
            self.start_time = None;
            self.running = true;
        }
        None
    }

    /// Sample the active curve for a frame
    ///
    /// Returns the completion if the curve finished on this frame.
    pub fn advance(&mut self, frame_time: u64) -> Option<Completion<T>> {
        if !self.running {
            return None;
        }

        let start_time = *self.start_time.get_or_insert(frame_time);
        let elapsed = frame_time.saturating_sub(start_time);
        self.last_frame_time = Some(frame_time);

        let animation = self.animation.as_ref()?;
        self.value = animation.value_at(elapsed);
        self.velocity = animation.velocity_at(elapsed);
        let finished = animation.is_finished(elapsed);

        tracing::trace!(
            "AnimationDriver: frame {}ms, elapsed {}ms, finished={}",
            frame_time,
            elapsed,
            finished
        );

        finished.then(|| self.end_animation(EndReason::TargetReached))
    }

    /// End the current run with `reason`
    ///
    /// The velocity is left untouched so the completion callback can still
    /// read it; call [`settle`](Self::settle) after delivery.
    pub fn end_animation(&mut self, reason: EndReason) -> Completion<T> {
        tracing::debug!("AnimationDriver: run ended ({:?})", reason);
        self.running = false;
        self.start_time = None;
        self.last_frame_time = None;
        self.animation = None;
        Completion::new(self.on_end.take(), reason, self.value.clone())
    }

    /// End the current run as interrupted; no-op when idle
    pub fn stop(&mut self) -> Option<Completion<T>> {
        if !self.running {
            return None;
        }
        Some(self.end_animation(EndReason::Interrupted))
    }

    /// Jump to `target` without a curve. The driver must be idle.
    pub fn assign(&mut self, target: T) {
        debug_assert!(!self.running, "assign() on a running driver");
        self.value = target.clone();
        self.target_value = target;
    }

    /// Zero the velocity of an idle driver once its completion was delivered
    pub fn settle(&mut self) {
        if !self.running {
            self.velocity = V::zero();
        }
    }
}

/// A driver that can be plugged into [`Animated`](crate::Animated)
///
/// Variants wrap an [`AnimationDriver`] and override the frame step or the
/// snap step where they need extra rules.
pub trait Drive {
    type Value: Clone + 'static;
    type Vector: AnimationVector;

    fn base(&self) -> &AnimationDriver<Self::Value, Self::Vector>;

    fn base_mut(&mut self) -> &mut AnimationDriver<Self::Value, Self::Vector>;

    /// Start step: install `animation` as the curve heading to `target`
    ///
    /// May end the run on the spot if the curve is finished at elapsed 0.
    fn start_toward(
        &mut self,
        target: Self::Value,
        animation: Box<dyn Animation<Self::Value, Self::Vector>>,
        on_end: Option<OnEnd<Self::Value>>,
    ) -> Completions<Self::Value> {
        self.base_mut().start_toward(target, animation, on_end)
    }

    /// Build a target-based curve from the current value and velocity, then
    /// start it through [`start_toward`](Self::start_toward)
    fn animate_to(
        &mut self,
        target: Self::Value,
        spec: &AnimationSpec,
        on_end: Option<OnEnd<Self::Value>>,
    ) -> Completions<Self::Value> {
        let base = self.base();
        let animation = spec.build(base.converter(), &base.value(), &target, base.velocity());
        self.start_toward(target, Box::new(animation), on_end)
    }

    /// Frame step
    fn advance(&mut self, frame_time: u64) -> Option<Completion<Self::Value>> {
        self.base_mut().advance(frame_time)
    }

    /// Assignment part of a snap; the run has already been stopped
    fn snap(&mut self, target: Self::Value) {
        self.base_mut().assign(target);
    }
}

impl<T: Clone + 'static, V: AnimationVector> Drive for AnimationDriver<T, V> {
    type Value = T;
    type Vector = V;

    fn base(&self) -> &AnimationDriver<T, V> {
        self
    }

    fn base_mut(&mut self) -> &mut AnimationDriver<T, V> {
        self
    }
}
