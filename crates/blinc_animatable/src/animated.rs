//! Animated values
//!
//! [`Animated`] is the value holder callers keep around. It shares a driver
//! with the frame callbacks it registers, keeps exactly one frame
//! registration while the driver is running, and delivers completion
//! callbacks with no borrow of the driver held, so callbacks are free to
//! start, stop or snap the same value again.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use blinc_animatable::{AnimateOptions, AnimatedValue, FrameScheduler, SpringConfig, TypeConverter};
//!
//! let scheduler = FrameScheduler::new();
//! let position = AnimatedValue::new((0.0, 0.0), TypeConverter::pair(), Rc::new(scheduler.handle()));
//!
//! position.animate_to((120.0, 40.0), AnimateOptions::new().spec(SpringConfig::gentle()));
//! assert!(position.is_running());
//!
//! let mut now = 0;
//! while scheduler.tick_at(now) {
//!     now += 16;
//! }
//! assert_eq!(position.value(), (120.0, 40.0));
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::bounded::BoundedDriver;
use crate::converter::TypeConverter;
use crate::driver::{AnimateOptions, AnimationDriver, Completions, Drive};
use crate::error::AnimationError;
use crate::scheduler::{FrameCallbackId, FrameClock};
use crate::vector::AnimationVector;

struct Shared<D: Drive> {
    driver: RefCell<D>,
    clock: Rc<dyn FrameClock>,
    frame: Cell<Option<FrameCallbackId>>,
}

impl<D: Drive> Drop for Shared<D> {
    fn drop(&mut self) {
        if let Some(id) = self.frame.take() {
            self.clock.unregister(id);
        }
        // A run still going when the last handle goes away ends as interrupted
        if let Some(stopped) = self.driver.get_mut().base_mut().stop() {
            stopped.notify();
        }
    }
}

/// An animated value driven by a frame clock
///
/// Clones share the same value. Dropping the last clone interrupts a
/// running animation, so its completion callback still fires.
pub struct Animated<D: Drive> {
    shared: Rc<Shared<D>>,
}

/// An animated value of any type with a vector encoding
pub type AnimatedValue<T, V> = Animated<AnimationDriver<T, V>>;

/// A bounded scalar with fling support
pub type AnimatedFloat = Animated<BoundedDriver>;

impl<D: Drive> Clone for Animated<D> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Clone + 'static, V: AnimationVector> AnimatedValue<T, V> {
    pub fn new(initial: T, converter: TypeConverter<T, V>, clock: Rc<dyn FrameClock>) -> Self {
        Self::with_driver(AnimationDriver::new(initial, converter), clock)
    }
}

impl AnimatedFloat {
    /// Create an unbounded scalar resting at `initial`
    pub fn new(initial: f32, clock: Rc<dyn FrameClock>) -> Self {
        Self::with_driver(BoundedDriver::new(initial), clock)
    }

    /// Restrict the value to `[min, max]`
    ///
    /// Returns an error and keeps the previous bounds if `max < min`.
    pub fn set_bounds(&self, min: f32, max: f32) -> Result<(), AnimationError> {
        self.shared.driver.borrow_mut().set_bounds(min, max)
    }

    pub fn min(&self) -> f32 {
        self.shared.driver.borrow().min()
    }

    pub fn max(&self) -> f32 {
        self.shared.driver.borrow().max()
    }
}

impl<D: Drive + 'static> Animated<D> {
    /// Wrap a driver; it starts idle
    pub fn with_driver(driver: D, clock: Rc<dyn FrameClock>) -> Self {
        Self {
            shared: Rc::new(Shared {
                driver: RefCell::new(driver),
                clock,
                frame: Cell::new(None),
            }),
        }
    }

    pub fn value(&self) -> D::Value {
        self.shared.driver.borrow().base().value()
    }

    pub fn velocity(&self) -> D::Vector {
        self.shared.driver.borrow().base().velocity()
    }

    pub fn target_value(&self) -> D::Value {
        self.shared.driver.borrow().base().target_value()
    }

    pub fn is_running(&self) -> bool {
        self.shared.driver.borrow().base().is_running()
    }

    /// Animate from the current value and velocity to `target`
    ///
    /// A running animation is interrupted first: its completion callback
    /// runs with [`EndReason::Interrupted`](crate::EndReason::Interrupted) before the new curve is built,
    /// and the new curve continues from the velocity reached so far.
    pub fn animate_to(&self, target: D::Value, options: AnimateOptions<D::Value>) {
        self.interrupt();
        let AnimateOptions { spec, on_end } = options;
        self.update(|driver| driver.animate_to(target, &spec, on_end));
    }

    /// Jump to `target` immediately, stopping any running animation
    ///
    /// The value is assigned before the stopped run's callback is invoked.
    pub fn snap_to(&self, target: D::Value) {
        self.update(|driver| {
            let stopped = driver.base_mut().stop();
            driver.snap(target);
            stopped.into_iter().collect()
        });
    }

    /// Stop a running animation where it is
    pub fn stop(&self) {
        self.update(|driver| driver.base_mut().stop().into_iter().collect());
    }

    /// Get a weak handle that does not keep the value alive
    pub fn downgrade(&self) -> WeakAnimated<D> {
        WeakAnimated {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Deliver the pending callback of a run that is about to be replaced
    pub(crate) fn interrupt(&self) {
        let interruption = self.shared.driver.borrow_mut().base_mut().take_interruption();
        if let Some(interruption) = interruption {
            interruption.notify();
        }
    }

    /// Apply a driver operation, then sync the frame registration and
    /// deliver whatever completions it produced
    pub(crate) fn update<F>(&self, operation: F)
    where
        F: FnOnce(&mut D) -> Completions<D::Value>,
    {
        let completions = operation(&mut self.shared.driver.borrow_mut());
        self.finish(completions);
    }

    fn finish(&self, mut completions: Completions<D::Value>) {
        if !self.sync_frame() {
            tracing::warn!("Animated: frame clock refused registration, run interrupted");
            completions.extend(self.shared.driver.borrow_mut().base_mut().stop());
        }
        if completions.is_empty() {
            return;
        }
        for completion in completions {
            completion.notify();
        }
        self.shared.driver.borrow_mut().base_mut().settle();
    }

    /// Keep one frame registration while running and none while idle
    ///
    /// Returns false if the driver is running but the clock can no longer
    /// schedule a frame for it.
    fn sync_frame(&self) -> bool {
        let running = self.is_running();
        match (running, self.shared.frame.get()) {
            (true, Some(_)) if !self.shared.clock.is_alive() => {
                // The pending frame died with the clock
                self.shared.frame.set(None);
                false
            }
            (true, None) => {
                let weak = Rc::downgrade(&self.shared);
                let id = self
                    .shared
                    .clock
                    .register_next_frame(Box::new(move |frame_time| {
                        if let Some(shared) = weak.upgrade() {
                            Animated { shared }.on_frame(frame_time);
                        }
                    }));
                self.shared.frame.set(id);
                id.is_some()
            }
            (false, Some(id)) => {
                self.shared.frame.set(None);
                self.shared.clock.unregister(id);
                true
            }
            _ => true,
        }
    }

    fn on_frame(&self, frame_time: u64) {
        // The registration that got us here is spent
        self.shared.frame.set(None);
        self.update(|driver| driver.advance(frame_time).into_iter().collect());
    }
}

/// Non-owning reference to an [`Animated`] value
pub struct WeakAnimated<D: Drive> {
    shared: Weak<Shared<D>>,
}

impl<D: Drive> Clone for WeakAnimated<D> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<D: Drive> WeakAnimated<D> {
    pub fn upgrade(&self) -> Option<Animated<D>> {
        self.shared.upgrade().map(|shared| Animated { shared })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationSpec;
    use crate::driver::EndReason;
    use crate::easing::Easing;
    use crate::scheduler::FrameScheduler;
    use crate::vector::AnimationVector1D;

    fn float(scheduler: &FrameScheduler, initial: f32) -> AnimatedFloat {
        AnimatedFloat::new(initial, Rc::new(scheduler.handle()))
    }

    fn linear(duration_ms: u32) -> AnimateOptions<f32> {
        AnimateOptions::new().spec(AnimationSpec::tween(duration_ms, Easing::Linear))
    }

    #[test]
    fn test_running_value_keeps_one_registration() {
        let scheduler = FrameScheduler::new();
        let value = float(&scheduler, 0.0);

        value.animate_to(10.0, linear(100));
        assert_eq!(scheduler.pending_count(), 1);

        // Retarget while running does not register twice
        value.animate_to(20.0, linear(100));
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.tick_at(0);
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_stop_releases_registration() {
        let scheduler = FrameScheduler::new();
        let value = float(&scheduler, 0.0);

        value.animate_to(10.0, linear(100));
        scheduler.tick_at(0);
        scheduler.tick_at(50);
        value.stop();

        assert!(!value.is_running());
        assert_eq!(scheduler.pending_count(), 0);
        assert!((value.value() - 5.0).abs() < 1e-4);
        assert_eq!(value.velocity(), AnimationVector1D::zero());
    }

    #[test]
    fn test_drop_releases_registration() {
        let scheduler = FrameScheduler::new();
        let value = float(&scheduler, 0.0);
        value.animate_to(10.0, linear(100));
        assert_eq!(scheduler.pending_count(), 1);

        drop(value);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_drop_interrupts_running_value() {
        let scheduler = FrameScheduler::new();
        let ended = Rc::new(Cell::new(None));

        let value = float(&scheduler, 0.0);
        let slot = ended.clone();
        value.animate_to(
            10.0,
            linear(100).on_end(move |reason, v| slot.set(Some((reason, v)))),
        );
        scheduler.tick_at(0);
        scheduler.tick_at(30);

        let clone = value.clone();
        drop(value);
        assert_eq!(ended.get(), None);

        drop(clone);
        let (reason, v) = ended.get().expect("callback fired on drop");
        assert_eq!(reason, EndReason::Interrupted);
        assert!((v - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_dropped_clock_interrupts_run() {
        let handle = FrameScheduler::new().handle();
        let value = AnimatedFloat::new(0.0, Rc::new(handle));
        let ended = Rc::new(Cell::new(None));

        let slot = ended.clone();
        value.animate_to(
            10.0,
            linear(100).on_end(move |reason, v| slot.set(Some((reason, v)))),
        );

        assert!(!value.is_running());
        assert_eq!(value.value(), 0.0);
        assert_eq!(ended.get(), Some((EndReason::Interrupted, 0.0)));

        // Snapping needs no clock
        value.snap_to(4.0);
        assert_eq!(value.value(), 4.0);
    }

    #[test]
    fn test_weak_handle() {
        let scheduler = FrameScheduler::new();
        let value = float(&scheduler, 2.0);
        let weak = value.downgrade();

        assert_eq!(weak.upgrade().map(|v| v.value()), Some(2.0));
        drop(value);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let scheduler = FrameScheduler::new();
        let value = float(&scheduler, 0.0);
        let other = value.clone();

        other.snap_to(7.0);
        assert_eq!(value.value(), 7.0);
    }

    #[test]
    fn test_bounds_through_handle() {
        let scheduler = FrameScheduler::new();
        let value = float(&scheduler, 0.0);

        assert!(value.set_bounds(10.0, 0.0).is_err());
        value.set_bounds(0.0, 1.0).unwrap();
        assert_eq!((value.min(), value.max()), (0.0, 1.0));

        value.snap_to(3.0);
        assert_eq!(value.value(), 1.0);
    }
}
