//! Frame clock
//!
//! Animated values never read time on their own. They ask a [`FrameClock`]
//! for a one-shot callback on the next frame, and the clock hands them the
//! frame timestamp when it fires. [`FrameScheduler`] is the stock clock:
//! the platform event loop calls [`FrameScheduler::tick`] once per display
//! refresh, and tests call [`FrameScheduler::tick_at`] with virtual time.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

new_key_type! {
    /// Handle to a pending frame callback
    pub struct FrameCallbackId;
}

/// One-shot callback receiving the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(u64)>;

/// Source of per-frame callbacks
///
/// Timestamps passed to callbacks never decrease.
pub trait FrameClock {
    /// Run `callback` once on the next frame
    ///
    /// Returns `None` if the clock can no longer produce frames; the callback
    /// is dropped without running.
    fn register_next_frame(&self, callback: FrameCallback) -> Option<FrameCallbackId>;

    /// Drop a pending callback; unknown or already-fired ids are ignored
    fn unregister(&self, id: FrameCallbackId);

    /// Check if the clock still produces frames
    ///
    /// Once this is false, pending callbacks will never run.
    fn is_alive(&self) -> bool {
        true
    }
}

struct SchedulerInner {
    callbacks: SlotMap<FrameCallbackId, FrameCallback>,
    last_frame_time: Option<u64>,
    origin: Instant,
}

/// A frame clock ticked by the owner once per frame
///
/// Clones share the same pending callbacks.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                callbacks: SlotMap::with_key(),
                last_frame_time: None,
                origin: Instant::now(),
            })),
        }
    }

    /// Get a weak handle to this scheduler for passing to animated values
    ///
    /// The handle does not keep the scheduler alive; once the scheduler is
    /// dropped, registrations through the handle are discarded.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Run a frame stamped with the wall time since the scheduler was created
    ///
    /// Returns true if callbacks are waiting for another frame.
    pub fn tick(&self) -> bool {
        let now = self.inner.borrow().origin.elapsed().as_millis() as u64;
        self.tick_at(now)
    }

    /// Run a frame with an explicit timestamp in milliseconds
    ///
    /// Every callback registered before this call runs exactly once.
    /// Callbacks registered while the frame runs wait for the next frame, and
    /// callbacks unregistered while the frame runs do not fire. A timestamp
    /// earlier than the previous frame is raised to the previous frame's.
    ///
    /// Returns true if callbacks are waiting for another frame.
    pub fn tick_at(&self, frame_time: u64) -> bool {
        let (frame_time, due) = {
            let mut inner = self.inner.borrow_mut();
            let frame_time = inner
                .last_frame_time
                .map_or(frame_time, |last| frame_time.max(last));
            inner.last_frame_time = Some(frame_time);
            let due: SmallVec<[FrameCallbackId; 8]> = inner.callbacks.keys().collect();
            (frame_time, due)
        };

        if !due.is_empty() {
            tracing::trace!("FrameScheduler: frame {}ms, {} callbacks", frame_time, due.len());
        }

        for id in due {
            // Removed one at a time so earlier callbacks can cancel later ones
            let callback = self.inner.borrow_mut().callbacks.remove(id);
            if let Some(callback) = callback {
                callback(frame_time);
            }
        }

        self.has_pending()
    }

    /// Check if any callbacks are waiting for the next frame
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().callbacks.is_empty()
    }

    /// Get the number of callbacks waiting for the next frame
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    /// Timestamp of the most recent frame
    pub fn last_frame_time(&self) -> Option<u64> {
        self.inner.borrow().last_frame_time
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for FrameScheduler {
    fn register_next_frame(&self, callback: FrameCallback) -> Option<FrameCallbackId> {
        Some(self.inner.borrow_mut().callbacks.insert(callback))
    }

    fn unregister(&self, id: FrameCallbackId) {
        self.inner.borrow_mut().callbacks.remove(id);
    }
}

/// A weak handle to a [`FrameScheduler`]
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl FrameClock for SchedulerHandle {
    fn register_next_frame(&self, callback: FrameCallback) -> Option<FrameCallbackId> {
        let Some(inner) = self.inner.upgrade() else {
            tracing::debug!("SchedulerHandle: scheduler dropped, frame callback discarded");
            return None;
        };
        let id = inner.borrow_mut().callbacks.insert(callback);
        Some(id)
    }

    fn unregister(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().callbacks.remove(id);
        }
    }

    fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_callbacks_are_one_shot() {
        let scheduler = FrameScheduler::new();
        let fired = Rc::new(Cell::new(0));

        let counter = fired.clone();
        scheduler.register_next_frame(Box::new(move |_| counter.set(counter.get() + 1)));
        assert_eq!(scheduler.pending_count(), 1);

        assert!(!scheduler.tick_at(16));
        assert!(!scheduler.tick_at(32));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_callback_receives_frame_time() {
        let scheduler = FrameScheduler::new();
        let seen = Rc::new(Cell::new(None));

        let slot = seen.clone();
        scheduler.register_next_frame(Box::new(move |t| slot.set(Some(t))));
        scheduler.tick_at(48);

        assert_eq!(seen.get(), Some(48));
        assert_eq!(scheduler.last_frame_time(), Some(48));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let scheduler = FrameScheduler::new();
        let id = scheduler
            .register_next_frame(Box::new(|_| panic!("unregistered callback ran")))
            .expect("scheduler is alive");

        scheduler.unregister(id);
        scheduler.unregister(id);
        scheduler.unregister(FrameCallbackId::default());

        assert!(!scheduler.tick_at(0));
    }

    #[test]
    fn test_registration_during_frame_waits_for_next_frame() {
        let scheduler = FrameScheduler::new();
        let times = Rc::new(RefCell::new(Vec::new()));

        let clock = scheduler.clone();
        let log = times.clone();
        scheduler.register_next_frame(Box::new(move |t| {
            log.borrow_mut().push(t);
            let log = log.clone();
            clock.register_next_frame(Box::new(move |t| log.borrow_mut().push(t)));
        }));

        assert!(scheduler.tick_at(10));
        assert_eq!(*times.borrow(), vec![10]);

        assert!(!scheduler.tick_at(26));
        assert_eq!(*times.borrow(), vec![10, 26]);
    }

    #[test]
    fn test_unregister_during_frame_cancels_later_callback() {
        let scheduler = FrameScheduler::new();
        let victim: Rc<Cell<Option<FrameCallbackId>>> = Rc::new(Cell::new(None));

        let clock = scheduler.clone();
        let target = victim.clone();
        scheduler.register_next_frame(Box::new(move |_| {
            if let Some(id) = target.get() {
                clock.unregister(id);
            }
        }));
        victim.set(scheduler.register_next_frame(Box::new(|_| panic!("cancelled callback ran"))));

        scheduler.tick_at(0);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let scheduler = FrameScheduler::new();
        scheduler.tick_at(100);

        let seen = Rc::new(Cell::new(0));
        let slot = seen.clone();
        scheduler.register_next_frame(Box::new(move |t| slot.set(t)));
        scheduler.tick_at(90);

        assert_eq!(seen.get(), 100);
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let scheduler = FrameScheduler::new();
            scheduler.handle()
        };

        // Scheduler is dropped, handle should not be alive
        assert!(!handle.is_alive());

        // Registration is refused, unregister safely no-ops
        assert!(handle.register_next_frame(Box::new(|_| {})).is_none());
        handle.unregister(FrameCallbackId::default());
    }
}
