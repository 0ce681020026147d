//! Fling Demo
//!
//! Drives a bounded scroll offset with a manual frame clock:
//! - A fling that snaps to the nearest page
//! - A retarget in the middle of a spring
//! - A fling that runs into the end of the content
//!
//! Run with: cargo run -p blinc_animatable --example fling_demo

use std::rc::Rc;

use blinc_animatable::{
    AnimateOptions, AnimatedFloat, AnimationError, FlingOptions, FrameScheduler, SpringConfig,
    TargetOverride,
};

const PAGE: f32 = 400.0;
const FRAME_MS: u64 = 16;

fn main() -> Result<(), AnimationError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let scheduler = FrameScheduler::new();
    let offset = AnimatedFloat::new(0.0, Rc::new(scheduler.handle()));
    offset.set_bounds(0.0, PAGE * 4.0)?;

    let mut now = 0;

    // Paging fling: land on a page boundary, keeping the release velocity
    offset.fling(
        1800.0,
        FlingOptions::new()
            .adjust_target(|rest| {
                let page = (rest / PAGE).round() * PAGE;
                Some(TargetOverride::new(page, SpringConfig::gentle()))
            })
            .on_end(|reason, value, remaining| {
                tracing::info!("paging fling: {reason:?} at {value:.1} ({remaining:.1}/s left)");
            }),
    );
    now = run(&scheduler, &offset, now);

    // Change of mind halfway through a spring
    offset.animate_to(
        0.0,
        AnimateOptions::new()
            .spec(SpringConfig::snappy())
            .on_end(|reason, value| tracing::info!("back to top: {reason:?} at {value:.1}")),
    );
    for _ in 0..6 {
        now += FRAME_MS;
        scheduler.tick_at(now);
    }
    offset.animate_to(
        PAGE,
        AnimateOptions::new()
            .spec(SpringConfig::wobbly())
            .on_end(|reason, value| tracing::info!("second page: {reason:?} at {value:.1}")),
    );
    now = run(&scheduler, &offset, now);

    // Free fling into the end of the content
    offset.fling(
        6000.0,
        FlingOptions::new().on_end(|reason, value, remaining| {
            tracing::info!("free fling: {reason:?} at {value:.1} ({remaining:.1}/s left)");
        }),
    );
    run(&scheduler, &offset, now);

    Ok(())
}

fn run(scheduler: &FrameScheduler, offset: &AnimatedFloat, mut now: u64) -> u64 {
    while scheduler.has_pending() {
        now += FRAME_MS;
        scheduler.tick_at(now);
        tracing::debug!("t={now}ms offset={:.1}", offset.value());
    }
    now
}
