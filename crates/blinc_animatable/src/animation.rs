//! Curves driven by the animation driver
//!
//! An [`Animation`] is a pure function of elapsed time. The driver never
//! steps a curve; it only asks for the value, velocity and finished state at
//! the elapsed time of the current frame, so asking twice for the same time
//! always gives the same answer.

use crate::converter::TypeConverter;
use crate::easing::Easing;
use crate::spring::SpringConfig;
use crate::vector::{from_fn, AnimationVector};

/// Upper bound on how long a spring is simulated before it is considered done
const MAX_SPRING_DURATION_MS: u64 = 30_000;

/// A time-parameterized curve producing values of `T` and velocities of `V`
///
/// Times are milliseconds since the curve started playing; velocities are in
/// units per second.
pub trait Animation<T, V> {
    /// Value at the given play time
    fn value_at(&self, play_time_ms: u64) -> T;

    /// Velocity at the given play time
    fn velocity_at(&self, play_time_ms: u64) -> V;

    /// Whether the curve has come to rest at the given play time
    fn is_finished(&self, play_time_ms: u64) -> bool;
}

/// How a target-based curve travels from its start to its target
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationSpec {
    /// Physics-based spring; inherits the starting velocity
    Spring(SpringConfig),
    /// Fixed-duration eased interpolation; ignores the starting velocity
    Tween { duration_ms: u32, easing: Easing },
    /// Jump to the target on the first frame
    Snap,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::Spring(SpringConfig::default())
    }
}

impl From<SpringConfig> for AnimationSpec {
    fn from(config: SpringConfig) -> Self {
        Self::Spring(config)
    }
}

impl AnimationSpec {
    pub fn spring(config: SpringConfig) -> Self {
        Self::Spring(config)
    }

    pub fn tween(duration_ms: u32, easing: Easing) -> Self {
        Self::Tween {
            duration_ms,
            easing,
        }
    }

    /// Build a curve from `initial` (moving at `initial_velocity`) to `target`
    pub fn build<T, V>(
        &self,
        converter: TypeConverter<T, V>,
        initial: &T,
        target: &T,
        initial_velocity: V,
    ) -> TargetBasedAnimation<T, V>
    where
        T: Clone,
        V: AnimationVector,
    {
        TargetBasedAnimation::new(*self, converter, initial, target, initial_velocity)
    }
}

/// A curve with a fixed start, target and starting velocity
pub struct TargetBasedAnimation<T, V> {
    spec: AnimationSpec,
    converter: TypeConverter<T, V>,
    start: V,
    end: V,
    start_velocity: V,
    target: T,
    duration_ms: u64,
}

impl<T: Clone, V: AnimationVector> TargetBasedAnimation<T, V> {
    pub fn new(
        spec: AnimationSpec,
        converter: TypeConverter<T, V>,
        initial: &T,
        target: &T,
        initial_velocity: V,
    ) -> Self {
        let start = converter.to_vector(initial);
        let end = converter.to_vector(target);
        let duration_ms = match spec {
            AnimationSpec::Spring(config) => {
                spring_duration_ms(&config, start, end, initial_velocity)
            }
            AnimationSpec::Tween { duration_ms, .. } => duration_ms as u64,
            AnimationSpec::Snap => 0,
        };

        Self {
            spec,
            converter,
            start,
            end,
            start_velocity: initial_velocity,
            target: target.clone(),
            duration_ms,
        }
    }

    /// Total play time until the curve finishes
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    fn vector_at(&self, play_time_ms: f32) -> V {
        match self.spec {
            AnimationSpec::Spring(config) => {
                let t = play_time_ms / 1000.0;
                from_fn(|i| {
                    let displacement = self.start.get(i) - self.end.get(i);
                    let (x, _) = config.evaluate(displacement, self.start_velocity.get(i), t);
                    self.end.get(i) + x
                })
            }
            AnimationSpec::Tween {
                duration_ms,
                easing,
            } => {
                let fraction = if duration_ms == 0 {
                    1.0
                } else {
                    easing.apply(play_time_ms / duration_ms as f32)
                };
                from_fn(|i| self.start.get(i) + (self.end.get(i) - self.start.get(i)) * fraction)
            }
            AnimationSpec::Snap => self.end,
        }
    }
}

impl<T: Clone, V: AnimationVector> Animation<T, V> for TargetBasedAnimation<T, V> {
    fn value_at(&self, play_time_ms: u64) -> T {
        if play_time_ms >= self.duration_ms {
            return self.target.clone();
        }
        self.converter.from_vector(&self.vector_at(play_time_ms as f32))
    }

    fn velocity_at(&self, play_time_ms: u64) -> V {
        match self.spec {
            AnimationSpec::Spring(config) => {
                if play_time_ms >= self.duration_ms {
                    return V::zero();
                }
                let t = play_time_ms as f32 / 1000.0;
                from_fn(|i| {
                    let displacement = self.start.get(i) - self.end.get(i);
                    config.evaluate(displacement, self.start_velocity.get(i), t).1
                })
            }
            AnimationSpec::Tween { .. } => {
                // Backward difference over the last millisecond
                let now = play_time_ms.min(self.duration_ms) as f32;
                let before = (now - 1.0).max(0.0);
                if now <= before {
                    return V::zero();
                }
                let current = self.vector_at(now);
                let previous = self.vector_at(before);
                let dt = (now - before) / 1000.0;
                from_fn(|i| (current.get(i) - previous.get(i)) / dt)
            }
            AnimationSpec::Snap => V::zero(),
        }
    }

    fn is_finished(&self, play_time_ms: u64) -> bool {
        play_time_ms >= self.duration_ms
    }
}

/// First millisecond at which every component of the spring has settled
fn spring_duration_ms<V: AnimationVector>(
    config: &SpringConfig,
    start: V,
    end: V,
    velocity: V,
) -> u64 {
    let settled_at = |ms: u64| {
        let t = ms as f32 / 1000.0;
        (0..start.size()).all(|i| {
            let (x, v) = config.evaluate(start.get(i) - end.get(i), velocity.get(i), t);
            config.is_settled(x, v)
        })
    };

    (0..MAX_SPRING_DURATION_MS)
        .find(|ms| settled_at(*ms))
        .unwrap_or(MAX_SPRING_DURATION_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{AnimationVector1D, AnimationVector2D};

    fn float_curve(
        spec: AnimationSpec,
        from: f32,
        to: f32,
        velocity: f32,
    ) -> impl Animation<f32, AnimationVector1D> {
        spec.build(TypeConverter::float(), &from, &to, AnimationVector1D::new(velocity))
    }

    #[test]
    fn test_linear_tween() {
        let curve = float_curve(AnimationSpec::tween(1000, Easing::Linear), 0.0, 100.0, 0.0);

        assert_eq!(curve.value_at(0), 0.0);
        assert!((curve.value_at(250) - 25.0).abs() < 1e-4);
        assert!(!curve.is_finished(999));
        assert!(curve.is_finished(1000));
        assert_eq!(curve.value_at(1000), 100.0);

        // 100 units over one second
        assert!((curve.velocity_at(500).v1 - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_tween_velocity_at_start_is_zero() {
        let curve = float_curve(AnimationSpec::tween(300, Easing::Linear), 0.0, 10.0, 0.0);
        assert_eq!(curve.velocity_at(0).v1, 0.0);
    }

    #[test]
    fn test_snap_is_finished_immediately() {
        let curve = float_curve(AnimationSpec::Snap, 3.0, 7.0, 12.0);
        assert!(curve.is_finished(0));
        assert_eq!(curve.value_at(0), 7.0);
        assert_eq!(curve.velocity_at(0).v1, 0.0);
    }

    #[test]
    fn test_zero_duration_tween_is_finished_immediately() {
        let curve = float_curve(AnimationSpec::tween(0, Easing::Linear), 0.0, 1.0, 0.0);
        assert!(curve.is_finished(0));
        assert_eq!(curve.value_at(0), 1.0);
    }

    #[test]
    fn test_spring_at_rest_on_target_is_finished_immediately() {
        let curve = float_curve(AnimationSpec::default(), 5.0, 5.0, 0.0);
        assert!(curve.is_finished(0));
    }

    #[test]
    fn test_spring_starts_at_initial_state() {
        let curve = float_curve(AnimationSpec::default(), 0.0, 10.0, 25.0);
        assert!(curve.value_at(0).abs() < 1e-4);
        assert!((curve.velocity_at(0).v1 - 25.0).abs() < 1e-3);
        assert!(!curve.is_finished(0));
    }

    #[test]
    fn test_spring_finishes_on_target() {
        let spec = AnimationSpec::default();
        let curve = spec.build(TypeConverter::float(), &0.0, &10.0, AnimationVector1D::zero());
        let duration = curve.duration_ms();

        assert!(duration > 0 && duration < MAX_SPRING_DURATION_MS);
        assert!((curve.value_at(duration - 1) - 10.0).abs() < 0.05);
        assert_eq!(curve.value_at(duration), 10.0);
        assert_eq!(curve.velocity_at(duration).v1, 0.0);
    }

    #[test]
    fn test_spring_with_pure_velocity_moves() {
        // Already on target but moving: must not finish at zero
        let curve = float_curve(AnimationSpec::default(), 0.0, 0.0, 500.0);
        assert!(!curve.is_finished(0));
        assert!(curve.value_at(16) > 0.0);
    }

    #[test]
    fn test_curves_are_pure() {
        let curve = float_curve(SpringConfig::wobbly().into(), 0.0, 100.0, 0.0);
        assert_eq!(curve.value_at(120), curve.value_at(120));
        assert_eq!(curve.velocity_at(120), curve.velocity_at(120));
    }

    #[test]
    fn test_vector_curve_moves_every_component() {
        let spec = AnimationSpec::tween(100, Easing::Linear);
        let curve = spec.build(
            TypeConverter::pair(),
            &(0.0, 100.0),
            &(50.0, 0.0),
            AnimationVector2D::zero(),
        );
        let (x, y) = curve.value_at(50);
        assert!((x - 25.0).abs() < 1e-4);
        assert!((y - 50.0).abs() < 1e-4);
    }
}
