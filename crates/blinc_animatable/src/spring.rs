//! Spring physics
//!
//! Closed-form damped harmonic oscillator. Because the position is an exact
//! function of time, a spring curve can be sampled at any elapsed time
//! without integrating frame by frame, which keeps retargeting and frame
//! drops free of accumulated error.

/// Velocity threshold as a multiple of the displacement threshold
const VELOCITY_THRESHOLD_RATIO: f32 = 10.0;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from the target below which the spring may settle
    pub visibility_threshold: f32,
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            visibility_threshold: 0.01,
        }
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// A very stiff spring with minimal oscillation
    pub fn snappy() -> Self {
        Self::new(600.0, 40.0, 1.0)
    }

    /// A slow spring with no overshoot (critically damped)
    pub fn molasses() -> Self {
        Self::new(100.0, 20.0, 1.0)
    }

    /// Use a different settle distance, e.g. `0.5` for pixel offsets
    pub fn with_visibility_threshold(mut self, threshold: f32) -> Self {
        self.visibility_threshold = threshold;
        self
    }

    /// Critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Ratio of damping to critical damping
    pub fn damping_ratio(&self) -> f32 {
        self.damping / self.critical_damping()
    }

    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    pub fn is_critically_damped(&self) -> bool {
        (self.damping - self.critical_damping()).abs() < 0.01
    }

    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }

    /// Displacement and velocity after `t` seconds.
    ///
    /// `displacement` is the signed distance from the rest position at
    /// `t = 0`, `velocity` the velocity at `t = 0` in units per second.
    pub fn evaluate(&self, displacement: f32, velocity: f32, t: f32) -> (f32, f32) {
        let x0 = displacement;
        let v0 = velocity;
        let omega = (self.stiffness / self.mass).sqrt();

        if self.is_critically_damped() {
            let b = v0 + omega * x0;
            let decay = (-omega * t).exp();
            let x = (x0 + b * t) * decay;
            let v = (v0 - omega * b * t) * decay;
            (x, v)
        } else if self.is_underdamped() {
            let zeta = self.damping_ratio();
            let decay_rate = zeta * omega;
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-decay_rate * t).exp();
            let (sin, cos) = (omega_d * t).sin_cos();

            let b = (v0 + decay_rate * x0) / omega_d;
            let x = decay * (x0 * cos + b * sin);
            let v = decay * (v0 * cos - (decay_rate * v0 + omega * omega * x0) / omega_d * sin);
            (x, v)
        } else {
            let zeta = self.damping_ratio();
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);

            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        }
    }

    /// Check if a spring state is close enough to rest to stop animating
    pub fn is_settled(&self, displacement: f32, velocity: f32) -> bool {
        displacement.abs() < self.visibility_threshold
            && velocity.abs() < self.visibility_threshold * VELOCITY_THRESHOLD_RATIO
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}
