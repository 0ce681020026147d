//! Easing curves for duration-based animations

/// Maps linear progress in `[0, 1]` onto eased progress
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    /// Material standard curve, `cubic-bezier(0.4, 0.0, 0.2, 1.0)`
    #[default]
    FastOutSlowIn,
    /// Incoming elements, `cubic-bezier(0.0, 0.0, 0.2, 1.0)`
    LinearOutSlowIn,
    /// Outgoing elements, `cubic-bezier(0.4, 0.0, 1.0, 1.0)`
    FastOutLinearIn,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing to a progress value; input is clamped to `[0, 1]`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::FastOutSlowIn => UnitBezier::new(0.4, 0.0, 0.2, 1.0).solve(t),
            Easing::LinearOutSlowIn => UnitBezier::new(0.0, 0.0, 0.2, 1.0).solve(t),
            Easing::FastOutLinearIn => UnitBezier::new(0.4, 0.0, 1.0, 1.0).solve(t),
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(3) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => UnitBezier::new(x1, y1, x2, y2).solve(t),
        }
    }
}

/// Cubic bezier through (0, 0) and (1, 1) in polynomial form.
///
/// Evaluated in f64: at 120fps neighbouring samples differ by less than
/// f32 can resolve near the ends of the curve.
struct UnitBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl UnitBezier {
    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let (ax, bx, cx) = Self::coefficients(x1 as f64, x2 as f64);
        let (ay, by, cy) = Self::coefficients(y1 as f64, y2 as f64);
        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    fn coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    }

    fn sample_x(&self, s: f64) -> f64 {
        ((self.ax * s + self.bx) * s + self.cx) * s
    }

    fn sample_y(&self, s: f64) -> f64 {
        ((self.ay * s + self.by) * s + self.cy) * s
    }

    fn slope_x(&self, s: f64) -> f64 {
        (3.0 * self.ax * s + 2.0 * self.bx) * s + self.cx
    }

    /// Curve parameter whose x coordinate is `x`
    fn parameter_for(&self, x: f64) -> f64 {
        const EPSILON: f64 = 1e-7;

        // Newton-Raphson converges in a few steps away from flat regions
        let mut s = x;
        for _ in 0..8 {
            let error = self.sample_x(s) - x;
            if error.abs() < EPSILON {
                return s;
            }
            let slope = self.slope_x(s);
            if slope.abs() < EPSILON {
                break;
            }
            s -= error / slope;
        }

        // Bisection on [0, 1]; x(s) is monotonic for valid control points
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        s = x;
        for _ in 0..32 {
            let sampled = self.sample_x(s);
            if (sampled - x).abs() < EPSILON {
                break;
            }
            if sampled < x {
                lo = s;
            } else {
                hi = s;
            }
            s = 0.5 * (lo + hi);
        }
        s
    }

    fn solve(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        self.sample_y(self.parameter_for(t as f64)) as f32
    }
}
