//! Fixed-dimension animation vectors
//!
//! Every animated value is encoded as one of these vectors before a curve
//! touches it, so curves are written once per component instead of once per
//! value type.

use std::fmt::Debug;

/// A fixed-size vector of `f32` components
pub trait AnimationVector: Copy + Debug + PartialEq + 'static {
    /// Vector with every component set to zero
    fn zero() -> Self;

    /// Number of components
    fn size(&self) -> usize;

    /// Component at `index`, or `0.0` when out of range
    fn get(&self, index: usize) -> f32;

    /// Set the component at `index`; out-of-range writes are ignored
    fn set(&mut self, index: usize, value: f32);

    /// Whether every component is exactly zero
    fn is_zero(&self) -> bool {
        (0..self.size()).all(|i| self.get(i) == 0.0)
    }
}

/// Build a vector by evaluating `f` for each component index
pub(crate) fn from_fn<V: AnimationVector>(mut f: impl FnMut(usize) -> f32) -> V {
    let mut vector = V::zero();
    for i in 0..vector.size() {
        vector.set(i, f(i));
    }
    vector
}

macro_rules! animation_vector {
    ($(#[$meta:meta])* $name:ident { $($field:ident => $index:literal),+ }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        pub struct $name {
            $(pub $field: f32,)+
        }

        impl $name {
            pub fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl AnimationVector for $name {
            fn zero() -> Self {
                Self::default()
            }

            fn size(&self) -> usize {
                [$($index),+].len()
            }

            fn get(&self, index: usize) -> f32 {
                match index {
                    $($index => self.$field,)+
                    _ => 0.0,
                }
            }

            fn set(&mut self, index: usize, value: f32) {
                match index {
                    $($index => self.$field = value,)+
                    _ => {}
                }
            }
        }
    };
}

animation_vector!(
    /// One-component vector (scalars)
    AnimationVector1D { v1 => 0 }
);
animation_vector!(
    /// Two-component vector (points, sizes)
    AnimationVector2D { v1 => 0, v2 => 1 }
);
animation_vector!(
    /// Three-component vector (positions in 3D, scales)
    AnimationVector3D { v1 => 0, v2 => 1, v3 => 2 }
);
animation_vector!(
    /// Four-component vector (colors, rects)
    AnimationVector4D { v1 => 0, v2 => 1, v3 => 2, v4 => 3 }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_sizes() {
        assert_eq!(AnimationVector1D::zero().size(), 1);
        assert_eq!(AnimationVector2D::zero().size(), 2);
        assert_eq!(AnimationVector3D::zero().size(), 3);
        assert_eq!(AnimationVector4D::zero().size(), 4);
    }

    #[test]
    fn test_indexed_access() {
        let mut v = AnimationVector3D::new(1.0, 2.0, 3.0);
        assert_eq!(v.get(1), 2.0);

        v.set(2, 9.0);
        assert_eq!(v.v3, 9.0);

        // Out of range is inert
        v.set(7, 5.0);
        assert_eq!(v.get(7), 0.0);
        assert_eq!(v, AnimationVector3D::new(1.0, 2.0, 9.0));
    }

    #[test]
    fn test_from_fn_and_is_zero() {
        let v: AnimationVector4D = from_fn(|i| i as f32 * 2.0);
        assert_eq!(v, AnimationVector4D::new(0.0, 2.0, 4.0, 6.0));
        assert!(!v.is_zero());
        assert!(AnimationVector4D::zero().is_zero());
    }
}
