//! Value <-> vector conversion
//!
//! A [`TypeConverter`] maps an arbitrary value type onto an
//! [`AnimationVector`] of fixed dimension and back.

use crate::vector::{
    AnimationVector, AnimationVector1D, AnimationVector2D, AnimationVector3D, AnimationVector4D,
};

/// Two-way conversion between a value type `T` and its vector encoding `V`
pub struct TypeConverter<T, V> {
    to_vector: fn(&T) -> V,
    from_vector: fn(&V) -> T,
}

// Manual impls: fn pointers are Copy regardless of T and V
impl<T, V> Clone for TypeConverter<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for TypeConverter<T, V> {}

impl<T, V: AnimationVector> TypeConverter<T, V> {
    /// Create a converter from a pair of conversion functions
    pub fn new(to_vector: fn(&T) -> V, from_vector: fn(&V) -> T) -> Self {
        Self {
            to_vector,
            from_vector,
        }
    }

    pub fn to_vector(&self, value: &T) -> V {
        (self.to_vector)(value)
    }

    pub fn from_vector(&self, vector: &V) -> T {
        (self.from_vector)(vector)
    }
}

impl TypeConverter<f32, AnimationVector1D> {
    /// Scalars (opacity, offsets, rotation)
    pub fn float() -> Self {
        Self::new(|v| AnimationVector1D::new(*v), |v| v.v1)
    }
}

impl TypeConverter<(f32, f32), AnimationVector2D> {
    /// 2D points and sizes
    pub fn pair() -> Self {
        Self::new(|(x, y)| AnimationVector2D::new(*x, *y), |v| (v.v1, v.v2))
    }
}

impl TypeConverter<[f32; 3], AnimationVector3D> {
    /// 3D positions and scales
    pub fn vec3() -> Self {
        Self::new(
            |[x, y, z]| AnimationVector3D::new(*x, *y, *z),
            |v| [v.v1, v.v2, v.v3],
        )
    }
}

impl TypeConverter<[f32; 4], AnimationVector4D> {
    /// RGBA colors and rects
    pub fn vec4() -> Self {
        Self::new(
            |[a, b, c, d]| AnimationVector4D::new(*a, *b, *c, *d),
            |v| [v.v1, v.v2, v.v3, v.v4],
        )
    }
}
