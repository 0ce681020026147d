//! Animation error types

use thiserror::Error;

/// Configuration errors raised by animated values
///
/// Runs themselves never fail; they end with an [`EndReason`](crate::EndReason).
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AnimationError {
    /// Bounds that are unordered or not numbers
    #[error("Invalid bounds: min {min} and max {max} must satisfy min <= max")]
    InvalidBounds { min: f32, max: f32 },

    /// Decay parameters that would never bring a fling to rest
    #[error(
        "Invalid decay: friction multiplier {friction_multiplier} and velocity threshold \
         {abs_velocity_threshold} must both be positive and finite"
    )]
    InvalidDecay {
        friction_multiplier: f32,
        abs_velocity_threshold: f32,
    },
}
