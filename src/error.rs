//! Error type for crop session configuration and readiness.
//!
//! Geometry never fails: out-of-range candidates are repaired by
//! [`clamp`](crate::clamp). These errors only describe inputs the engine
//! cannot work with at all.

/// Crop engine error.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CropError {
    /// Target aspect ratio is zero, negative, or not finite.
    #[error("target aspect ratio must be finite and greater than zero")]
    InvalidTargetAspect,
    /// Minimum crop size is outside `(0, 1]`.
    #[error("minimum crop size must be within (0, 1]")]
    InvalidMinSize,
    /// Corner-handle hit radius is negative or not finite.
    #[error("handle radius must be finite and not negative")]
    InvalidHandleRadius,
    /// Source image has zero width or height.
    #[error("source image has a zero dimension")]
    ZeroImageDimension,
    /// No image dimensions are known yet.
    #[error("crop session is not ready: image dimensions unknown")]
    NotReady,
    /// The on-screen image size is zero or not finite, so pointer
    /// deltas cannot be converted into image fractions.
    #[error("displayed image size must be finite and non-zero")]
    EmptyDisplay,
}
