//! Normalized crop rectangle, aspect lock, and invariant repair.
//!
//! A [`CropRect`] stores the selected region as fractions of the source
//! image's width and height, so the same four numbers describe the crop at
//! any resolution. An [`AspectLock`] carries everything needed to decide
//! whether a rectangle is acceptable for one image:
//!
//! - **containment**: `x, y >= 0` and `x + width, y + height <= 1`
//! - **minimum size**: `width, height >= min_size`
//! - **aspect lock**: `width / height == target_aspect / image_aspect`
//!
//! [`clamp`] is the single repair function. Every mutator routes its
//! candidate through it, so no observable rectangle ever violates the
//! invariants.
//!
//! # Example
//!
//! ```
//! use zencrop::{AspectLock, CropRect, ImageSize, clamp};
//!
//! // Square crop of a 1600×1200 photo.
//! let lock = AspectLock::new(1.0, ImageSize::new(1600, 1200)).unwrap();
//! assert!((lock.ratio() - 0.75).abs() < 1e-12);
//!
//! // A drifting candidate is pulled back inside the image.
//! let r = clamp(CropRect::new(0.5, -0.1, 0.75, 1.0), &lock);
//! assert_eq!((r.x, r.y), (0.25, 0.0));
//! assert!(r.is_valid(&lock));
//! ```

use num_traits::Float;

use crate::error::CropError;
use crate::fit::fit;

/// Tolerance for invariant checks, in image-fraction units.
pub const TOLERANCE: f64 = 1e-6;

/// Default minimum crop width/height as a fraction of the source.
pub const DEFAULT_MIN_SIZE: f64 = 0.2;

/// Natural width × height of a source image, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageSize {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width / height`, or `None` when either dimension is zero.
    pub fn aspect(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp this rect to fit within `(0, 0, max_w, max_h)`.
    /// Width and height are clamped to at least 1.
    pub fn clamp_to(self, max_w: u32, max_h: u32) -> Self {
        let x = self.x.min(max_w.saturating_sub(1));
        let y = self.y.min(max_h.saturating_sub(1));
        let w = self.width.min(max_w.saturating_sub(x)).max(1);
        let h = self.height.min(max_h.saturating_sub(y)).max(1);
        Self {
            x,
            y,
            width: w,
            height: h,
        }
    }

    /// Whether this rect covers the full source (no actual crop).
    pub fn is_full(&self, source_w: u32, source_h: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == source_w && self.height == source_h
    }
}

/// Aspect and size constraints for cropping one image.
///
/// Built once per image attachment; the target aspect stays fixed for the
/// whole crop session while the image aspect changes on every swap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AspectLock {
    target_aspect: f64,
    image_aspect: f64,
    min_size: f64,
}

impl AspectLock {
    /// Lock to `target_aspect` (output width / height) for an image of the
    /// given natural size, with the default minimum size.
    pub fn new(target_aspect: f64, image: ImageSize) -> Result<Self, CropError> {
        let image_aspect = image.aspect().ok_or(CropError::ZeroImageDimension)?;
        Self::from_aspects(target_aspect, image_aspect)
    }

    /// Lock from raw aspect ratios.
    pub fn from_aspects(target_aspect: f64, image_aspect: f64) -> Result<Self, CropError> {
        if !target_aspect.is_finite() || target_aspect <= 0.0 {
            return Err(CropError::InvalidTargetAspect);
        }
        if !image_aspect.is_finite() || image_aspect <= 0.0 {
            return Err(CropError::ZeroImageDimension);
        }
        Ok(Self {
            target_aspect,
            image_aspect,
            min_size: DEFAULT_MIN_SIZE,
        })
    }

    /// Replace the minimum crop width/height (fraction of the source).
    pub fn with_min_size(mut self, min_size: f64) -> Result<Self, CropError> {
        validate_min_size(min_size)?;
        self.min_size = min_size;
        Ok(self)
    }

    /// Output aspect ratio requested by the caller.
    pub fn target_aspect(&self) -> f64 {
        self.target_aspect
    }

    /// Source image aspect ratio (`natural_width / natural_height`).
    pub fn image_aspect(&self) -> f64 {
        self.image_aspect
    }

    /// Configured minimum width/height.
    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Required `width / height` in image-fraction units.
    pub fn ratio(&self) -> f64 {
        self.target_aspect / self.image_aspect
    }

    /// Widest aspect-correct rectangle that fits the image.
    pub fn max_width(&self) -> f64 {
        let ratio = self.ratio();
        if ratio >= 1.0 { 1.0 } else { ratio }
    }

    /// Narrowest allowed width: both sides reach `min_size`, unless the
    /// aspect is so extreme that even the fit rectangle is thinner, in
    /// which case the fit width is the floor.
    pub fn min_width(&self) -> f64 {
        let floor = self.min_size.max(self.min_size * self.ratio());
        floor.min(self.max_width())
    }

    /// Aspect-locked height for `width`.
    pub fn height_for(&self, width: f64) -> f64 {
        (width / self.ratio()).min(1.0)
    }

    /// Whether `width / height` matches the lock within tolerance.
    pub fn aspect_matches(&self, width: f64, height: f64) -> bool {
        if height <= 0.0 {
            return false;
        }
        let ratio = self.ratio();
        Float::abs(width / height - ratio) <= TOLERANCE * ratio.max(1.0)
    }
}

pub(crate) fn validate_min_size(min_size: f64) -> Result<(), CropError> {
    if min_size.is_finite() && min_size > 0.0 && min_size <= 1.0 {
        Ok(())
    } else {
        Err(CropError::InvalidMinSize)
    }
}

/// Crop region as fractions of the source image.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropRect {
    /// Left edge, fraction of source width.
    #[cfg_attr(feature = "serde", serde(alias = "cropX"))]
    pub x: f64,
    /// Top edge, fraction of source height.
    #[cfg_attr(feature = "serde", serde(alias = "cropY"))]
    pub y: f64,
    /// Width, fraction of source width.
    #[cfg_attr(feature = "serde", serde(alias = "cropWidth"))]
    pub width: f64,
    /// Height, fraction of source height.
    #[cfg_attr(feature = "serde", serde(alias = "cropHeight"))]
    pub height: f64,
}

impl CropRect {
    /// The whole image. Also the legacy "never cropped" sentinel.
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Create a new rect. No validation; see [`clamp`].
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether all four fields are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Width and height equal the uncropped sentinel `(1, 1)`.
    ///
    /// Stored records carrying this value predate cropping and are treated
    /// as absent, so the fit rectangle is computed for them instead.
    pub fn is_uncropped_sentinel(&self) -> bool {
        self.width == 1.0 && self.height == 1.0
    }

    /// Check containment, minimum size, and aspect lock within
    /// [`TOLERANCE`].
    pub fn is_valid(&self, lock: &AspectLock) -> bool {
        if !self.is_finite() || self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        let min_w = lock.min_width();
        let min_h = min_w / lock.ratio();
        self.x >= -TOLERANCE
            && self.y >= -TOLERANCE
            && self.right() <= 1.0 + TOLERANCE
            && self.bottom() <= 1.0 + TOLERANCE
            && self.width >= min_w - TOLERANCE
            && self.height >= min_h - TOLERANCE
            && lock.aspect_matches(self.width, self.height)
    }

    /// Resolve to pixel coordinates for a source of the given size.
    ///
    /// Each edge is rounded independently, then clamped to the source with
    /// a minimum of 1×1. Used when re-encoding the cropped region.
    pub fn to_pixels(&self, source: ImageSize) -> Rect {
        let (sw, sh) = (source.width as f64, source.height as f64);
        let px = Float::round(sw * self.x.clamp(0.0, 1.0)) as u32;
        let py = Float::round(sh * self.y.clamp(0.0, 1.0)) as u32;
        let pw = Float::round(sw * self.width.clamp(0.0, 1.0)) as u32;
        let ph = Float::round(sh * self.height.clamp(0.0, 1.0)) as u32;
        Rect::new(px, py, pw, ph).clamp_to(source.width, source.height)
    }
}

/// Return the nearest rectangle that satisfies every invariant of `lock`.
///
/// - Already-valid input is returned unchanged (bit-identical).
/// - Non-finite input falls back to the fit rectangle.
/// - Otherwise the size is made aspect-correct (keeping the candidate's
///   width when its aspect already matches, its area when it doesn't),
///   limited to `[min_width, max_width]`, re-centred on the candidate when
///   the size changed, and finally translated inside the image.
pub fn clamp(rect: CropRect, lock: &AspectLock) -> CropRect {
    if !rect.is_finite() {
        return fit(lock);
    }
    if rect.is_valid(lock) {
        return rect;
    }

    let w = Float::abs(rect.width);
    let h = Float::abs(rect.height);
    let width = if lock.aspect_matches(w, h) {
        w
    } else {
        Float::sqrt(w * h * lock.ratio())
    };
    let width = width.clamp(lock.min_width(), lock.max_width());
    let height = lock.height_for(width);

    let (x, y) = if width == rect.width && height == rect.height {
        (rect.x, rect.y)
    } else {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        (cx - width / 2.0, cy - height / 2.0)
    };

    CropRect {
        x: x.clamp(0.0, (1.0 - width).max(0.0)),
        y: y.clamp(0.0, (1.0 - height).max(0.0)),
        width,
        height,
    }
}
