//! Persisted crop shapes and their normalization.
//!
//! Older records carry a zoom factor and an `object-position`-style focus
//! point instead of a rectangle, and the oldest carry nothing at all. All
//! of them go through [`StoredCrop::normalize`] before any geometry runs,
//! so the controller and render transform only ever see [`CropRect`].

use crate::fit::fit;
use crate::rect::{AspectLock, CropRect, clamp};

/// A crop as it may appear in storage.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum StoredCrop {
    /// No crop data; show the fitted crop.
    #[default]
    Uncropped,
    /// Legacy zoom/pan: the fitted crop magnified by `scale` (≥ 1) and
    /// positioned at `x`, `y` percent (0–100) along the remaining slack.
    ScalePosition {
        /// Zoom factor applied to the fitted crop.
        scale: f64,
        /// Horizontal focus, percent of slack.
        x: f64,
        /// Vertical focus, percent of slack.
        y: f64,
    },
    /// Canonical normalized rectangle.
    Rectangle(CropRect),
}

impl StoredCrop {
    /// Convert to a valid rectangle for `lock`.
    ///
    /// - `Uncropped`, and a rectangle equal to the `(1, 1)` sentinel, yield
    ///   the fitted crop.
    /// - `ScalePosition` shrinks the fitted crop by `scale` (values below 1
    ///   or non-finite are treated as 1) and places it along the slack.
    /// - Any rectangle is repaired with [`clamp`].
    pub fn normalize(&self, lock: &AspectLock) -> CropRect {
        match *self {
            Self::Uncropped => fit(lock),
            Self::Rectangle(rect) if rect.is_uncropped_sentinel() => fit(lock),
            Self::Rectangle(rect) => clamp(rect, lock),
            Self::ScalePosition { scale, x, y } => {
                let base = fit(lock);
                let scale = if scale.is_finite() && scale > 1.0 {
                    scale
                } else {
                    1.0
                };
                let width = base.width / scale;
                let height = base.height / scale;
                let rect = CropRect {
                    x: (1.0 - width) * percent(x),
                    y: (1.0 - height) * percent(y),
                    width,
                    height,
                };
                clamp(rect, lock)
            }
        }
    }

    /// Whether this record carries any crop information.
    pub fn is_uncropped(&self) -> bool {
        match self {
            Self::Uncropped => true,
            Self::Rectangle(rect) => rect.is_uncropped_sentinel(),
            Self::ScalePosition { .. } => false,
        }
    }
}

impl From<CropRect> for StoredCrop {
    fn from(rect: CropRect) -> Self {
        Self::Rectangle(rect)
    }
}

/// Percent (0–100) to fraction; non-finite focus means centered.
fn percent(p: f64) -> f64 {
    if p.is_finite() {
        (p / 100.0).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::ImageSize;

    fn lock(target: f64, w: u32, h: u32) -> AspectLock {
        AspectLock::new(target, ImageSize::new(w, h)).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn uncropped_and_sentinel_fit() {
        let l = lock(1.0, 1600, 1200);
        assert_eq!(StoredCrop::Uncropped.normalize(&l), fit(&l));
        assert_eq!(StoredCrop::Rectangle(CropRect::FULL).normalize(&l), fit(&l));
        assert!(StoredCrop::Rectangle(CropRect::FULL).is_uncropped());
        assert!(StoredCrop::default().is_uncropped());
    }

    #[test]
    fn valid_rectangle_passes_through() {
        let l = lock(1.0, 1600, 1200);
        let r = CropRect::new(0.05, 0.1, 0.6, 0.8);
        assert_eq!(StoredCrop::from(r).normalize(&l), r);
    }

    #[test]
    fn stale_rectangle_is_repaired() {
        // Saved for a different photo: aspect no longer matches.
        let l = lock(1.0, 1600, 1200);
        let r = StoredCrop::Rectangle(CropRect::new(0.2, 0.2, 0.5, 0.5)).normalize(&l);
        assert!(r.is_valid(&l));
    }

    #[test]
    fn scale_one_centered_is_fit() {
        let l = lock(1.0, 1600, 1200);
        let r = StoredCrop::ScalePosition {
            scale: 1.0,
            x: 50.0,
            y: 50.0,
        }
        .normalize(&l);
        assert_eq!(r, fit(&l));
    }

    #[test]
    fn scale_two_zooms_into_focus() {
        let l = lock(1.0, 1000, 1000);
        let r = StoredCrop::ScalePosition {
            scale: 2.0,
            x: 0.0,
            y: 100.0,
        }
        .normalize(&l);
        assert!(approx(r.width, 0.5));
        assert!(approx(r.height, 0.5));
        assert_eq!(r.x, 0.0);
        assert!(approx(r.y, 0.5));
    }

    #[test]
    fn scale_below_one_or_nan_is_unzoomed() {
        let l = lock(1.0, 1000, 1000);
        for scale in [0.5, f64::NAN, -3.0] {
            let r = StoredCrop::ScalePosition {
                scale,
                x: 50.0,
                y: 50.0,
            }
            .normalize(&l);
            assert_eq!(r, CropRect::FULL, "scale {scale}");
        }
    }

    #[test]
    fn huge_scale_floors_at_min_size() {
        let l = lock(1.0, 1000, 1000);
        let r = StoredCrop::ScalePosition {
            scale: 100.0,
            x: 50.0,
            y: 50.0,
        }
        .normalize(&l);
        assert!(approx(r.width, 0.2));
        assert!(r.is_valid(&l));
        assert!(!StoredCrop::ScalePosition {
            scale: 100.0,
            x: 50.0,
            y: 50.0,
        }
        .is_uncropped());
    }
}
