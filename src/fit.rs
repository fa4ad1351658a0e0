//! Fit initializer: the largest aspect-correct crop of a source image.
//!
//! The fitted crop spans the full height when the image is relatively wider
//! than the target, and the full width otherwise. No letterboxing is ever
//! needed to display it at the target aspect.

use crate::rect::{AspectLock, CropRect};

/// Where to position the crop along the axis that has slack.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gravity {
    /// Center on both axes.
    #[default]
    Center,
    /// Position by fraction of the slack. `(0.0, 0.0)` = top-left,
    /// `(1.0, 1.0)` = bottom-right.
    Percentage(f64, f64),
}

/// Largest centered crop of the locked aspect.
///
/// Deterministic: identical inputs give bit-identical output, so a reset
/// followed by another reset is a no-op.
///
/// ```
/// use zencrop::{AspectLock, ImageSize, fit};
///
/// // Square crop of a 1600×1200 photo: full height, centered horizontally.
/// let lock = AspectLock::new(1.0, ImageSize::new(1600, 1200)).unwrap();
/// let r = fit(&lock);
/// assert_eq!((r.x, r.y, r.width, r.height), (0.125, 0.0, 0.75, 1.0));
/// ```
pub fn fit(lock: &AspectLock) -> CropRect {
    fit_with_gravity(lock, Gravity::Center)
}

/// Largest crop of the locked aspect, placed by `gravity`.
pub fn fit_with_gravity(lock: &AspectLock, gravity: Gravity) -> CropRect {
    let target = lock.target_aspect();
    let image = lock.image_aspect();

    if image > target {
        // Image is wider: full height, crop width.
        let width = target / image;
        CropRect {
            x: gravity_offset_1d(1.0 - width, &gravity, true),
            y: 0.0,
            width,
            height: 1.0,
        }
    } else {
        // Image is taller or equal: full width, crop height.
        let height = image / target;
        CropRect {
            x: 0.0,
            y: gravity_offset_1d(1.0 - height, &gravity, false),
            width: 1.0,
            height,
        }
    }
}

fn gravity_offset_1d(space: f64, gravity: &Gravity, horizontal: bool) -> f64 {
    if space <= 0.0 {
        return 0.0;
    }
    match gravity {
        Gravity::Center => space / 2.0,
        Gravity::Percentage(x, y) => {
            let pct = if horizontal { *x } else { *y };
            if pct.is_nan() {
                return space / 2.0;
            }
            space * pct.clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::ImageSize;

    fn lock(target: f64, w: u32, h: u32) -> AspectLock {
        AspectLock::new(target, ImageSize::new(w, h)).unwrap()
    }

    // ── centered fit ────────────────────────────────────────────────────

    #[test]
    fn wider_image_spans_full_height() {
        let l = lock(1.0, 1600, 1200);
        let r = fit(&l);
        assert_eq!(r.height, 1.0);
        assert_eq!(r.y, 0.0);
        assert_eq!(r.width, 0.75);
        assert_eq!(r.x, 0.125);
        assert!(r.is_valid(&l));
    }

    #[test]
    fn taller_image_spans_full_width() {
        // 3:4 portrait crop of a 1000×2000 portrait photo.
        let l = lock(0.75, 1000, 2000);
        let r = fit(&l);
        assert_eq!(r.width, 1.0);
        assert_eq!(r.x, 0.0);
        assert!((r.height - 2.0 / 3.0).abs() < 1e-12);
        assert!((r.y - 1.0 / 6.0).abs() < 1e-12);
        assert!(r.is_valid(&l));
    }

    #[test]
    fn matching_aspect_is_full_image() {
        let l = lock(1200.0 / 630.0, 1200, 630);
        assert_eq!(fit(&l), CropRect::FULL);
    }

    #[test]
    fn share_card_from_portrait() {
        // 1200:630 social card from a portrait phone photo.
        let l = lock(1200.0 / 630.0, 1080, 1920);
        let r = fit(&l);
        assert_eq!(r.width, 1.0);
        assert!(r.height < 0.5);
        assert!(r.is_valid(&l));
    }

    #[test]
    fn fit_is_bit_identical_on_repeat() {
        let l = lock(1.9048, 4032, 3024);
        let a = fit(&l);
        let b = fit(&l);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.width.to_bits(), b.width.to_bits());
        assert_eq!(a.height.to_bits(), b.height.to_bits());
    }

    // ── gravity ─────────────────────────────────────────────────────────

    #[test]
    fn gravity_top_left() {
        let l = lock(1.0, 1600, 1200);
        let r = fit_with_gravity(&l, Gravity::Percentage(0.0, 0.0));
        assert_eq!((r.x, r.y), (0.0, 0.0));
    }

    #[test]
    fn gravity_bottom_right() {
        let l = lock(1.0, 1200, 1600);
        let r = fit_with_gravity(&l, Gravity::Percentage(1.0, 1.0));
        assert_eq!(r.x, 0.0); // Only height was cropped
        assert!((r.bottom() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gravity_percentage_clamped() {
        let l = lock(1.0, 1600, 1200);
        let over = fit_with_gravity(&l, Gravity::Percentage(2.0, 0.0));
        let under = fit_with_gravity(&l, Gravity::Percentage(-1.0, 0.0));
        assert_eq!(over.x, 0.25);
        assert_eq!(under.x, 0.0);
    }

    #[test]
    fn gravity_50_50_equals_center() {
        let l = lock(1.0, 1600, 1200);
        assert_eq!(
            fit_with_gravity(&l, Gravity::Percentage(0.5, 0.5)),
            fit(&l)
        );
    }

    #[test]
    fn gravity_nan_falls_back_to_center() {
        let l = lock(1.0, 1600, 1200);
        assert_eq!(
            fit_with_gravity(&l, Gravity::Percentage(f64::NAN, 0.0)),
            fit(&l)
        );
    }
}
