//! Render transform: show exactly the cropped region in any display box.
//!
//! A [`RenderTransform`] is derived from the four stored crop numbers only,
//! so every consumer (thumbnail, hero image, share card) reproduces the same
//! crop regardless of the pixel size it renders at.
//!
//! The origin is expressed as a position along the *slack* (the part of the
//! magnified image that doesn't fit the box), the same convention as CSS
//! `object-position` percentages. That makes it independent of the absolute
//! size of the display box.
//!
//! ```
//! use kurbo::Size;
//! use zencrop::{CropRect, RenderTransform};
//!
//! let t = RenderTransform::new(&CropRect::new(0.125, 0.0, 0.75, 1.0));
//! assert_eq!(t.origin_x, 0.5);
//!
//! // Same crop at 40px and 4000px: offsets scale with the box.
//! let small = t.placement(Size::new(40.0, 40.0));
//! let large = t.placement(Size::new(4000.0, 4000.0));
//! assert!((large.offset.x - small.offset.x * 100.0).abs() < 1e-9);
//! ```

use kurbo::{Point, Size};

use crate::rect::{AspectLock, CropRect};
use crate::stored::StoredCrop;

/// Magnification and slack position that display only the crop region.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderTransform {
    /// Horizontal magnification of the full image (`1 / width`).
    pub scale_x: f64,
    /// Vertical magnification of the full image (`1 / height`).
    pub scale_y: f64,
    /// Horizontal position along the slack, `0.0..=1.0`.
    pub origin_x: f64,
    /// Vertical position along the slack, `0.0..=1.0`.
    pub origin_y: f64,
}

impl RenderTransform {
    /// No crop: fill the box, centered.
    pub const NEUTRAL: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        origin_x: 0.5,
        origin_y: 0.5,
    };

    /// Transform for a stored crop rectangle.
    ///
    /// A rectangle covering the whole image on both axes is the legacy
    /// "no crop data" record and maps to [`NEUTRAL`](Self::NEUTRAL).
    pub fn new(rect: &CropRect) -> Self {
        if rect.width >= 1.0 && rect.height >= 1.0 {
            return Self::NEUTRAL;
        }
        let (scale_x, origin_x) = axis(rect.x, rect.width);
        let (scale_y, origin_y) = axis(rect.y, rect.height);
        Self {
            scale_x,
            scale_y,
            origin_x,
            origin_y,
        }
    }

    /// Transform for any persisted crop shape, normalized against `lock`.
    pub fn for_stored(stored: &StoredCrop, lock: &AspectLock) -> Self {
        Self::new(&stored.normalize(lock))
    }

    /// Whether this transform shows the whole image unmodified.
    pub fn is_neutral(&self) -> bool {
        self.scale_x == 1.0 && self.scale_y == 1.0
    }

    /// Resolve to pixel placement for a display box.
    ///
    /// Each axis is magnified independently, so the source keeps its aspect
    /// only when `display` has the target aspect. For boxes of any other
    /// shape use [`cover`](Self::cover).
    pub fn placement(&self, display: Size) -> Placement {
        let drawn = Size::new(display.width * self.scale_x, display.height * self.scale_y);
        let offset = Point::new(
            -(drawn.width - display.width) * self.origin_x,
            -(drawn.height - display.height) * self.origin_y,
        );
        Placement { drawn, offset }
    }

    /// Resolve to pixel placement for a display box of any shape, without
    /// distortion.
    ///
    /// The source (of aspect `image_aspect`) is scaled uniformly until the
    /// crop region covers `display`, then the crop is centered in the box.
    /// Whatever overflows is clipped from the crop itself, never filled from
    /// outside it. When `display` has the target aspect this equals
    /// [`placement`](Self::placement).
    ///
    /// ```
    /// use kurbo::Size;
    /// use zencrop::{CropRect, RenderTransform};
    ///
    /// // Square crop of a 4:3 photo shown in a 2:1 banner slot.
    /// let t = RenderTransform::new(&CropRect::new(0.125, 0.0, 0.75, 1.0));
    /// let p = t.cover(Size::new(200.0, 100.0), 4.0 / 3.0);
    /// assert!((p.drawn.width / p.drawn.height - 4.0 / 3.0).abs() < 1e-9);
    /// ```
    pub fn cover(&self, display: Size, image_aspect: f64) -> Placement {
        let usable = display.width.is_finite()
            && display.height.is_finite()
            && display.width > 0.0
            && display.height > 0.0
            && image_aspect.is_finite()
            && image_aspect > 0.0;
        if !usable {
            return self.placement(display);
        }
        let (x, width) = crop_extent(self.scale_x, self.origin_x);
        let (y, height) = crop_extent(self.scale_y, self.origin_y);

        let drawn_w = (display.width / width).max(display.height * image_aspect / height);
        let drawn = Size::new(drawn_w, drawn_w / image_aspect);
        let offset = Point::new(
            -x * drawn.width + (display.width - width * drawn.width) / 2.0,
            -y * drawn.height + (display.height - height * drawn.height) / 2.0,
        );
        Placement { drawn, offset }
    }
}

/// Recover `(start, extent)` of one crop axis from scale and slack origin.
fn crop_extent(scale: f64, origin: f64) -> (f64, f64) {
    let extent = if scale.is_finite() && scale >= 1.0 { 1.0 / scale } else { 1.0 };
    let origin = if origin.is_finite() { origin.clamp(0.0, 1.0) } else { 0.0 };
    (origin * (1.0 - extent), extent)
}

impl Default for RenderTransform {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Per-axis scale and slack position. Degenerate or full axes get scale 1
/// and origin 0.
fn axis(start: f64, extent: f64) -> (f64, f64) {
    if !start.is_finite() || !extent.is_finite() || extent <= 0.0 || extent >= 1.0 {
        return (1.0, 0.0);
    }
    let origin = (start / (1.0 - extent)).clamp(0.0, 1.0);
    (1.0 / extent, origin)
}

/// Pixel geometry for drawing the full source image inside a display box
/// (with the box clipping) so only the crop region is visible.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Size to draw the whole source image at.
    pub drawn: Size,
    /// Top-left of the drawn image relative to the box; zero or negative.
    pub offset: Point,
}

impl Placement {
    /// The visible window in drawn-image pixels.
    pub fn visible(&self, display: Size) -> kurbo::Rect {
        kurbo::Rect::from_origin_size(Point::new(-self.offset.x, -self.offset.y), display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::ImageSize;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn scale_is_inverse_extent() {
        let t = RenderTransform::new(&CropRect::new(0.1, 0.2, 0.5, 0.25));
        assert_eq!(t.scale_x, 2.0);
        assert_eq!(t.scale_y, 4.0);
    }

    #[test]
    fn origin_is_position_along_slack() {
        let t = RenderTransform::new(&CropRect::new(0.25, 0.0, 0.5, 0.5));
        assert_eq!(t.origin_x, 0.5);
        assert_eq!(t.origin_y, 0.0);
        let t = RenderTransform::new(&CropRect::new(0.5, 0.5, 0.5, 0.5));
        assert_eq!((t.origin_x, t.origin_y), (1.0, 1.0));
    }

    #[test]
    fn full_axis_uses_zero_origin() {
        let t = RenderTransform::new(&CropRect::new(0.125, 0.0, 0.75, 1.0));
        assert_eq!(t.scale_y, 1.0);
        assert_eq!(t.origin_y, 0.0);
        assert!(approx(t.scale_x, 4.0 / 3.0));
        assert_eq!(t.origin_x, 0.5);
    }

    #[test]
    fn uncropped_is_neutral() {
        assert_eq!(RenderTransform::new(&CropRect::FULL), RenderTransform::NEUTRAL);
        assert!(RenderTransform::NEUTRAL.is_neutral());
        assert_eq!(RenderTransform::default(), RenderTransform::NEUTRAL);
    }

    #[test]
    fn degenerate_extent_does_not_divide_by_zero() {
        let t = RenderTransform::new(&CropRect::new(0.5, 0.5, 0.0, 0.5));
        assert_eq!(t.scale_x, 1.0);
        assert!(t.scale_y.is_finite());
    }

    #[test]
    fn placement_shows_only_the_crop() {
        // Right half of the image, top half, in a 300×200 box.
        let rect = CropRect::new(0.5, 0.0, 0.5, 0.5);
        let p = RenderTransform::new(&rect).placement(Size::new(300.0, 200.0));
        assert_eq!(p.drawn, Size::new(600.0, 400.0));
        assert_eq!(p.offset, Point::new(-300.0, 0.0));
        let vis = p.visible(Size::new(300.0, 200.0));
        // Visible window in drawn pixels matches the crop in fractions.
        assert!(approx(vis.x0 / p.drawn.width, rect.x));
        assert!(approx(vis.x1 / p.drawn.width, rect.right()));
        assert!(approx(vis.y1 / p.drawn.height, rect.bottom()));
    }

    #[test]
    fn placement_offset_equals_crop_origin_in_drawn_pixels() {
        let rect = CropRect::new(0.1, 0.3, 0.6, 0.45);
        let display = Size::new(120.0, 90.0);
        let p = RenderTransform::new(&rect).placement(display);
        assert!(approx(-p.offset.x, rect.x * p.drawn.width));
        assert!(approx(-p.offset.y, rect.y * p.drawn.height));
    }

    #[test]
    fn neutral_placement_is_identity() {
        let p = RenderTransform::NEUTRAL.placement(Size::new(640.0, 480.0));
        assert_eq!(p.drawn, Size::new(640.0, 480.0));
        assert_eq!(p.offset, Point::ZERO);
    }

    // ── cover ───────────────────────────────────────────────────────────

    #[test]
    fn cover_keeps_source_aspect_in_off_aspect_box() {
        // Square crop of 1600×1200 in a 2:1 box.
        let rect = CropRect::new(0.125, 0.0, 0.75, 1.0);
        let display = Size::new(200.0, 100.0);
        let p = RenderTransform::new(&rect).cover(display, 4.0 / 3.0);
        assert!(approx(p.drawn.width / p.drawn.height, 4.0 / 3.0));
        assert!(approx(p.drawn.width, 800.0 / 3.0));
        assert!(approx(p.drawn.height, 200.0));
        // Crop region is 200×200 drawn; centered vertically in the box.
        assert!(approx(p.offset.x, -100.0 / 3.0));
        assert!(approx(p.offset.y, -50.0));
    }

    #[test]
    fn cover_only_shows_inside_the_crop() {
        let rect = CropRect::new(0.1, 0.3, 0.6, 0.45);
        let t = RenderTransform::new(&rect);
        for display in [
            Size::new(300.0, 100.0),
            Size::new(100.0, 300.0),
            Size::new(640.0, 480.0),
        ] {
            let p = t.cover(display, 1.5);
            assert!(approx(p.drawn.width / p.drawn.height, 1.5), "{display:?}");
            let vis = p.visible(display);
            assert!(vis.x0 / p.drawn.width >= rect.x - 1e-9, "{display:?}");
            assert!(vis.x1 / p.drawn.width <= rect.right() + 1e-9, "{display:?}");
            assert!(vis.y0 / p.drawn.height >= rect.y - 1e-9, "{display:?}");
            assert!(vis.y1 / p.drawn.height <= rect.bottom() + 1e-9, "{display:?}");
        }
    }

    #[test]
    fn cover_matches_placement_for_target_aspect_box() {
        // Target 1.5 on a 4:3 image; box has the target aspect.
        let lock = AspectLock::new(1.5, ImageSize::new(1600, 1200)).unwrap();
        let rect = StoredCrop::Rectangle(CropRect::new(0.0, 0.2, 0.5, 4.0 / 9.0)).normalize(&lock);
        let t = RenderTransform::new(&rect);
        let display = Size::new(300.0, 200.0);
        let a = t.placement(display);
        let b = t.cover(display, lock.image_aspect());
        assert!(approx(a.drawn.width, b.drawn.width));
        assert!(approx(a.drawn.height, b.drawn.height));
        assert!(approx(a.offset.x, b.offset.x));
        assert!(approx(a.offset.y, b.offset.y));
    }

    #[test]
    fn cover_of_neutral_fills_centered() {
        let p = RenderTransform::NEUTRAL.cover(Size::new(100.0, 100.0), 2.0);
        assert_eq!(p.drawn, Size::new(200.0, 100.0));
        assert_eq!(p.offset, Point::new(-50.0, 0.0));
    }

    #[test]
    fn cover_with_bad_aspect_falls_back_to_placement() {
        let t = RenderTransform::new(&CropRect::new(0.5, 0.0, 0.5, 0.5));
        let display = Size::new(300.0, 200.0);
        assert_eq!(t.cover(display, f64::NAN), t.placement(display));
        assert_eq!(t.cover(display, 0.0), t.placement(display));
    }

    #[test]
    fn for_stored_normalizes_first() {
        let lock = AspectLock::new(1.0, ImageSize::new(1600, 1200)).unwrap();
        let t = RenderTransform::for_stored(&StoredCrop::Uncropped, &lock);
        // Uncropped records get the centered fit, not the whole image.
        assert!(approx(t.scale_x, 4.0 / 3.0));
        assert_eq!(t.origin_x, 0.5);
    }
}
