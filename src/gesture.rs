//! Pure drag/resize rules for a locked crop rectangle.
//!
//! [`apply_gesture`] maps a starting rectangle, a gesture kind, and the total
//! pointer displacement (in image fractions) to the new rectangle. It holds
//! no state; [`CropSession`](crate::CropSession) owns the interaction state
//! and calls it on every pointer move.
//!
//! Resizes keep the aspect lock by construction: a single scalar "reach" is
//! taken from the diagonal of the pointer delta, applied to the width, and
//! the height is derived from the width. Both dimensions never move
//! independently, so no intermediate frame is distorted.
//!
//! ```text
//!     nw ┌──────────┐ ne        resize-se: anchor = nw corner
//!        │          │           resize-nw: anchor = se corner
//!        │   move   │           resize-ne: anchor = sw corner
//!        │          │           resize-sw: anchor = ne corner
//!     sw └──────────┘ se
//! ```

use kurbo::{Point, Size, Vec2};

use crate::rect::{AspectLock, CropRect, clamp};

/// What a pointer drag does to the crop rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Translate the whole rectangle.
    Move,
    /// Drag the top-left corner; bottom-right is anchored.
    ResizeNw,
    /// Drag the top-right corner; bottom-left is anchored.
    ResizeNe,
    /// Drag the bottom-left corner; top-right is anchored.
    ResizeSw,
    /// Drag the bottom-right corner; top-left is anchored.
    ResizeSe,
}

impl GestureKind {
    /// All four corner resizes, in hit-test priority order.
    pub const CORNERS: [Self; 4] = [Self::ResizeNw, Self::ResizeNe, Self::ResizeSw, Self::ResizeSe];

    /// Whether this gesture resizes (as opposed to moves).
    pub fn is_resize(self) -> bool {
        !matches!(self, Self::Move)
    }

    /// Direction that enlarges the rectangle, per axis: `+1` when the
    /// dragged corner grows toward larger coordinates. `Move` has none.
    pub fn growth_signs(self) -> Option<(f64, f64)> {
        match self {
            Self::Move => None,
            Self::ResizeNw => Some((-1.0, -1.0)),
            Self::ResizeNe => Some((1.0, -1.0)),
            Self::ResizeSw => Some((-1.0, 1.0)),
            Self::ResizeSe => Some((1.0, 1.0)),
        }
    }

    /// The dragged corner of `rect`, in image fractions.
    pub fn handle_position(self, rect: &CropRect) -> Option<Point> {
        match self {
            Self::Move => None,
            Self::ResizeNw => Some(Point::new(rect.x, rect.y)),
            Self::ResizeNe => Some(Point::new(rect.right(), rect.y)),
            Self::ResizeSw => Some(Point::new(rect.x, rect.bottom())),
            Self::ResizeSe => Some(Point::new(rect.right(), rect.bottom())),
        }
    }

    /// The corner that stays fixed while this gesture resizes `rect`.
    pub fn anchor(self, rect: &CropRect) -> Option<Point> {
        match self {
            Self::Move => None,
            Self::ResizeNw => Self::ResizeSe.handle_position(rect),
            Self::ResizeNe => Self::ResizeSw.handle_position(rect),
            Self::ResizeSw => Self::ResizeNe.handle_position(rect),
            Self::ResizeSe => Self::ResizeNw.handle_position(rect),
        }
    }
}

/// Convert a pointer displacement in display pixels into image fractions,
/// given the current on-screen size of the whole image.
///
/// Returns `None` when `shown` is empty or not finite.
pub fn to_normalized(delta_px: Vec2, shown: Size) -> Option<Vec2> {
    if !is_usable_display(shown) {
        return None;
    }
    Some(Vec2::new(delta_px.x / shown.width, delta_px.y / shown.height))
}

pub(crate) fn is_usable_display(shown: Size) -> bool {
    shown.width.is_finite() && shown.height.is_finite() && shown.width > 0.0 && shown.height > 0.0
}

/// Apply a gesture to `start` with total displacement `delta` (image
/// fractions, measured from the pointer-down position).
///
/// The result always satisfies every invariant of `lock`.
pub fn apply_gesture(start: CropRect, kind: GestureKind, delta: Vec2, lock: &AspectLock) -> CropRect {
    let start = clamp(start, lock);
    let delta = if delta.is_finite() { delta } else { Vec2::ZERO };
    match kind.growth_signs() {
        None => translate(start, delta),
        Some((sx, sy)) => resize(start, sx, sy, delta, lock),
    }
}

fn translate(start: CropRect, delta: Vec2) -> CropRect {
    CropRect {
        x: (start.x + delta.x).clamp(0.0, (1.0 - start.width).max(0.0)),
        y: (start.y + delta.y).clamp(0.0, (1.0 - start.height).max(0.0)),
        width: start.width,
        height: start.height,
    }
}

fn resize(start: CropRect, sx: f64, sy: f64, delta: Vec2, lock: &AspectLock) -> CropRect {
    let ratio = lock.ratio();

    // Anchor is the corner opposite the drag direction on each axis.
    let anchor_x = if sx > 0.0 { start.x } else { start.right() };
    let anchor_y = if sy > 0.0 { start.y } else { start.bottom() };

    // Room between the anchor and the image edge the rectangle grows toward.
    let room_x = if sx > 0.0 { 1.0 - anchor_x } else { anchor_x };
    let room_y = if sy > 0.0 { 1.0 - anchor_y } else { anchor_y };

    let reach = (sx * delta.x + sy * delta.y) / 2.0;
    let width = (start.width + reach)
        .min(room_x)
        .min(room_y * ratio)
        .min(lock.max_width())
        .max(lock.min_width());
    let height = lock.height_for(width);

    let x = if sx > 0.0 { anchor_x } else { anchor_x - width };
    let y = if sy > 0.0 { anchor_y } else { anchor_y - height };

    clamp(
        CropRect {
            x,
            y,
            width,
            height,
        },
        lock,
    )
}

/// Decide which gesture a pointer-down at `at` starts.
///
/// `at` is in display pixels relative to the top-left of the shown image,
/// whose on-screen size is `shown`. Corner handles accept presses within
/// `handle_radius` pixels and win over the body; the nearest corner wins
/// when handles overlap on a small crop. A press elsewhere inside the
/// rectangle is a [`GestureKind::Move`]; outside, `None`.
pub fn hit_test(rect: &CropRect, at: Point, shown: Size, handle_radius: f64) -> Option<GestureKind> {
    if !is_usable_display(shown) || !at.is_finite() {
        return None;
    }

    let to_px = |p: Point| Point::new(p.x * shown.width, p.y * shown.height);
    let radius_sq = handle_radius.max(0.0) * handle_radius.max(0.0);

    let mut best: Option<(GestureKind, f64)> = None;
    for kind in GestureKind::CORNERS {
        let Some(corner) = kind.handle_position(rect) else {
            continue;
        };
        let d = to_px(corner).distance_squared(at);
        if d <= radius_sq && best.is_none_or(|(_, bd)| d < bd) {
            best = Some((kind, d));
        }
    }
    if let Some((kind, _)) = best {
        return Some(kind);
    }

    let top_left = to_px(Point::new(rect.x, rect.y));
    let bottom_right = to_px(Point::new(rect.right(), rect.bottom()));
    let inside = at.x >= top_left.x && at.x <= bottom_right.x && at.y >= top_left.y && at.y <= bottom_right.y;
    inside.then_some(GestureKind::Move)
}
