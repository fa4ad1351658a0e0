//! Interactive crop session: configuration and the gesture state machine.
//!
//! [`CropSession`] holds everything an editor surface needs between pointer
//! events: the locked aspect, the committed rectangle, the live rectangle
//! shown during a drag, and which gesture (if any) is active. All geometry
//! is delegated to [`apply_gesture`], [`fit_with_gravity`], and
//! [`hit_test`]; the session only decides *when* they run.
//!
//! ```text
//!   NotReady ──set_image──▶ Idle ──begin──▶ Dragging ──drag_to──▶ Dragging
//!      ▲                     ▲                  │
//!      └──clear_image────────┤◀──end / cancel───┘
//! ```
//!
//! # Example
//!
//! ```
//! use kurbo::{Point, Size};
//! use zencrop::{CropConfig, CropSession, GestureKind, ImageSize};
//!
//! let mut session = CropSession::new(CropConfig::new(1.0)).unwrap();
//! session.set_image(ImageSize::new(1600, 1200), None).unwrap();
//!
//! // Image shown at 800×600 on screen; drag the body 80px to the right.
//! let shown = Size::new(800.0, 600.0);
//! session.begin(GestureKind::Move, Point::new(400.0, 300.0), shown).unwrap();
//! session.drag_to(Point::new(480.0, 300.0), shown);
//! let committed = session.end().unwrap();
//! assert!((committed.x - 0.225).abs() < 1e-12);
//! ```

use kurbo::{Point, Size};

use crate::error::CropError;
use crate::fit::{Gravity, fit_with_gravity};
use crate::gesture::{GestureKind, apply_gesture, hit_test, is_usable_display, to_normalized};
use crate::rect::{AspectLock, CropRect, DEFAULT_MIN_SIZE, ImageSize, Rect, validate_min_size};
use crate::render::RenderTransform;
use crate::stored::StoredCrop;

/// Default corner-handle hit radius in display pixels (44px touch target).
pub const DEFAULT_HANDLE_RADIUS: f64 = 22.0;

/// Settings fixed for the life of one crop session.
///
/// # Example
///
/// ```
/// use zencrop::{CropConfig, Gravity};
///
/// // 1200×630 social share card, crops start at the top of the photo.
/// let config = CropConfig::new(1200.0 / 630.0)
///     .min_size(0.25)
///     .gravity(Gravity::Percentage(0.5, 0.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropConfig {
    /// Output aspect ratio (width / height).
    pub target_aspect: f64,
    /// Minimum crop width/height as a fraction of the source.
    #[cfg_attr(feature = "serde", serde(default = "default_min_size"))]
    pub min_size: f64,
    /// Placement of the fitted crop on attach and reset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub gravity: Gravity,
    /// Corner-handle hit radius in display pixels.
    #[cfg_attr(feature = "serde", serde(default = "default_handle_radius"))]
    pub handle_radius: f64,
}

#[cfg(feature = "serde")]
fn default_min_size() -> f64 {
    DEFAULT_MIN_SIZE
}

#[cfg(feature = "serde")]
fn default_handle_radius() -> f64 {
    DEFAULT_HANDLE_RADIUS
}

impl CropConfig {
    /// Config for `target_aspect` with default minimum size, centered
    /// gravity, and default handle radius.
    pub fn new(target_aspect: f64) -> Self {
        Self {
            target_aspect,
            min_size: DEFAULT_MIN_SIZE,
            gravity: Gravity::Center,
            handle_radius: DEFAULT_HANDLE_RADIUS,
        }
    }

    /// Set the minimum crop width/height (fraction of the source).
    pub fn min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set gravity for the fitted crop.
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the corner-handle hit radius in display pixels.
    pub fn handle_radius(mut self, radius: f64) -> Self {
        self.handle_radius = radius;
        self
    }

    /// Check the target aspect, minimum size, and handle radius.
    pub fn validate(&self) -> Result<(), CropError> {
        if !self.target_aspect.is_finite() || self.target_aspect <= 0.0 {
            return Err(CropError::InvalidTargetAspect);
        }
        validate_min_size(self.min_size)?;
        if !self.handle_radius.is_finite() || self.handle_radius < 0.0 {
            return Err(CropError::InvalidHandleRadius);
        }
        Ok(())
    }

    /// Build the aspect lock for an image of the given natural size.
    pub fn lock_for(&self, image: ImageSize) -> Result<AspectLock, CropError> {
        AspectLock::new(self.target_aspect, image)?.with_min_size(self.min_size)
    }
}

/// Observable session state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No image dimensions yet; gestures are refused.
    NotReady,
    /// Image attached, no gesture in progress.
    Idle,
    /// A gesture of this kind is in progress.
    Dragging(GestureKind),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Attached {
    size: ImageSize,
    lock: AspectLock,
    /// Last value handed to persistence.
    committed: CropRect,
    /// What the surface shows; differs from `committed` only mid-gesture.
    live: CropRect,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Drag {
    Idle,
    Dragging {
        kind: GestureKind,
        /// Pointer position at gesture start, display pixels.
        origin: Point,
        /// Rectangle at gesture start.
        start: CropRect,
    },
}

/// Crop editing state for one image attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct CropSession {
    config: CropConfig,
    image: Option<Attached>,
    drag: Drag,
}

impl CropSession {
    /// Start a session. Fails if the config is invalid.
    pub fn new(config: CropConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self {
            config,
            image: None,
            drag: Drag::Idle,
        })
    }

    /// Session configuration.
    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        match (&self.image, &self.drag) {
            (None, _) => SessionState::NotReady,
            (Some(_), Drag::Idle) => SessionState::Idle,
            (Some(_), Drag::Dragging { kind, .. }) => SessionState::Dragging(*kind),
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, Drag::Dragging { .. })
    }

    /// Natural size of the attached image.
    pub fn image(&self) -> Option<ImageSize> {
        self.image.map(|a| a.size)
    }

    /// Aspect lock for the attached image.
    pub fn lock(&self) -> Option<AspectLock> {
        self.image.map(|a| a.lock)
    }

    /// Rectangle to display right now (live during a gesture).
    pub fn rect(&self) -> Option<CropRect> {
        self.image.map(|a| a.live)
    }

    /// Last committed rectangle.
    pub fn committed(&self) -> Option<CropRect> {
        self.image.map(|a| a.committed)
    }

    /// Render transform for the live rectangle.
    pub fn render_transform(&self) -> Option<RenderTransform> {
        self.rect().map(|r| RenderTransform::new(&r))
    }

    /// Committed crop resolved to source pixels.
    pub fn pixel_crop(&self) -> Option<Rect> {
        self.image.map(|a| a.committed.to_pixels(a.size))
    }

    /// Attach (or swap) the image once its natural size is known.
    ///
    /// Any gesture in progress is cancelled first so it never races the new
    /// dimensions. `initial` resumes a previously stored crop; `None`, an
    /// uncropped record, or the `(1, 1)` sentinel get the fitted crop.
    ///
    /// On error the session drops the previous image and becomes
    /// [`SessionState::NotReady`].
    pub fn set_image(
        &mut self,
        size: ImageSize,
        initial: Option<StoredCrop>,
    ) -> Result<CropRect, CropError> {
        self.cancel();
        let lock = match self.config.lock_for(size) {
            Ok(lock) => lock,
            Err(e) => {
                self.image = None;
                tracing::debug!(width = size.width, height = size.height, error = ?e, "crop image rejected");
                return Err(e);
            }
        };
        let rect = match initial {
            Some(stored) if !stored.is_uncropped() => stored.normalize(&lock),
            _ => fit_with_gravity(&lock, self.config.gravity),
        };
        self.image = Some(Attached {
            size,
            lock,
            committed: rect,
            live: rect,
        });
        tracing::debug!(width = size.width, height = size.height, ?rect, "crop image attached");
        Ok(rect)
    }

    /// Detach the image; the session becomes [`SessionState::NotReady`].
    pub fn clear_image(&mut self) {
        self.cancel();
        self.image = None;
        tracing::debug!("crop image cleared");
    }

    /// Replace the crop with the fitted rectangle and commit it.
    pub fn reset(&mut self) -> Result<CropRect, CropError> {
        self.cancel();
        let gravity = self.config.gravity;
        let attached = self.image.as_mut().ok_or(CropError::NotReady)?;
        let rect = fit_with_gravity(&attached.lock, gravity);
        attached.committed = rect;
        attached.live = rect;
        tracing::debug!(?rect, "crop reset to fit");
        Ok(rect)
    }

    /// Start a gesture at pointer position `at`, with the image currently
    /// shown at `shown` display pixels.
    ///
    /// A `begin` while already dragging replaces the gesture: the new one
    /// starts from the current live rectangle at the new pointer position.
    pub fn begin(&mut self, kind: GestureKind, at: Point, shown: Size) -> Result<(), CropError> {
        let attached = self.image.as_ref().ok_or(CropError::NotReady)?;
        if !is_usable_display(shown) {
            return Err(CropError::EmptyDisplay);
        }
        if let Drag::Dragging { kind: previous, .. } = self.drag {
            tracing::debug!(?previous, ?kind, "crop gesture replaced");
        } else {
            tracing::debug!(?kind, "crop gesture started");
        }
        self.drag = Drag::Dragging {
            kind,
            origin: at,
            start: attached.live,
        };
        Ok(())
    }

    /// Hit-test `at` against the live rectangle and begin the matching
    /// gesture. Returns the gesture started, or `None` for a press outside
    /// the crop.
    pub fn pointer_down(&mut self, at: Point, shown: Size) -> Result<Option<GestureKind>, CropError> {
        let attached = self.image.as_ref().ok_or(CropError::NotReady)?;
        if !is_usable_display(shown) {
            return Err(CropError::EmptyDisplay);
        }
        match hit_test(&attached.live, at, shown, self.config.handle_radius) {
            Some(kind) => {
                self.begin(kind, at, shown)?;
                Ok(Some(kind))
            }
            None => Ok(None),
        }
    }

    /// Pointer moved to `at` during a gesture.
    ///
    /// Returns the new live rectangle, or `None` for a stale event (no
    /// gesture active) or an unusable `shown` size, in which case nothing
    /// changes.
    pub fn drag_to(&mut self, at: Point, shown: Size) -> Option<CropRect> {
        let Drag::Dragging {
            kind,
            origin,
            start,
        } = self.drag
        else {
            tracing::trace!("stale crop drag event ignored");
            return None;
        };
        let attached = self.image.as_mut()?;
        let delta = to_normalized(at - origin, shown)?;
        let rect = apply_gesture(start, kind, delta, &attached.lock);
        attached.live = rect;
        tracing::trace!(?kind, ?rect, "crop drag");
        Some(rect)
    }

    /// Finish the gesture and commit the live rectangle.
    ///
    /// Returns the committed value for persistence, or `None` if no gesture
    /// was active.
    pub fn end(&mut self) -> Option<CropRect> {
        let Drag::Dragging { kind, .. } = self.drag else {
            tracing::trace!("stale crop end event ignored");
            return None;
        };
        self.drag = Drag::Idle;
        let attached = self.image.as_mut()?;
        attached.committed = attached.live;
        tracing::debug!(?kind, rect = ?attached.committed, "crop committed");
        Some(attached.committed)
    }

    /// Abandon the gesture, restoring the last committed rectangle.
    ///
    /// Returns whether a gesture was cancelled.
    pub fn cancel(&mut self) -> bool {
        let Drag::Dragging { kind, .. } = self.drag else {
            return false;
        };
        self.drag = Drag::Idle;
        if let Some(attached) = self.image.as_mut() {
            attached.live = attached.committed;
        }
        tracing::debug!(?kind, "crop gesture cancelled");
        true
    }
}
