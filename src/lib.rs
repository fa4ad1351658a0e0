//! Fixed-aspect crop rectangle geometry for image editors and renderers.
//!
//! Pure geometry: no pixel operations, no allocation on the pointer-move
//! path, `no_std` compatible.
//!
//! # Modules
//!
//! - [`rect`]: normalized [`CropRect`], [`AspectLock`], and [`clamp`]
//! - [`fit`]: the largest aspect-correct crop, with optional [`Gravity`]
//! - [`gesture`]: pure move/resize rules and handle hit-testing
//! - [`session`]: [`CropSession`] state machine and [`CropConfig`]
//! - [`render`]: [`RenderTransform`] for showing only the crop in any box
//! - [`stored`]: legacy persisted shapes and their normalization
//!
//! # Example
//!
//! ```
//! use kurbo::{Point, Size};
//! use zencrop::{CropConfig, CropSession, ImageSize, RenderTransform};
//!
//! let mut session = CropSession::new(CropConfig::new(1200.0 / 630.0)).unwrap();
//! session.set_image(ImageSize::new(4032, 3024), None).unwrap();
//!
//! // Grab the bottom-right handle of the crop shown at 1008×756 and pull inward.
//! let shown = Size::new(1008.0, 756.0);
//! let lock = session.lock().unwrap();
//! let rect = session.rect().unwrap();
//! let corner = Point::new(rect.right() * shown.width, rect.bottom() * shown.height);
//! session.pointer_down(corner, shown).unwrap();
//! session.drag_to(corner - kurbo::Vec2::new(200.0, 100.0), shown);
//! let saved = session.end().unwrap();
//! assert!(saved.is_valid(&lock));
//!
//! // Any renderer reproduces the crop from the four stored numbers.
//! let t = RenderTransform::new(&saved);
//! assert!(t.scale_x > 1.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

pub mod error;
pub mod fit;
pub mod gesture;
pub mod rect;
pub mod render;
pub mod session;
pub mod stored;
#[cfg(feature = "svg")]
pub mod svg;

pub use error::CropError;
pub use fit::{Gravity, fit, fit_with_gravity};
pub use gesture::{GestureKind, apply_gesture, hit_test, to_normalized};
pub use rect::{AspectLock, CropRect, DEFAULT_MIN_SIZE, ImageSize, Rect, TOLERANCE, clamp};
pub use render::{Placement, RenderTransform};
pub use session::{CropConfig, CropSession, DEFAULT_HANDLE_RADIUS, SessionState};
pub use stored::StoredCrop;
