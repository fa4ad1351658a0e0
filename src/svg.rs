//! SVG visualization of a crop and how it renders.
//!
//! Generates a vertical pair of annotated panels: the source image with the
//! crop rectangle, dimmed outside area, and corner handles; then the display
//! box showing only the cropped region via [`RenderTransform`].
//!
//! # Example
//!
//! ```
//! use kurbo::Size;
//! use zencrop::{CropRect, ImageSize, svg::render_crop_svg};
//!
//! let svg = render_crop_svg(
//!     ImageSize::new(1600, 1200),
//!     &CropRect::new(0.125, 0.0, 0.75, 1.0),
//!     Size::new(400.0, 400.0),
//! );
//! assert!(svg.starts_with("<svg"));
//! ```

#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use kurbo::Size;

use crate::gesture::GestureKind;
use crate::rect::{CropRect, ImageSize};
use crate::render::{Placement, RenderTransform};

/// Maximum pixel width for any panel in the SVG output.
const MAX_PANEL_W: f64 = 300.0;
/// Maximum pixel height for any panel in the SVG output.
const MAX_PANEL_H: f64 = 200.0;
/// Vertical gap between panels.
const PANEL_GAP: f64 = 50.0;
/// Horizontal margin.
const MARGIN_X: f64 = 50.0;
/// Top margin for first panel.
const MARGIN_TOP: f64 = 30.0;
/// Height of label text area above each panel.
const LABEL_H: f64 = 22.0;
/// Side of a corner handle square, in panel pixels.
const HANDLE: f64 = 8.0;

/// A single panel in the visualization.
struct Step {
    label: String,
    /// The overall bounding box (source image or display box).
    outer: Size,
    content: Content,
    /// Optional annotation text below the panel.
    annotation: String,
}

enum Content {
    /// Crop rectangle over the source, in image fractions.
    Overlay(CropRect),
    /// Whole source placed inside the display box, clipped to it.
    Placed(Placement),
}

/// Render a complete SVG document showing `rect` on a source of size
/// `image`, and the result of rendering it into a `display` box.
pub fn render_crop_svg(image: ImageSize, rect: &CropRect, display: Size) -> String {
    let steps = build_steps(image, rect, display);
    render_steps(&steps)
}

fn build_steps(image: ImageSize, rect: &CropRect, display: Size) -> Vec<Step> {
    let px = rect.to_pixels(image);
    let transform = RenderTransform::new(rect);

    let mut steps = Vec::with_capacity(2);
    steps.push(Step {
        label: format!("Source  {}×{}", image.width, image.height),
        outer: Size::new(image.width as f64, image.height as f64),
        content: Content::Overlay(*rect),
        annotation: format!("crop {}×{} at ({}, {})", px.width, px.height, px.x, px.y),
    });
    steps.push(Step {
        label: format!("Rendered  {}×{}", display.width, display.height),
        outer: display,
        content: Content::Placed(match image.aspect() {
            Some(aspect) => transform.cover(display, aspect),
            None => transform.placement(display),
        }),
        annotation: if transform.is_neutral() {
            String::from("uncropped")
        } else {
            format!(
                "scale {:.3}×{:.3}, origin ({:.3}, {:.3})",
                transform.scale_x, transform.scale_y, transform.origin_x, transform.origin_y
            )
        },
    });
    steps
}

/// Scale a Size to fit within MAX_PANEL_W × MAX_PANEL_H, preserving aspect ratio.
fn scale_to_fit(size: Size) -> (f64, f64, f64) {
    let (w, h) = (size.width, size.height);
    if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
        return (1.0, 1.0, 1.0);
    }
    let scale = (MAX_PANEL_W / w).min(MAX_PANEL_H / h);
    (w * scale, h * scale, scale)
}

fn render_steps(steps: &[Step]) -> String {
    if steps.is_empty() {
        return String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#);
    }

    let n = steps.len() as f64;
    let total_h = 2.0 * MARGIN_TOP + n * (LABEL_H + MAX_PANEL_H) + (n - 1.0) * PANEL_GAP;
    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;

    let mut svg = String::with_capacity(4096);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    // Style: light/dark mode via prefers-color-scheme
    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .outer { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  .image { fill: #6ba3d6; }
  .dim { fill: #000; fill-opacity: 0.45; }
  .crop { fill: none; stroke: #fff; stroke-width: 1.5; }
  .handle { fill: #fff; stroke: #2c6faa; stroke-width: 1; }
  .frame { fill: none; stroke: #2c6faa; stroke-width: 1.5; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .outer { fill: #2d2d2d; stroke: #555; }
    .image { fill: #3a72a4; }
    .frame { stroke: #5a9fd4; }
  }
</style>
"##,
    );

    let mut y = MARGIN_TOP;
    let center_x = total_w / 2.0;

    for (i, step) in steps.iter().enumerate() {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
            center_x,
            y + 14.0,
            escape_xml(&step.label)
        ));
        svg.push('\n');
        y += LABEL_H;

        let (sw, sh, scale) = scale_to_fit(step.outer);
        let panel_x = center_x - sw / 2.0;
        let panel_y = y;

        match &step.content {
            Content::Overlay(rect) => {
                push_rect(&mut svg, panel_x, panel_y, sw, sh, "image");
                let cx = panel_x + rect.x * sw;
                let cy = panel_y + rect.y * sh;
                let cw = rect.width * sw;
                let ch = rect.height * sh;

                // Outside area: panel minus crop, via even-odd fill.
                svg.push_str(&format!(
                    r#"<path d="M{:.1} {:.1}h{:.1}v{:.1}h{:.1}zM{:.1} {:.1}h{:.1}v{:.1}h{:.1}z" class="dim" fill-rule="evenodd"/>"#,
                    panel_x, panel_y, sw, sh, -sw, cx, cy, cw, ch, -cw
                ));
                svg.push('\n');
                push_rect(&mut svg, cx, cy, cw, ch, "crop");

                for kind in GestureKind::CORNERS {
                    if let Some(p) = kind.handle_position(rect) {
                        let hx = panel_x + p.x * sw - HANDLE / 2.0;
                        let hy = panel_y + p.y * sh - HANDLE / 2.0;
                        push_rect(&mut svg, hx, hy, HANDLE, HANDLE, "handle");
                    }
                }
            }
            Content::Placed(placement) => {
                svg.push_str(&format!(
                    r#"<clipPath id="clip{}"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/></clipPath>"#,
                    i, panel_x, panel_y, sw, sh
                ));
                svg.push('\n');
                push_rect(&mut svg, panel_x, panel_y, sw, sh, "outer");
                svg.push_str(&format!(r#"<g clip-path="url(#clip{i})">"#));
                push_rect(
                    &mut svg,
                    panel_x + placement.offset.x * scale,
                    panel_y + placement.offset.y * scale,
                    placement.drawn.width * scale,
                    placement.drawn.height * scale,
                    "image",
                );
                svg.push_str("</g>\n");
                push_rect(&mut svg, panel_x, panel_y, sw, sh, "frame");
            }
        }

        if !step.annotation.is_empty() {
            svg.push_str(&format!(
                r#"<text x="{}" y="{:.1}" class="annotation" text-anchor="middle">{}</text>"#,
                center_x,
                panel_y + sh + 14.0,
                escape_xml(&step.annotation)
            ));
            svg.push('\n');
        }

        y += MAX_PANEL_H + PANEL_GAP;
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_rect(svg: &mut String, x: f64, y: f64, w: f64, h: f64, class: &str) {
    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="{}"/>"#,
        x, y, w, h, class
    ));
    svg.push('\n');
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
