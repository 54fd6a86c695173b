//! Crop geometry: maps the interactive crop state onto a rectangle in
//! source-image pixel space.
//!
//! # Coordinate System
//!
//! - Source rectangles are in pixels, origin at the top-left corner
//! - Pan is normalized: one unit equals one full crop width (x) or height (y)
//! - Positive pan moves the image right/down under the viewport, so the crop
//!   rectangle moves left/up over the source
//! - Rotation does not affect the resolved rectangle; the rasterizer rotates
//!   around the output centre
//!
//! # Example
//!
//! ```ignore
//! let state = CropState::default();
//! let rect = resolve_crop_rect(800, 600, &state, 1.0);
//! assert_eq!(rect, Rectangle::new(100, 0, 600, 600));
//! ```

use serde::{Deserialize, Serialize};

/// Smallest zoom factor: the crop covers the largest aspect-matching region.
pub const MIN_ZOOM: f64 = 1.0;

/// A 2D offset in normalized crop-space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A region of the source image in pixel coordinates.
///
/// `x`/`y` are signed so that hand-built rectangles may extend past the
/// top-left edge; the rasterizer fills anything outside the source with the
/// background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x.saturating_add(self.width as i64)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height as i64)
    }

    /// Check whether the rectangle lies entirely inside a `width x height` image.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= width as i64 && self.bottom() <= height as i64
    }
}

/// Pan, zoom and rotation the user manipulates interactively.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropState {
    pub pan: Point,
    /// Zoom factor, always >= 1.
    pub zoom: f64,
    /// Clockwise rotation in degrees, normalized to (-180, 180].
    pub rotation_degrees: f64,
}

impl Default for CropState {
    fn default() -> Self {
        Self {
            pan: Point::ORIGIN,
            zoom: MIN_ZOOM,
            rotation_degrees: 0.0,
        }
    }
}

impl CropState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalize an angle in degrees to the range (-180, 180].
///
/// Non-finite input collapses to 0 so a bad slider value never poisons the
/// stored state.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

fn sanitize_aspect(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

fn sanitize_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.max(MIN_ZOOM)
    } else {
        MIN_ZOOM
    }
}

/// Largest rectangle of the given aspect ratio (width / height) that fits in
/// the image, as fractional pixel dimensions.
fn base_size(image_width: u32, image_height: u32, aspect: f64) -> (f64, f64) {
    let w = image_width.max(1) as f64;
    let h = image_height.max(1) as f64;
    let aspect = sanitize_aspect(aspect);

    if w / h > aspect {
        (h * aspect, h)
    } else {
        (w, w / aspect)
    }
}

/// Pixel size of the crop rectangle at the given zoom.
///
/// Each side is `base / zoom`, rounded, never below 1 and never larger than
/// the image.
pub fn crop_size(image_width: u32, image_height: u32, zoom: f64, aspect: f64) -> (u32, u32) {
    let (base_w, base_h) = base_size(image_width, image_height, aspect);
    let zoom = sanitize_zoom(zoom);

    let width = ((base_w / zoom).round() as u32).clamp(1, image_width.max(1));
    let height = ((base_h / zoom).round() as u32).clamp(1, image_height.max(1));
    (width, height)
}

/// Largest pan magnitude on each axis that keeps the crop inside the image.
///
/// The valid range is symmetric: `-max.x ..= max.x` and `-max.y ..= max.y`.
pub fn max_pan(image_width: u32, image_height: u32, zoom: f64, aspect: f64) -> Point {
    let (crop_w, crop_h) = crop_size(image_width, image_height, zoom, aspect);
    let slack_x = (image_width.max(1) - crop_w) as f64 / 2.0;
    let slack_y = (image_height.max(1) - crop_h) as f64 / 2.0;
    Point::new(slack_x / crop_w as f64, slack_y / crop_h as f64)
}

/// Clamp a pan offset into the range returned by [`max_pan`].
pub fn clamp_pan(pan: Point, image_width: u32, image_height: u32, zoom: f64, aspect: f64) -> Point {
    let limit = max_pan(image_width, image_height, zoom, aspect);
    let clamp_axis = |value: f64, limit: f64| {
        if value.is_finite() {
            value.clamp(-limit, limit)
        } else {
            0.0
        }
    };
    Point::new(clamp_axis(pan.x, limit.x), clamp_axis(pan.y, limit.y))
}

/// Resolve the crop state into a source-pixel rectangle.
///
/// Guarantees:
/// - width/height are monotonically non-increasing as `zoom` grows
/// - panning translates the rectangle without resizing it
/// - the aspect ratio matches `aspect` within rounding
/// - the rectangle always lies inside the image
///
/// # Arguments
///
/// * `image_width` / `image_height` - Natural dimensions of the source image
/// * `state` - Current pan/zoom/rotation
/// * `aspect` - Target aspect ratio as width / height (1.0 for avatars)
pub fn resolve_crop_rect(
    image_width: u32,
    image_height: u32,
    state: &CropState,
    aspect: f64,
) -> Rectangle {
    let (crop_w, crop_h) = crop_size(image_width, image_height, state.zoom, aspect);
    let img_w = image_width.max(1) as f64;
    let img_h = image_height.max(1) as f64;

    let pan_x = if state.pan.x.is_finite() { state.pan.x } else { 0.0 };
    let pan_y = if state.pan.y.is_finite() { state.pan.y } else { 0.0 };

    let center_x = img_w / 2.0 - pan_x * crop_w as f64;
    let center_y = img_h / 2.0 - pan_y * crop_h as f64;

    let max_left = (image_width.max(1) - crop_w) as f64;
    let max_top = (image_height.max(1) - crop_h) as f64;

    let left = (center_x - crop_w as f64 / 2.0).round().clamp(0.0, max_left);
    let top = (center_y - crop_h as f64 / 2.0).round().clamp(0.0, max_top);

    Rectangle::new(left as i64, top as i64, crop_w, crop_h)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
