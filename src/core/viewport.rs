use crate::core::{
    constants::{MAX_SCALE, MIN_SCALE, WHEEL_ZOOM_SENSITIVITY},
    geo::{ImageExtent, Point},
};
use serde::{Deserialize, Serialize};

/// Pan/zoom state of the view: where the image origin sits on screen and
/// how much the image is scaled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    /// Screen position of the image-space origin
    pub origin: Point,
    /// Uniform zoom factor, always within `[min_scale, max_scale]`
    scale: f64,
    /// The minimum allowed scale
    pub min_scale: f64,
    /// The maximum allowed scale
    pub max_scale: f64,
    /// Scale change per unit of wheel delta
    pub wheel_sensitivity: f64,
    /// Pointer position relative to the origin when the current drag began
    drag_anchor: Option<Point>,
}

impl ViewportTransform {
    /// Creates a viewport with the default scale limits
    pub fn new(origin: Point, scale: f64) -> Self {
        Self::with_limits(origin, scale, MIN_SCALE, MAX_SCALE)
    }

    /// Creates a viewport with custom scale limits
    pub fn with_limits(origin: Point, scale: f64, min_scale: f64, max_scale: f64) -> Self {
        let scale = if scale.is_finite() { scale } else { 1.0 };
        Self {
            origin,
            scale: scale.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
            wheel_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            drag_anchor: None,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Sets the scale, clamping to the configured limits. NaN is ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            return;
        }
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    /// Converts a screen point to image pixels (inverse of the paint transform)
    pub fn screen_to_image(&self, screen: Point) -> Point {
        screen.subtract(&self.origin).divide(self.scale)
    }

    /// Converts image pixels to a screen point (the paint transform)
    pub fn image_to_screen(&self, image: Point) -> Point {
        image.multiply(self.scale).add(&self.origin)
    }

    /// Zooms by a wheel delta, keeping the image point under `cursor` fixed.
    ///
    /// Returns `true` if the scale actually changed.
    pub fn apply_zoom(&mut self, delta_y: f64, cursor: Point) -> bool {
        if !delta_y.is_finite() {
            return false;
        }
        let previous_scale = self.scale;
        self.set_scale(previous_scale - delta_y * self.wheel_sensitivity);

        if (self.scale - previous_scale).abs() < f64::EPSILON {
            return false;
        }

        let cursor_offset = cursor.subtract(&self.origin);
        let zoom_ratio = self.scale / previous_scale;
        self.origin = self
            .origin
            .subtract(&cursor_offset.multiply(zoom_ratio - 1.0));
        true
    }

    /// Starts a drag at the given screen position
    pub fn begin_drag(&mut self, screen: Point) {
        self.drag_anchor = Some(screen.subtract(&self.origin));
    }

    /// Moves the origin so the image follows the pointer since `begin_drag`.
    ///
    /// Does nothing when no drag is active.
    pub fn update_drag(&mut self, screen: Point) {
        if let Some(anchor) = self.drag_anchor {
            self.origin = screen.subtract(&anchor);
        }
    }

    /// Ends the current drag, if any
    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Places the image centred in a surface of the given size at the
    /// current scale
    pub fn center_image(&mut self, surface: Point, extent: ImageExtent) {
        let scaled = extent.size().multiply(self.scale);
        self.origin = surface.subtract(&scaled).divide(2.0);
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), 1.0)
    }
}
