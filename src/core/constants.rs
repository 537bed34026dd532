//! Core constants for the viewer: projection extent, zoom limits and the
//! marker/overlay styling defaults. Keeping them in a single place makes it
//! easier to tweak engine-wide magic numbers.

/// Mean Earth radius used by the haversine distance, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default basemap coverage, north-west corner (lat, lng).
pub const DEFAULT_TOP_LEFT: (f64, f64) = (59.69, 21.78);

/// Default basemap coverage, south-east corner (lat, lng).
pub const DEFAULT_BOTTOM_RIGHT: (f64, f64) = (57.45, 28.2);

/// Lower bound of the viewport scale.
pub const MIN_SCALE: f64 = 0.5;

/// Upper bound of the viewport scale.
pub const MAX_SCALE: f64 = 5.0;

/// Scale change per unit of wheel `deltaY`.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.001;

/// Marker icons are drawn as squares of this size (screen pixels).
pub const MARKER_ICON_SIZE: f64 = 16.0;

/// Labels are only drawn when the viewport scale exceeds this value.
pub const LABEL_MIN_SCALE: f64 = 1.5;

/// Gap between a marker icon and its label.
pub const LABEL_GAP: f64 = 2.0;

/// Marker label font size.
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Distance label sits this far above the midpoint of the nearest line.
pub const DISTANCE_LABEL_OFFSET: f64 = 5.0;

/// Width of the line joining the placed marker and its nearest neighbour.
pub const NEAREST_LINE_WIDTH: f32 = 2.0;

/// Header text font size.
pub const HEADER_FONT_SIZE: f32 = 20.0;

/// Header text anchor in screen pixels.
pub const HEADER_POSITION: (f64, f64) = (10.0, 30.0);

/// Header shadow offset in screen pixels.
pub const HEADER_SHADOW_OFFSET: (f64, f64) = (3.0, 3.0);
