use crate::{
    core::{
        constants::{DEFAULT_BOTTOM_RIGHT, DEFAULT_TOP_LEFT},
        distance::haversine_km,
    },
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another LatLng in kilometres
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        haversine_km(*self, *other)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn divide(&self, scalar: f64) -> Point {
        Point::new(self.x / scalar, self.y / scalar)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Geographic area covered by the basemap, oriented north-west to south-east
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    pub top_left: LatLng,
    pub bottom_right: LatLng,
}

impl GeoBoundingBox {
    /// Creates a bounding box, rejecting degenerate or flipped corners
    pub fn new(top_left: LatLng, bottom_right: LatLng) -> Result<Self> {
        let bounds = Self {
            top_left,
            bottom_right,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks that `top_left` is strictly north-west of `bottom_right`
    pub fn validate(&self) -> Result<()> {
        let (tl, br) = (self.top_left, self.bottom_right);
        if !(tl.lat > br.lat) {
            return Err(MapError::InvalidBounds(format!(
                "top-left latitude {} must be north of bottom-right latitude {}",
                tl.lat, br.lat
            )));
        }
        if !(tl.lng < br.lng) {
            return Err(MapError::InvalidBounds(format!(
                "top-left longitude {} must be west of bottom-right longitude {}",
                tl.lng, br.lng
            )));
        }
        Ok(())
    }

    /// Latitude span in degrees (always positive for a valid box)
    pub fn lat_range(&self) -> f64 {
        self.top_left.lat - self.bottom_right.lat
    }

    /// Longitude span in degrees (always positive for a valid box)
    pub fn lng_range(&self) -> f64 {
        self.bottom_right.lng - self.top_left.lng
    }

    /// Gets the center point of the box
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.top_left.lat + self.bottom_right.lat) / 2.0,
            (self.top_left.lng + self.bottom_right.lng) / 2.0,
        )
    }
}

impl Default for GeoBoundingBox {
    fn default() -> Self {
        Self {
            top_left: LatLng::new(DEFAULT_TOP_LEFT.0, DEFAULT_TOP_LEFT.1),
            bottom_right: LatLng::new(DEFAULT_BOTTOM_RIGHT.0, DEFAULT_BOTTOM_RIGHT.1),
        }
    }
}

/// Natural pixel size of the basemap image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageExtent {
    pub width: f64,
    pub height: f64,
}

impl ImageExtent {
    /// Creates an extent; both dimensions must be positive and finite
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(MapError::AssetLoad {
                asset: "basemap".to_string(),
                reason: format!("degenerate image extent {}x{}", width, height),
            });
        }
        Ok(Self { width, height })
    }

    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }
}
