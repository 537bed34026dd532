use crate::{
    core::{
        geo::{LatLng, Point},
        projection::GeoProjection,
    },
    Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a marker inside a [`MarkerStore`](crate::layers::store::MarkerStore).
///
/// Two markers at the same coordinates are still different markers; the
/// store compares ids, never positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub(crate) u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: MarkerId,
    lat_lng: LatLng,
    pixel: Point,
    label: String,
    highlighted: bool,
}

impl Marker {
    /// Builds a marker and caches its image-space position
    pub(crate) fn project(
        id: MarkerId,
        lat_lng: LatLng,
        label: String,
        highlighted: bool,
        projection: &GeoProjection,
    ) -> Result<Self> {
        let pixel = projection.to_pixels(lat_lng)?;
        Ok(Self {
            id,
            lat_lng,
            pixel,
            label,
            highlighted,
        })
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    /// Geographic position, the source of truth for the marker
    pub fn lat_lng(&self) -> LatLng {
        self.lat_lng
    }

    /// Cached position in basemap image pixels
    pub fn pixel(&self) -> Point {
        self.pixel
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn reproject(&mut self, projection: &GeoProjection) -> Result<()> {
        self.pixel = projection.to_pixels(self.lat_lng)?;
        Ok(())
    }
}
