//! Linear (equirectangular) mapping between geographic coordinates and
//! basemap image pixels.

use crate::{
    core::geo::{GeoBoundingBox, ImageExtent, LatLng, Point},
    MapError, Result,
};

/// Maps lat/lng inside a fixed bounding box onto the basemap image.
///
/// The image extent is only known once the basemap has loaded; until then
/// both directions return [`MapError::NotReady`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeoProjection {
    bounds: GeoBoundingBox,
    extent: Option<ImageExtent>,
}

impl GeoProjection {
    /// Creates a projection that is not ready until an extent is set
    pub fn new(bounds: GeoBoundingBox) -> Result<Self> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            extent: None,
        })
    }

    /// Creates a projection with a known image extent
    pub fn with_extent(bounds: GeoBoundingBox, extent: ImageExtent) -> Result<Self> {
        let mut projection = Self::new(bounds)?;
        projection.set_extent(extent);
        Ok(projection)
    }

    pub fn set_extent(&mut self, extent: ImageExtent) {
        self.extent = Some(extent);
    }

    pub fn extent(&self) -> Option<ImageExtent> {
        self.extent
    }

    pub fn bounds(&self) -> &GeoBoundingBox {
        &self.bounds
    }

    pub fn is_ready(&self) -> bool {
        self.extent.is_some()
    }

    fn ready_extent(&self) -> Result<ImageExtent> {
        self.extent
            .ok_or(MapError::NotReady("basemap extent is not known yet"))
    }

    /// Projects a geographic coordinate to image pixels.
    ///
    /// Image y grows downwards while latitude grows northwards, hence the
    /// flip around the image height.
    pub fn to_pixels(&self, lat_lng: LatLng) -> Result<Point> {
        let extent = self.ready_extent()?;
        let x = (lat_lng.lng - self.bounds.top_left.lng) / self.bounds.lng_range() * extent.width;
        let y = extent.height
            - (lat_lng.lat - self.bounds.bottom_right.lat) / self.bounds.lat_range()
                * extent.height;
        Ok(Point::new(x, y))
    }

    /// Inverse of [`GeoProjection::to_pixels`]
    pub fn to_geo(&self, pixel: Point) -> Result<LatLng> {
        let extent = self.ready_extent()?;
        let lat = self.bounds.top_left.lat - (pixel.y / extent.height) * self.bounds.lat_range();
        let lng = self.bounds.top_left.lng + (pixel.x / extent.width) * self.bounds.lng_range();
        Ok(LatLng::new(lat, lng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> GeoProjection {
        let bounds =
            GeoBoundingBox::new(LatLng::new(59.69, 21.78), LatLng::new(57.45, 28.2)).unwrap();
        GeoProjection::with_extent(bounds, ImageExtent::new(1000.0, 800.0).unwrap()).unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_corners() {
        let projection = projection();

        let tl = projection.to_pixels(LatLng::new(59.69, 21.78)).unwrap();
        assert_close(tl.x, 0.0);
        assert_close(tl.y, 0.0);

        let br = projection.to_pixels(LatLng::new(57.45, 28.2)).unwrap();
        assert_close(br.x, 1000.0);
        assert_close(br.y, 800.0);
    }

    #[test]
    fn test_round_trip() {
        let projection = projection();
        for i in 0..=10 {
            for j in 0..=10 {
                let lat = 57.45 + (59.69 - 57.45) * i as f64 / 10.0;
                let lng = 21.78 + (28.2 - 21.78) * j as f64 / 10.0;
                let pixel = projection.to_pixels(LatLng::new(lat, lng)).unwrap();
                let back = projection.to_geo(pixel).unwrap();
                assert_close(back.lat, lat);
                assert_close(back.lng, lng);
            }
        }
    }

    #[test]
    fn test_center_maps_to_image_center() {
        let projection = projection();
        let center = projection.bounds().center();
        let pixel = projection.to_pixels(center).unwrap();
        assert_close(pixel.x, 500.0);
        assert_close(pixel.y, 400.0);
    }

    #[test]
    fn test_not_ready_without_extent() {
        let projection = GeoProjection::new(GeoBoundingBox::default()).unwrap();
        assert!(!projection.is_ready());
        assert!(matches!(
            projection.to_pixels(LatLng::new(58.0, 25.0)),
            Err(MapError::NotReady(_))
        ));
        assert!(matches!(
            projection.to_geo(Point::new(10.0, 10.0)),
            Err(MapError::NotReady(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_bounds() {
        let bounds = GeoBoundingBox {
            top_left: LatLng::new(57.0, 21.0),
            bottom_right: LatLng::new(59.0, 28.0),
        };
        assert!(GeoProjection::new(bounds).is_err());
    }
}
