use crate::{
    core::{geo::LatLng, projection::GeoProjection},
    data::dataset::MarkerRecord,
    layers::marker::{Marker, MarkerId},
    Result,
};

/// The non-highlighted marker closest to a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestResult {
    pub marker: MarkerId,
    pub distance_km: f64,
}

/// Owns every marker of the session, in insertion order.
///
/// Base markers come from the dataset and are never removed. On top of them
/// at most one highlighted (user-placed) marker exists at any time.
#[derive(Debug, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    highlighted: Option<MarkerId>,
    next_id: u64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Projects dataset records and stores them as base markers.
    ///
    /// Fails without touching the store if the projection is not ready.
    pub fn load_base(&mut self, records: &[MarkerRecord], projection: &GeoProjection) -> Result<usize> {
        let mut loaded = Vec::with_capacity(records.len());
        for record in records {
            let id = self.allocate_id();
            loaded.push(Marker::project(
                id,
                record.lat_lng(),
                record.name.clone(),
                false,
                projection,
            )?);
        }

        let count = loaded.len();
        self.markers.extend(loaded);
        log::info!("loaded {} base markers", count);
        Ok(count)
    }

    /// Swaps the highlighted marker for `marker` in one step and returns
    /// the one it replaced.
    pub fn replace_highlighted(&mut self, marker: Marker) -> Option<Marker> {
        let previous = self.highlighted.and_then(|id| {
            let index = self.markers.iter().position(|m| m.id() == id)?;
            Some(self.markers.remove(index))
        });

        self.highlighted = Some(marker.id());
        self.markers.push(marker);
        previous
    }

    /// Places a new highlighted marker at `lat_lng`, replacing any previous
    /// one, and returns its id. The store is unchanged if the point cannot
    /// be projected.
    pub fn place_highlighted(
        &mut self,
        lat_lng: LatLng,
        label: impl Into<String>,
        projection: &GeoProjection,
    ) -> Result<MarkerId> {
        let id = MarkerId(self.next_id);
        let marker = Marker::project(id, lat_lng, label.into(), true, projection)?;
        self.next_id += 1;

        if let Some(previous) = self.replace_highlighted(marker) {
            log::debug!("replaced highlighted {}", previous.id());
        }

        Ok(id)
    }

    /// Linear scan for the closest non-highlighted marker.
    ///
    /// On exact ties the marker that comes first in store order wins.
    pub fn nearest_non_highlighted(&self, from: LatLng) -> Option<NearestResult> {
        let mut nearest: Option<NearestResult> = None;
        for marker in self.markers.iter().filter(|m| !m.is_highlighted()) {
            let distance_km = from.distance_to(&marker.lat_lng());
            if nearest.map_or(true, |best| distance_km < best.distance_km) {
                nearest = Some(NearestResult {
                    marker: marker.id(),
                    distance_km,
                });
            }
        }
        nearest
    }

    /// Recomputes every cached pixel position, e.g. after the extent changed
    pub fn reproject(&mut self, projection: &GeoProjection) -> Result<()> {
        for marker in &mut self.markers {
            marker.reproject(projection)?;
        }
        Ok(())
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id() == id)
    }

    pub fn highlighted(&self) -> Option<&Marker> {
        self.highlighted.and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Number of non-highlighted markers
    pub fn base_count(&self) -> usize {
        self.markers.iter().filter(|m| !m.is_highlighted()).count()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
