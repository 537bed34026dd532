use crate::{
    assets::loader::AssetId,
    core::geo::{LatLng, Point},
    layers::marker::MarkerId,
};
use serde::{Deserialize, Serialize};

/// Input events raised by the hosting event source, in screen coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button pressed
    PointerDown { position: Point },
    /// Pointer moved
    PointerMove { position: Point },
    /// Primary button released
    PointerUp,
    /// Click (press and release without a drag)
    Click { position: Point },
    /// Scroll wheel; positive `delta_y` scrolls down and zooms out
    Wheel { delta_y: f64, position: Point },
    /// Rendering surface resized
    Resize { size: Point },
}

/// Events emitted by the map after its state changed
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Pan or zoom changed the viewport
    ViewChanged { origin: Point, scale: f64 },
    /// A highlighted marker was placed
    MarkerPlaced { marker: MarkerId, lat_lng: LatLng },
    /// The nearest marker was recomputed (`None` when there is no candidate)
    NearestChanged {
        marker: Option<MarkerId>,
        distance_km: Option<f64>,
    },
    /// Rendering surface size changed
    Resized { size: Point },
    /// An asset finished loading
    AssetLoaded { asset: AssetId },
    /// An asset failed to load and will not be drawn
    AssetFailed { asset: AssetId, reason: String },
    /// Base markers were projected and stored
    BaseMarkersLoaded { count: usize, rejected: usize },
}

impl MapEvent {
    /// Name used to register listeners for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::MarkerPlaced { .. } => "markerplaced",
            MapEvent::NearestChanged { .. } => "nearestchanged",
            MapEvent::Resized { .. } => "resize",
            MapEvent::AssetLoaded { .. } => "assetloaded",
            MapEvent::AssetFailed { .. } => "assetfailed",
            MapEvent::BaseMarkersLoaded { .. } => "basemarkersloaded",
        }
    }
}
