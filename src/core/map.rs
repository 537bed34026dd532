use crate::{
    assets::{
        barrier::LoadBarrier,
        loader::{AssetEvent, AssetId, LoadedImage},
    },
    core::{
        config::{StyleConfig, ViewerConfig},
        geo::{LatLng, Point},
        projection::GeoProjection,
        viewport::ViewportTransform,
    },
    data::dataset::{DatasetLoad, MarkerRecord},
    input::{
        events::{InputEvent, MapEvent},
        handler::{Action, EventManager, InteractionController},
    },
    layers::{
        marker::{Marker, MarkerId},
        store::{MarkerStore, NearestResult},
    },
    prelude::HashMap,
    MapError, Result,
};

/// Loading state of one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetStatus {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// One viewer session: geometry, markers, interaction and load state.
///
/// Everything the renderer reads lives here. The session is mutated only
/// through [`Map::handle_input`] and [`Map::on_asset_event`], both of which
/// run on the thread that owns it.
pub struct Map {
    config: ViewerConfig,
    projection: GeoProjection,
    viewport: ViewportTransform,
    markers: MarkerStore,
    nearest: Option<NearestResult>,
    surface_size: Point,
    assets: HashMap<AssetId, AssetStatus>,
    barrier: LoadBarrier,
    rejected_records: usize,
    controller: InteractionController,
    event_manager: EventManager,
    needs_redraw: bool,
}

impl Map {
    pub fn new(config: ViewerConfig, surface_size: Point) -> Result<Self> {
        config.validate()?;

        let zoom = &config.zoom;
        let mut viewport = ViewportTransform::with_limits(
            Point::default(),
            zoom.initial_scale,
            zoom.min_scale,
            zoom.max_scale,
        );
        viewport.wheel_sensitivity = zoom.wheel_sensitivity;

        Ok(Self {
            projection: GeoProjection::new(config.bounds)?,
            viewport,
            markers: MarkerStore::new(),
            nearest: None,
            surface_size,
            assets: AssetId::ALL
                .iter()
                .map(|&asset| (asset, AssetStatus::Pending))
                .collect(),
            barrier: LoadBarrier::new(),
            rejected_records: 0,
            controller: InteractionController::new(config.interaction.clone()),
            event_manager: EventManager::new(),
            needs_redraw: true,
            config,
        })
    }

    /// Feeds one input event through the interaction state machine and
    /// applies the resulting action.
    pub fn handle_input(&mut self, input: InputEvent) -> Result<()> {
        match self.controller.handle_event(input) {
            Some(action) => self.execute(action),
            None => Ok(()),
        }
    }

    fn execute(&mut self, action: Action) -> Result<()> {
        match action {
            Action::BeginDrag { position } => {
                self.viewport.begin_drag(position);
            }
            Action::UpdateDrag { position } => {
                self.viewport.update_drag(position);
                self.emit_view_changed();
            }
            Action::EndDrag => {
                self.viewport.end_drag();
            }
            Action::PlaceMarker { position } => match self.place_marker_at(position) {
                Ok(_) => {}
                Err(MapError::NotReady(reason)) => {
                    log::debug!("click ignored: {}", reason);
                    return Ok(());
                }
                Err(e) => return Err(e),
            },
            Action::Zoom { delta_y, focus } => {
                if self.viewport.apply_zoom(delta_y, focus) {
                    self.emit_view_changed();
                }
            }
            Action::Resize { size } => {
                self.surface_size = size;
                self.event_manager.emit(MapEvent::Resized { size });
            }
        }

        self.needs_redraw = true;
        Ok(())
    }

    fn emit_view_changed(&mut self) {
        self.event_manager.emit(MapEvent::ViewChanged {
            origin: self.viewport.origin,
            scale: self.viewport.scale(),
        });
    }

    /// Places the highlighted marker under a screen point and recomputes the
    /// nearest base marker.
    ///
    /// Fails with [`MapError::NotReady`] while the basemap extent is unknown,
    /// leaving the session untouched.
    pub fn place_marker_at(&mut self, screen: Point) -> Result<MarkerId> {
        let image = self.viewport.screen_to_image(screen);
        let lat_lng = self.projection.to_geo(image)?;
        self.place_marker(lat_lng)
    }

    /// Places the highlighted marker at a geographic position
    pub fn place_marker(&mut self, lat_lng: LatLng) -> Result<MarkerId> {
        let id = self.markers.place_highlighted(lat_lng, "", &self.projection)?;
        log::debug!("placed {} at ({:.5}, {:.5})", id, lat_lng.lat, lat_lng.lng);

        self.event_manager.emit(MapEvent::MarkerPlaced {
            marker: id,
            lat_lng,
        });
        self.refresh_nearest();
        self.needs_redraw = true;
        Ok(id)
    }

    fn refresh_nearest(&mut self) {
        let Some(from) = self.markers.highlighted().map(|m| m.lat_lng()) else {
            return;
        };
        self.nearest = self.markers.nearest_non_highlighted(from);

        if let Some(nearest) = self.nearest {
            log::debug!(
                "nearest to highlighted is {} at {:.2} km",
                nearest.marker,
                nearest.distance_km
            );
        }
        self.event_manager.emit(MapEvent::NearestChanged {
            marker: self.nearest.map(|n| n.marker),
            distance_km: self.nearest.map(|n| n.distance_km),
        });
    }

    /// Applies the completion of one asset load. Completions may arrive in
    /// any order.
    pub fn on_asset_event(&mut self, event: AssetEvent) {
        match event {
            AssetEvent::ImageLoaded { asset, image } => {
                if asset == AssetId::Basemap {
                    if let Err(e) = self.set_basemap(&image) {
                        self.asset_failed(asset, e.to_string());
                        return;
                    }
                }
                self.asset_loaded(asset);
            }
            AssetEvent::DatasetLoaded(load) => {
                self.set_dataset(load);
                self.asset_loaded(AssetId::Dataset);
            }
            AssetEvent::Failed { asset, reason } => {
                if asset == AssetId::Dataset {
                    self.barrier.dataset_failed();
                }
                self.asset_failed(asset, reason);
            }
        }
        self.release_base_markers();
    }

    fn set_basemap(&mut self, image: &LoadedImage) -> Result<()> {
        let extent = image.extent()?;
        self.projection.set_extent(extent);
        self.viewport.center_image(self.surface_size, extent);
        self.markers.reproject(&self.projection)?;
        self.barrier.extent_ready(extent);
        log::info!("basemap extent {}x{}", extent.width, extent.height);
        Ok(())
    }

    fn set_dataset(&mut self, load: DatasetLoad) {
        self.rejected_records = load.rejected.len();
        self.barrier.dataset_ready(load.records);
    }

    fn asset_loaded(&mut self, asset: AssetId) {
        self.assets.insert(asset, AssetStatus::Loaded);
        self.event_manager.emit(MapEvent::AssetLoaded { asset });
        self.needs_redraw = true;
    }

    fn asset_failed(&mut self, asset: AssetId, reason: String) {
        log::error!("{} unavailable: {}", asset, reason);
        self.assets.insert(asset, AssetStatus::Failed);
        self.event_manager.emit(MapEvent::AssetFailed { asset, reason });
        self.needs_redraw = true;
    }

    fn release_base_markers(&mut self) {
        let Some(records) = self.barrier.release() else {
            return;
        };
        self.load_base_markers(&records);
    }

    fn load_base_markers(&mut self, records: &[MarkerRecord]) {
        match self.markers.load_base(records, &self.projection) {
            Ok(count) => {
                self.event_manager.emit(MapEvent::BaseMarkersLoaded {
                    count,
                    rejected: self.rejected_records,
                });
                // A marker placed before the dataset arrived had no candidates
                if self.markers.highlighted().is_some() {
                    self.refresh_nearest();
                }
                self.needs_redraw = true;
            }
            Err(e) => log::error!("failed to project base markers: {}", e),
        }
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// True when something changed since the last [`Map::mark_drawn`]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn mark_drawn(&mut self) {
        self.needs_redraw = false;
    }

    pub fn asset_status(&self, asset: AssetId) -> AssetStatus {
        self.assets.get(&asset).copied().unwrap_or_default()
    }

    pub fn is_loaded(&self, asset: AssetId) -> bool {
        self.asset_status(asset) == AssetStatus::Loaded
    }

    /// True once no asset load is outstanding
    pub fn assets_settled(&self) -> bool {
        self.assets.values().all(|s| *s != AssetStatus::Pending)
    }

    /// The highlighted marker's nearest base marker and its distance
    pub fn nearest_marker(&self) -> Option<(&Marker, f64)> {
        let nearest = self.nearest?;
        let marker = self.markers.get(nearest.marker)?;
        Some((marker, nearest.distance_km))
    }

    pub fn nearest(&self) -> Option<NearestResult> {
        self.nearest
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn projection(&self) -> &GeoProjection {
        &self.projection
    }

    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    pub fn surface_size(&self) -> Point {
        self.surface_size
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn style(&self) -> &StyleConfig {
        &self.config.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::ImageExtent;
    use std::sync::Arc;

    fn basemap(width: u32, height: u32) -> AssetEvent {
        AssetEvent::ImageLoaded {
            asset: AssetId::Basemap,
            image: Arc::new(LoadedImage {
                width,
                height,
                rgba: vec![0; (width * height * 4) as usize],
            }),
        }
    }

    fn dataset(records: Vec<MarkerRecord>) -> AssetEvent {
        AssetEvent::DatasetLoaded(DatasetLoad {
            records,
            rejected: Vec::new(),
        })
    }

    fn tallinn_tartu() -> Vec<MarkerRecord> {
        vec![
            MarkerRecord::new(LatLng::new(59.437, 24.7536), "Tallinn"),
            MarkerRecord::new(LatLng::new(58.3776, 26.729), "Tartu"),
        ]
    }

    fn map() -> Map {
        Map::new(ViewerConfig::default(), Point::new(1000.0, 800.0)).unwrap()
    }

    #[test]
    fn test_new_map_is_pending() {
        let map = map();
        assert!(map.needs_redraw());
        assert!(!map.projection().is_ready());
        assert!(!map.assets_settled());
        assert_eq!(map.asset_status(AssetId::Basemap), AssetStatus::Pending);
        assert!(map.markers().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ViewerConfig::default();
        config.zoom.min_scale = 3.0;
        config.zoom.max_scale = 1.0;
        assert!(matches!(
            Map::new(config, Point::new(10.0, 10.0)),
            Err(MapError::Config(_))
        ));
    }

    #[test]
    fn test_basemap_sets_extent_and_centers() {
        let mut map = map();
        map.on_asset_event(basemap(500, 400));

        assert_eq!(
            map.projection().extent(),
            Some(ImageExtent::new(500.0, 400.0).unwrap())
        );
        assert_eq!(map.viewport().origin, Point::new(250.0, 200.0));
        assert!(map.is_loaded(AssetId::Basemap));
    }

    #[test]
    fn test_base_markers_wait_for_both_loads() {
        let mut map = map();
        map.on_asset_event(dataset(tallinn_tartu()));
        assert!(map.markers().is_empty());

        map.on_asset_event(basemap(1000, 800));
        assert_eq!(map.markers().base_count(), 2);

        let events = map.process_events();
        assert!(events.contains(&MapEvent::BaseMarkersLoaded {
            count: 2,
            rejected: 0
        }));
    }

    #[test]
    fn test_click_before_basemap_is_ignored() {
        let mut map = map();
        map.handle_input(InputEvent::Click {
            position: Point::new(10.0, 10.0),
        })
        .unwrap();
        assert!(map.markers().highlighted().is_none());
        assert!(map.nearest().is_none());
    }

    #[test]
    fn test_click_places_marker_and_finds_nearest() {
        let mut map = map();
        map.on_asset_event(basemap(1000, 800));
        map.on_asset_event(dataset(tallinn_tartu()));
        map.mark_drawn();

        // Tartu's pixel under the centred viewport at scale 1
        let tartu = map
            .markers()
            .iter()
            .find(|m| m.label() == "Tartu")
            .unwrap()
            .pixel();
        let screen = map.viewport().image_to_screen(tartu);
        map.handle_input(InputEvent::Click { position: screen }).unwrap();

        let highlighted = map.markers().highlighted().unwrap();
        assert!((highlighted.lat_lng().lat - 58.3776).abs() < 1e-9);
        let (nearest, distance) = map.nearest_marker().unwrap();
        assert_eq!(nearest.label(), "Tartu");
        assert!(distance < 1e-6);
        assert!(map.needs_redraw());
    }

    #[test]
    fn test_marker_placed_before_dataset_gets_nearest_later() {
        let mut map = map();
        map.on_asset_event(basemap(1000, 800));
        map.place_marker(LatLng::new(59.0, 25.0)).unwrap();
        assert!(map.nearest().is_none());

        map.on_asset_event(dataset(tallinn_tartu()));
        assert_eq!(map.nearest_marker().unwrap().0.label(), "Tallinn");
    }

    #[test]
    fn test_failed_dataset_still_settles() {
        let mut map = map();
        map.on_asset_event(AssetEvent::Failed {
            asset: AssetId::Dataset,
            reason: "boom".to_string(),
        });
        map.on_asset_event(basemap(100, 100));
        for asset in [AssetId::MarkerIcon, AssetId::HighlightedIcon] {
            map.on_asset_event(AssetEvent::Failed {
                asset,
                reason: "missing".to_string(),
            });
        }

        assert!(map.assets_settled());
        assert_eq!(map.asset_status(AssetId::Dataset), AssetStatus::Failed);
        assert_eq!(map.markers().base_count(), 0);
        let events = map.process_events();
        assert!(events.contains(&MapEvent::BaseMarkersLoaded {
            count: 0,
            rejected: 0
        }));
    }

    #[test]
    fn test_zero_sized_basemap_is_a_failure() {
        let mut map = map();
        map.on_asset_event(basemap(0, 10));
        assert_eq!(map.asset_status(AssetId::Basemap), AssetStatus::Failed);
        assert!(!map.projection().is_ready());
    }

    #[test]
    fn test_drag_and_zoom_emit_view_changes() {
        let mut map = map();
        map.handle_input(InputEvent::PointerDown {
            position: Point::new(10.0, 10.0),
        })
        .unwrap();
        map.handle_input(InputEvent::PointerMove {
            position: Point::new(30.0, 50.0),
        })
        .unwrap();
        map.handle_input(InputEvent::PointerUp).unwrap();
        assert_eq!(map.viewport().origin, Point::new(20.0, 40.0));

        map.handle_input(InputEvent::Wheel {
            delta_y: -100.0,
            position: Point::new(0.0, 0.0),
        })
        .unwrap();
        assert!((map.viewport().scale() - 1.1).abs() < 1e-9);

        let views = map
            .process_events()
            .into_iter()
            .filter(|e| e.event_type() == "viewchanged")
            .count();
        assert_eq!(views, 2);
    }

    #[test]
    fn test_nan_wheel_leaves_view_intact() {
        let mut map = map();
        map.on_asset_event(basemap(500, 400));
        let origin = map.viewport().origin;
        map.process_events();

        map.handle_input(InputEvent::Wheel {
            delta_y: f64::NAN,
            position: Point::new(100.0, 100.0),
        })
        .unwrap();
        assert_eq!(map.viewport().scale(), 1.0);
        assert_eq!(map.viewport().origin, origin);
        assert!(map.process_events().is_empty());

        // Clicks still resolve to a finite coordinate afterwards
        let id = map.place_marker_at(Point::new(300.0, 250.0)).unwrap();
        let placed = map.markers().get(id).unwrap().lat_lng();
        assert!(placed.lat.is_finite() && placed.lng.is_finite());
    }

    #[test]
    fn test_resize_updates_surface() {
        let mut map = map();
        map.mark_drawn();
        map.handle_input(InputEvent::Resize {
            size: Point::new(640.0, 480.0),
        })
        .unwrap();
        assert_eq!(map.surface_size(), Point::new(640.0, 480.0));
        assert!(map.needs_redraw());
    }
}
