use anyhow::Context as _;
use nearmap::{
    assets::{loader::AssetEvent, source::DefaultSource},
    core::map::AssetStatus,
    ui::widget::{MapWidget, TextureCache},
    AssetId, AssetLoader, Map, MapEvent, Point, Renderer, ViewerConfig,
};
use std::{sync::Arc, time::Duration};

const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];

/// Standalone map viewer application
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nearmap::init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::from_file(&path)
            .with_context(|| format!("failed to load viewer config from {}", path))?,
        None => ViewerConfig::default(),
    };

    let map = Map::new(
        config.clone(),
        Point::new(WINDOW_SIZE[0] as f64, WINDOW_SIZE[1] as f64),
    )?;
    let loader = AssetLoader::new(Arc::new(DefaultSource::new()?), config.assets.clone());
    let assets = loader.spawn_all(&tokio::runtime::Handle::current());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_title("nearmap"),
        ..Default::default()
    };

    eframe::run_native(
        "nearmap-app",
        options,
        Box::new(move |_cc| Box::new(ViewerApp::new(map, assets))),
    )
    .map_err(|e| anyhow::anyhow!("viewer window failed: {}", e))?;

    Ok(())
}

/// The main application struct
struct ViewerApp {
    renderer: Renderer,
    textures: TextureCache,
    assets: crossbeam_channel::Receiver<AssetEvent>,
    map: Map,
    show_status_panel: bool,
    last_event: Option<String>,
}

impl ViewerApp {
    fn new(map: Map, assets: crossbeam_channel::Receiver<AssetEvent>) -> Self {
        Self {
            renderer: Renderer::for_map(&map),
            textures: TextureCache::new(),
            assets,
            map,
            show_status_panel: true,
            last_event: None,
        }
    }

    /// Applies every load that completed since the last frame
    fn drain_assets(&mut self, ctx: &egui::Context) {
        for event in self.assets.try_iter() {
            if let AssetEvent::ImageLoaded { asset, image } = &event {
                self.textures.upload(ctx, *asset, image);
            }
            self.map.on_asset_event(event);
        }
    }

    fn status_panel(&self, ui: &mut egui::Ui) {
        ui.heading("Status");
        ui.separator();

        let viewport = self.map.viewport();
        ui.label(format!(
            "Origin: {:.0}, {:.0} | Scale: {:.2}",
            viewport.origin.x,
            viewport.origin.y,
            viewport.scale()
        ));
        ui.label(format!("Markers: {}", self.map.markers().base_count()));

        ui.separator();
        ui.heading("Assets");
        for asset in AssetId::ALL {
            let status = match self.map.asset_status(asset) {
                AssetStatus::Pending => "loading",
                AssetStatus::Loaded => "ok",
                AssetStatus::Failed => "failed",
            };
            ui.label(format!("{}: {}", asset, status));
        }

        ui.separator();
        match self.map.nearest_marker() {
            Some((marker, distance_km)) => {
                let name = if marker.label().is_empty() {
                    "(unnamed)"
                } else {
                    marker.label()
                };
                ui.label(format!("Nearest: {} ({:.2} km)", name, distance_km));
            }
            None => {
                ui.label("Click the map to place a marker");
            }
        }
        if let Some(last) = &self.last_event {
            ui.small(last);
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_assets(ctx);

        for event in self.map.process_events() {
            log::debug!("map event: {:?}", event);
            if matches!(
                event,
                MapEvent::NearestChanged { .. } | MapEvent::BaseMarkersLoaded { .. }
            ) {
                self.last_event = Some(event.event_type().to_string());
            }
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_status_panel, "Status Panel");
                });
            });
        });

        if self.show_status_panel {
            egui::SidePanel::left("status_panel")
                .resizable(true)
                .show(ctx, |ui| self.status_panel(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.add(MapWidget::new(&mut self.map, &self.renderer, &self.textures));
            });

        // Completions arrive from background tasks; keep polling until all settle
        if !self.map.assets_settled() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
