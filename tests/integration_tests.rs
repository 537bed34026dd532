use nearmap::{
    assets::loader::LoadedImage,
    data::dataset::{DatasetLoad, MarkerRecord},
    haversine_km, AssetEvent, AssetId, InputEvent, LatLng, Map, MapEvent, Point, RenderContext, Renderer,
    ViewerConfig,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// End-to-end viewer scenarios driven the way a host drives a session:
/// asset completions first, then raw input, then a paint
#[cfg(test)]
mod integration_tests {
    use super::*;

    const SURFACE: Point = Point { x: 1000.0, y: 800.0 };

    fn image(asset: AssetId, width: u32, height: u32) -> AssetEvent {
        AssetEvent::ImageLoaded {
            asset,
            image: Arc::new(LoadedImage {
                width,
                height,
                rgba: vec![0; (width * height * 4) as usize],
            }),
        }
    }

    fn estonia() -> Vec<MarkerRecord> {
        vec![
            MarkerRecord::new(LatLng::new(59.4370, 24.7536), "Tallinn"),
            MarkerRecord::new(LatLng::new(58.3776, 26.7290), "Tartu"),
            MarkerRecord::new(LatLng::new(58.3859, 24.4971), "Pärnu"),
            MarkerRecord::new(LatLng::new(59.3772, 28.1903), "Narva"),
        ]
    }

    fn loaded_session() -> Map {
        let mut map = Map::new(ViewerConfig::default(), SURFACE).unwrap();
        map.on_asset_event(image(AssetId::Basemap, 1000, 800));
        map.on_asset_event(image(AssetId::MarkerIcon, 16, 16));
        map.on_asset_event(image(AssetId::HighlightedIcon, 16, 16));
        map.on_asset_event(AssetEvent::DatasetLoaded(DatasetLoad {
            records: estonia(),
            rejected: Vec::new(),
        }));
        map
    }

    fn assert_close(a: f64, b: f64, tolerance: f64) {
        assert!((a - b).abs() < tolerance, "{a} != {b}");
    }

    #[test]
    fn test_click_places_marker_at_projected_point() {
        let mut map = loaded_session();

        // Move the view away from the identity transform first
        map.handle_input(InputEvent::Wheel {
            delta_y: -500.0,
            position: Point::new(300.0, 200.0),
        })
        .unwrap();
        map.handle_input(InputEvent::PointerDown {
            position: Point::new(100.0, 100.0),
        })
        .unwrap();
        map.handle_input(InputEvent::PointerMove {
            position: Point::new(60.0, 130.0),
        })
        .unwrap();
        map.handle_input(InputEvent::PointerUp).unwrap();

        let click = Point::new(420.0, 310.0);
        let expected = map
            .projection()
            .to_geo(map.viewport().screen_to_image(click))
            .unwrap();
        map.handle_input(InputEvent::Click { position: click }).unwrap();

        let highlighted = map.markers().highlighted().unwrap();
        assert_close(highlighted.lat_lng().lat, expected.lat, 1e-9);
        assert_close(highlighted.lat_lng().lng, expected.lng, 1e-9);

        // Icon lands under the cursor
        let screen = map.viewport().image_to_screen(highlighted.pixel());
        assert_close(screen.x, click.x, 1e-6);
        assert_close(screen.y, click.y, 1e-6);
    }

    #[test]
    fn test_nearest_is_minimum_haversine() {
        let mut map = loaded_session();
        let spot = LatLng::new(58.9, 25.9);
        map.place_marker(spot).unwrap();

        let (nearest, distance) = map.nearest_marker().unwrap();
        for record in estonia() {
            assert!(distance <= haversine_km(spot, record.lat_lng()) + 1e-12);
        }
        assert_close(distance, haversine_km(spot, nearest.lat_lng()), 1e-12);
        assert!(!nearest.is_highlighted());
    }

    #[test]
    fn test_repeated_clicks_keep_single_highlight() {
        let mut map = loaded_session();
        for x in [100.0, 300.0, 500.0, 700.0] {
            map.handle_input(InputEvent::Click {
                position: Point::new(x, 400.0),
            })
            .unwrap();
        }

        let highlighted = map.markers().iter().filter(|m| m.is_highlighted()).count();
        assert_eq!(highlighted, 1);
        assert_eq!(map.markers().base_count(), estonia().len());
        assert_eq!(map.markers().len(), estonia().len() + 1);
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let mut map = loaded_session();
        let cursor = Point::new(640.0, 220.0);

        for delta in [-300.0, -1200.0, 700.0, 5000.0] {
            let before = map.viewport().screen_to_image(cursor);
            map.handle_input(InputEvent::Wheel {
                delta_y: delta,
                position: cursor,
            })
            .unwrap();
            let after = map.viewport().screen_to_image(cursor);
            assert_close(before.x, after.x, 1e-6);
            assert_close(before.y, after.y, 1e-6);

            let scale = map.viewport().scale();
            assert!((0.5..=5.0).contains(&scale));
        }
    }

    #[test]
    fn test_click_during_drag_is_ignored() {
        let mut map = loaded_session();
        map.handle_input(InputEvent::PointerDown {
            position: Point::new(10.0, 10.0),
        })
        .unwrap();
        map.handle_input(InputEvent::Click {
            position: Point::new(10.0, 10.0),
        })
        .unwrap();
        assert!(map.markers().highlighted().is_none());
    }

    #[test]
    fn test_listeners_see_placement() {
        let mut map = loaded_session();
        let placed = Arc::new(AtomicUsize::new(0));
        let counter = placed.clone();
        map.on("markerplaced", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        map.handle_input(InputEvent::Click {
            position: Point::new(500.0, 400.0),
        })
        .unwrap();
        let events = map.process_events();

        assert_eq!(placed.load(Ordering::SeqCst), 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, MapEvent::NearestChanged { marker: Some(_), .. })));
    }

    #[test]
    fn test_full_frame_after_interaction() {
        let mut map = loaded_session();
        map.place_marker(LatLng::new(59.3, 27.9)).unwrap();

        let mut ctx = RenderContext::default();
        Renderer::for_map(&map).paint(&map, &mut ctx);

        let images: Vec<_> = ctx.images().map(|(asset, _)| asset).collect();
        assert_eq!(images[0], AssetId::Basemap);
        assert_eq!(
            images.iter().filter(|a| **a == AssetId::MarkerIcon).count(),
            estonia().len()
        );
        assert_eq!(
            images
                .iter()
                .filter(|a| **a == AssetId::HighlightedIcon)
                .count(),
            1
        );
        assert_eq!(ctx.lines().count(), 1);
        assert!(ctx.texts().any(|(text, _)| text == "Nearest: Narva"));
    }

    #[test]
    fn test_config_overrides_header_and_limits() {
        let config = ViewerConfig::from_json_str(
            r#"{
                "zoom": { "min_scale": 1.0, "max_scale": 2.0 },
                "style": { "header_prefix": "Closest" }
            }"#,
        )
        .unwrap();
        let mut map = Map::new(config, SURFACE).unwrap();
        map.handle_input(InputEvent::Wheel {
            delta_y: -10_000.0,
            position: Point::new(0.0, 0.0),
        })
        .unwrap();
        assert_eq!(map.viewport().scale(), 2.0);

        let mut ctx = RenderContext::default();
        Renderer::for_map(&map).paint(&map, &mut ctx);
        assert!(ctx.texts().any(|(text, _)| text == "Closest: "));
    }
}

/// Drives the egui widget through real frames
#[cfg(all(test, feature = "egui"))]
mod widget_tests {
    use super::*;
    use egui::{Context, Event, Modifiers, PointerButton, Pos2, RawInput, Rect, Vec2};
    use nearmap::ui::widget::{MapWidget, TextureCache};

    fn input(events: Vec<Event>) -> RawInput {
        RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))),
            events,
            ..Default::default()
        }
    }

    fn frame(ctx: &Context, map: &mut Map, renderer: &Renderer, events: Vec<Event>) -> Rect {
        let textures = TextureCache::new();
        let mut rect = Rect::NOTHING;
        let _ = ctx.run(input(events), |ctx| {
            egui::CentralPanel::default()
                .frame(egui::Frame::none())
                .show(ctx, |ui| {
                    rect = ui.add(MapWidget::new(map, renderer, &textures)).rect;
                });
        });
        rect
    }

    #[test]
    fn test_widget_resizes_session() {
        let ctx = Context::default();
        let mut map = Map::new(ViewerConfig::default(), Point::new(10.0, 10.0)).unwrap();
        let renderer = Renderer::for_map(&map);

        let rect = frame(&ctx, &mut map, &renderer, Vec::new());
        assert!(rect.width() > 0.0);
        assert_eq!(
            map.surface_size(),
            Point::new(rect.width() as f64, rect.height() as f64)
        );
        assert!(!map.needs_redraw());
    }

    #[test]
    fn test_widget_click_places_marker() {
        let ctx = Context::default();
        let mut map = Map::new(ViewerConfig::default(), Point::new(800.0, 600.0)).unwrap();
        let renderer = Renderer::for_map(&map);
        frame(&ctx, &mut map, &renderer, Vec::new());
        map.on_asset_event(AssetEvent::ImageLoaded {
            asset: AssetId::Basemap,
            image: Arc::new(LoadedImage {
                width: 800,
                height: 600,
                rgba: vec![0; 800 * 600 * 4],
            }),
        });

        let pos = Pos2::new(400.0, 300.0);
        let button = |pressed| Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::default(),
        };
        frame(&ctx, &mut map, &renderer, vec![Event::PointerMoved(pos)]);
        frame(&ctx, &mut map, &renderer, vec![button(true)]);
        frame(&ctx, &mut map, &renderer, vec![button(false)]);

        assert!(map.markers().highlighted().is_some());
    }

    #[test]
    fn test_widget_drag_pans_and_releases() {
        let ctx = Context::default();
        let mut map = Map::new(ViewerConfig::default(), Point::new(800.0, 600.0)).unwrap();
        let renderer = Renderer::for_map(&map);
        frame(&ctx, &mut map, &renderer, Vec::new());

        let start = Pos2::new(200.0, 200.0);
        let end = Pos2::new(240.0, 230.0);
        let button = |pos, pressed| Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::default(),
        };
        frame(&ctx, &mut map, &renderer, vec![Event::PointerMoved(start)]);
        frame(&ctx, &mut map, &renderer, vec![button(start, true)]);
        frame(&ctx, &mut map, &renderer, vec![Event::PointerMoved(end)]);
        assert!(map.viewport().is_dragging());
        frame(&ctx, &mut map, &renderer, vec![button(end, false)]);

        assert!(!map.viewport().is_dragging());
        assert_eq!(map.viewport().origin, Point::new(40.0, 30.0));
        assert!(map.markers().highlighted().is_none());
    }
}
