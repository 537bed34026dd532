use crate::{
    assets::loader::AssetId,
    core::{
        config::{Color, StyleConfig},
        constants::{DISTANCE_LABEL_OFFSET, HEADER_SHADOW_OFFSET, LABEL_GAP},
        geo::Point,
        map::Map,
    },
    layers::marker::Marker,
    rendering::context::{ImageTransform, LineStyle, RenderSurface, TextShadow, TextStyle},
};

/// Paints a [`Map`] onto any [`RenderSurface`].
///
/// Painting is a pure function of the session state: every frame starts
/// from a cleared surface, so painting twice without changes yields the
/// same picture.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: StyleConfig,
}

impl Renderer {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    pub fn for_map(map: &Map) -> Self {
        Self::new(map.style().clone())
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn paint(&self, map: &Map, surface: &mut dyn RenderSurface) {
        let size = map.surface_size();
        surface.resize(size.x, size.y);
        surface.clear();

        self.paint_basemap(map, surface);
        for marker in map.markers().iter() {
            self.paint_marker(map, marker, surface);
        }
        self.paint_nearest_line(map, surface);
        self.paint_header(map, surface);
    }

    fn paint_basemap(&self, map: &Map, surface: &mut dyn RenderSurface) {
        if !map.is_loaded(AssetId::Basemap) {
            return;
        }
        let Some(extent) = map.projection().extent() else {
            return;
        };
        let viewport = map.viewport();
        surface.draw_image(
            AssetId::Basemap,
            ImageTransform {
                translate: viewport.origin,
                scale: viewport.scale(),
                size: extent.size(),
            },
        );
    }

    fn paint_marker(&self, map: &Map, marker: &Marker, surface: &mut dyn RenderSurface) {
        let icon_size = self.style.icon_size;
        let center = map.viewport().image_to_screen(marker.pixel());
        let corner = center.subtract(&Point::new(icon_size / 2.0, icon_size / 2.0));

        let icon = if marker.is_highlighted() {
            AssetId::HighlightedIcon
        } else {
            AssetId::MarkerIcon
        };
        if map.is_loaded(icon) {
            surface.draw_image(
                icon,
                ImageTransform {
                    translate: corner,
                    scale: 1.0,
                    size: Point::new(icon_size, icon_size),
                },
            );
        }

        if map.viewport().scale() > self.style.label_min_scale && !marker.label().is_empty() {
            surface.draw_text(
                marker.label(),
                Point::new(corner.x + icon_size + LABEL_GAP, corner.y + icon_size / 2.0),
                &TextStyle::new(self.style.label_font_size, self.style.label_color),
            );
        }
    }

    fn paint_nearest_line(&self, map: &Map, surface: &mut dyn RenderSurface) {
        let (Some(highlighted), Some((nearest, distance_km))) =
            (map.markers().highlighted(), map.nearest_marker())
        else {
            return;
        };

        let viewport = map.viewport();
        let from = viewport.image_to_screen(highlighted.pixel());
        let to = viewport.image_to_screen(nearest.pixel());
        surface.draw_line(
            from,
            to,
            &LineStyle {
                color: self.style.line_color,
                width: self.style.line_width,
            },
        );

        let mid = from.midpoint(&to);
        surface.draw_text(
            &format!("{:.2} km", distance_km),
            Point::new(mid.x, mid.y - DISTANCE_LABEL_OFFSET),
            &TextStyle::new(self.style.distance_font_size, self.style.label_color),
        );
    }

    fn paint_header(&self, map: &Map, surface: &mut dyn RenderSurface) {
        let name = map
            .nearest_marker()
            .map(|(marker, _)| marker.label())
            .unwrap_or_default();
        let (x, y) = self.style.header_position;
        let (dx, dy) = HEADER_SHADOW_OFFSET;

        surface.draw_text(
            &format!("{}: {}", self.style.header_prefix, name),
            Point::new(x, y),
            &TextStyle {
                font_size: self.style.header_font_size,
                color: self.style.header_color,
                bold: true,
                shadow: Some(TextShadow {
                    color: Color::SHADOW,
                    offset: Point::new(dx, dy),
                }),
            },
        );
    }
}
