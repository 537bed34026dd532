use crate::{
    assets::loader::{AssetId, LoadedImage},
    core::{config::Color, geo::Point, map::Map},
    input::events::InputEvent,
    prelude::HashMap,
    rendering::{
        context::{ImageTransform, LineStyle, RenderSurface, TextStyle},
        renderer::Renderer,
    },
};
use egui::{Align2, Color32, ColorImage, FontId, Pos2, Rect, Response, Sense, Stroke, Ui, Widget};

/// GPU textures for the image assets, keyed by asset
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<AssetId, egui::TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads a decoded image, replacing any previous texture for `asset`
    pub fn upload(&mut self, ctx: &egui::Context, asset: AssetId, image: &LoadedImage) {
        let color_image = ColorImage::from_rgba_unmultiplied(
            [image.width as usize, image.height as usize],
            &image.rgba,
        );
        let texture = ctx.load_texture(asset.to_string(), color_image, egui::TextureOptions::LINEAR);
        self.textures.insert(asset, texture);
    }

    pub fn get(&self, asset: AssetId) -> Option<&egui::TextureHandle> {
        self.textures.get(&asset)
    }
}

/// [`RenderSurface`] backed by an egui painter clipped to the widget rect.
///
/// Surface coordinates are relative to the rect's top-left corner.
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    textures: &'a TextureCache,
    rect: Rect,
    background: Color32,
}

impl<'a> EguiSurface<'a> {
    pub fn new(
        painter: &'a egui::Painter,
        textures: &'a TextureCache,
        rect: Rect,
        background: Color,
    ) -> Self {
        Self {
            painter,
            textures,
            rect,
            background: background.into(),
        }
    }

    fn to_screen(&self, point: Point) -> Pos2 {
        Pos2::new(
            self.rect.min.x + point.x as f32,
            self.rect.min.y + point.y as f32,
        )
    }
}

impl RenderSurface for EguiSurface<'_> {
    fn resize(&mut self, width: f64, height: f64) {
        self.rect = Rect::from_min_size(self.rect.min, egui::vec2(width as f32, height as f32));
    }

    fn clear(&mut self) {
        self.painter.rect_filled(self.rect, 0.0, self.background);
    }

    fn draw_image(&mut self, asset: AssetId, transform: ImageTransform) {
        let Some(texture) = self.textures.get(asset) else {
            return;
        };
        let bounds = transform.dest_bounds();
        self.painter.image(
            texture.id(),
            Rect::from_two_pos(self.to_screen(bounds.min), self.to_screen(bounds.max)),
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        // Default egui fonts have no bold face; bold text is drawn slightly larger
        let size = if style.bold {
            style.font_size * 1.1
        } else {
            style.font_size
        };
        let font = FontId::proportional(size);
        let anchor = self.to_screen(position);

        if let Some(shadow) = style.shadow {
            self.painter.text(
                anchor + egui::vec2(shadow.offset.x as f32, shadow.offset.y as f32),
                Align2::LEFT_BOTTOM,
                text,
                font.clone(),
                shadow.color.into(),
            );
        }
        self.painter
            .text(anchor, Align2::LEFT_BOTTOM, text, font, style.color.into());
    }

    fn draw_line(&mut self, from: Point, to: Point, style: &LineStyle) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            Stroke::new(style.width, Color32::from(style.color)),
        );
    }
}

/// Immediate-mode widget that feeds egui input into a [`Map`] and paints it.
///
/// ```no_run
/// # use nearmap::{Map, Renderer};
/// # use nearmap::ui::widget::{MapWidget, TextureCache};
/// # fn show(ui: &mut egui::Ui, map: &mut Map, renderer: &Renderer, textures: &TextureCache) {
/// ui.add(MapWidget::new(map, renderer, textures));
/// # }
/// ```
pub struct MapWidget<'a> {
    map: &'a mut Map,
    renderer: &'a Renderer,
    textures: &'a TextureCache,
}

impl<'a> MapWidget<'a> {
    pub fn new(map: &'a mut Map, renderer: &'a Renderer, textures: &'a TextureCache) -> Self {
        Self {
            map,
            renderer,
            textures,
        }
    }

    fn dispatch(&mut self, input: InputEvent) {
        if let Err(e) = self.map.handle_input(input) {
            log::warn!("input not applied: {}", e);
        }
    }

    fn forward_input(&mut self, ui: &Ui, response: &Response, rect: Rect) {
        let local = |pos: Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);

        let size = Point::new(rect.width() as f64, rect.height() as f64);
        if size != self.map.surface_size() {
            self.dispatch(InputEvent::Resize { size });
        }

        if response.drag_started() {
            let press = ui.input(|i| i.pointer.press_origin());
            if let Some(pos) = press.or_else(|| response.interact_pointer_pos()) {
                self.dispatch(InputEvent::PointerDown { position: local(pos) });
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.dispatch(InputEvent::PointerMove { position: local(pos) });
            }
        }
        // TODO: becomes `drag_stopped()` when egui is bumped to 0.27
        if response.drag_released() {
            self.dispatch(InputEvent::PointerUp);
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.dispatch(InputEvent::Click { position: local(pos) });
            }
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
            if scroll_delta.abs() > 0.1 {
                if let Some(pos) = response.hover_pos() {
                    // egui scrolls up with positive y, the wheel model uses deltaY
                    self.dispatch(InputEvent::Wheel {
                        delta_y: -scroll_delta as f64,
                        position: local(pos),
                    });
                }
            }
        }
    }
}

impl Widget for MapWidget<'_> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let desired_size = ui.available_size();
        let (rect, mut response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        self.forward_input(ui, &response, rect);
        if self.map.needs_redraw() {
            response.mark_changed();
        }

        let painter = ui.painter_at(rect);
        let mut surface = EguiSurface::new(
            &painter,
            self.textures,
            rect,
            self.renderer.style().background,
        );
        self.renderer.paint(&*self.map, &mut surface);
        self.map.mark_drawn();

        if self.map.viewport().is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        response
    }
}
