use crate::{
    assets::loader::AssetId,
    core::{bounds::Bounds, config::Color, geo::Point},
};

/// Placement of an image on screen: `translate` then `scale` applied to an
/// image of natural `size`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTransform {
    pub translate: Point,
    pub scale: f64,
    pub size: Point,
}

impl ImageTransform {
    /// Screen rectangle covered by the transformed image
    pub fn dest_bounds(&self) -> Bounds {
        Bounds::from_origin_and_size(self.translate, self.size.multiply(self.scale))
    }
}

/// Drop shadow drawn underneath text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShadow {
    pub color: Color,
    pub offset: Point,
}

/// Text position is the left end of the baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Color,
    pub bold: bool,
    pub shadow: Option<TextShadow>,
}

impl TextStyle {
    pub fn new(font_size: f32, color: Color) -> Self {
        Self {
            font_size,
            color,
            bold: false,
            shadow: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
}

/// A 2D drawing target in screen pixels.
///
/// Implemented by the egui painter adapter and by [`RenderContext`], which
/// only records what it is asked to draw.
pub trait RenderSurface {
    /// Adopt the given surface size; called at the start of every frame
    fn resize(&mut self, width: f64, height: f64);

    /// Wipe the surface to its background
    fn clear(&mut self);

    /// Draw a loaded image asset; unknown assets are skipped
    fn draw_image(&mut self, asset: AssetId, transform: ImageTransform);

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    fn draw_line(&mut self, from: Point, to: Point, style: &LineStyle);
}

/// Commands that can be issued to the render context
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Image {
        asset: AssetId,
        bounds: Bounds,
    },
    Text {
        text: String,
        position: Point,
        style: TextStyle,
    },
    Line {
        from: Point,
        to: Point,
        style: LineStyle,
    },
}

/// Recording surface for headless rendering and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    pub width: f64,
    pub height: f64,
    /// Commands issued since the last clear
    pub drawing_queue: Vec<DrawCommand>,
    /// Number of clears so far, i.e. frames started
    pub frames: usize,
}

impl RenderContext {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    pub fn images(&self) -> impl Iterator<Item = (AssetId, Bounds)> + '_ {
        self.drawing_queue.iter().filter_map(|cmd| match cmd {
            DrawCommand::Image { asset, bounds } => Some((*asset, *bounds)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.drawing_queue.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, position, .. } => Some((text.as_str(), *position)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.drawing_queue.iter().filter_map(|cmd| match cmd {
            DrawCommand::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }
}

impl RenderSurface for RenderContext {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.drawing_queue.clear();
        self.frames += 1;
    }

    fn draw_image(&mut self, asset: AssetId, transform: ImageTransform) {
        self.drawing_queue.push(DrawCommand::Image {
            asset,
            bounds: transform.dest_bounds(),
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.drawing_queue.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, style: &LineStyle) {
        self.drawing_queue.push(DrawCommand::Line {
            from,
            to,
            style: *style,
        });
    }
}
