pub mod context;
pub mod renderer;

// Re-export main types
pub use context::{DrawCommand, ImageTransform, LineStyle, RenderContext, RenderSurface, TextStyle};
pub use renderer::Renderer;
