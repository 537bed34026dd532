pub mod widget;

pub use widget::{EguiSurface, MapWidget, TextureCache};
