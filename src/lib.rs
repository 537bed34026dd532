//! # nearmap
//!
//! A small map viewer engine: a static basemap image with point markers,
//! pan and zoom, click-to-place and a "closest marker" lookup.
//!
//! The engine owns the geometry (projection, viewport, marker store) and the
//! interaction state machine. Drawing goes through the [`RenderSurface`]
//! trait and assets come in through [`AssetSource`], so the same session can
//! be driven headlessly or from the egui widget in [`ui`].

pub mod assets;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
#[cfg(feature = "egui")]
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::ViewerConfig,
    distance::haversine_km,
    geo::{GeoBoundingBox, ImageExtent, LatLng, Point},
    map::Map,
    projection::GeoProjection,
    viewport::ViewportTransform,
};

pub use layers::{
    marker::{Marker, MarkerId},
    store::{MarkerStore, NearestResult},
};

pub use input::{
    events::{InputEvent, MapEvent},
    handler::InteractionController,
};

pub use assets::{
    loader::{AssetEvent, AssetId, AssetLoader},
    source::AssetSource,
};

pub use rendering::{
    context::{RenderContext, RenderSurface},
    renderer::Renderer,
};

#[cfg(feature = "egui")]
pub use ui::widget::MapWidget;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("SVG error: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("Failed to load asset {asset}: {reason}")]
    AssetLoad { asset: String, reason: String },

    #[error("Projection not ready: {0}")]
    NotReady(&'static str),

    #[error("Invalid bounding box: {0}")]
    InvalidBounds(String),

    #[error("Invalid marker record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the global logger, honouring `RUST_LOG`.
///
/// Calling it more than once is harmless; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
