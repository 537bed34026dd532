//! Prelude module for common nearmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use nearmap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{AssetConfig, Color, InteractionOptions, StyleConfig, ViewerConfig, ZoomConfig},
    distance::haversine_km,
    geo::{GeoBoundingBox, ImageExtent, LatLng, Point},
    map::{AssetStatus, Map},
    projection::GeoProjection,
    viewport::ViewportTransform,
};

pub use crate::layers::{
    marker::{Marker, MarkerId},
    store::{MarkerStore, NearestResult},
};

pub use crate::data::dataset::{parse_dataset, DatasetLoad, MarkerRecord, RecordError};

pub use crate::input::{
    events::{InputEvent, MapEvent},
    handler::{Action, EventManager, InteractionController, InteractionState},
};

pub use crate::assets::{
    barrier::LoadBarrier,
    loader::{AssetEvent, AssetId, AssetLoader, LoadedImage},
    source::{AssetSource, DefaultSource, FileSource, HttpSource, MemorySource},
};

pub use crate::rendering::{
    context::{DrawCommand, ImageTransform, LineStyle, RenderContext, RenderSurface, TextStyle},
    renderer::Renderer,
};

#[cfg(feature = "egui")]
pub use crate::ui::widget::{EguiSurface, MapWidget, TextureCache};

pub use crate::{MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
