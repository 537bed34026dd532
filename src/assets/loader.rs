use crate::{
    assets::source::AssetSource,
    core::{config::AssetConfig, geo::ImageExtent},
    data::dataset::{parse_dataset, DatasetLoad},
    MapError, Result,
};
use futures::future::join_all;
use resvg::{tiny_skia, usvg};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, sync::Arc};

/// The four resources a viewer session needs before it is fully drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    Basemap,
    MarkerIcon,
    HighlightedIcon,
    Dataset,
}

impl AssetId {
    pub const ALL: [AssetId; 4] = [
        AssetId::Basemap,
        AssetId::MarkerIcon,
        AssetId::HighlightedIcon,
        AssetId::Dataset,
    ];

    pub fn is_image(self) -> bool {
        !matches!(self, AssetId::Dataset)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetId::Basemap => "basemap",
            AssetId::MarkerIcon => "marker-icon",
            AssetId::HighlightedIcon => "highlighted-icon",
            AssetId::Dataset => "dataset",
        };
        f.write_str(name)
    }
}

/// A decoded image in straight RGBA8
#[derive(Clone, PartialEq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl LoadedImage {
    /// Decodes a raster image, or rasterises an SVG document
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if is_svg(bytes) {
            return Self::decode_svg(bytes);
        }
        Self::decode_raster(bytes)
    }

    pub fn decode_raster(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    /// Renders an SVG document at its natural size
    pub fn decode_svg(bytes: &[u8]) -> Result<Self> {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;
        let size = tree.size();
        let width = size.width().ceil() as u32;
        let height = size.height().ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| MapError::AssetLoad {
            asset: "svg".to_string(),
            reason: format!("cannot rasterise at {}x{}", width, height),
        })?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha
        let rgba = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Natural pixel size; fails for zero-sized images
    pub fn extent(&self) -> Result<ImageExtent> {
        ImageExtent::new(self.width as f64, self.height as f64)
    }
}

impl fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

fn is_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn is_svg_location(location: &str) -> bool {
    Path::new(location)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Completion notice for one asset, in whatever order loads finish
#[derive(Debug, Clone)]
pub enum AssetEvent {
    ImageLoaded {
        asset: AssetId,
        image: Arc<LoadedImage>,
    },
    DatasetLoaded(DatasetLoad),
    Failed {
        asset: AssetId,
        reason: String,
    },
}

impl AssetEvent {
    pub fn asset(&self) -> AssetId {
        match self {
            AssetEvent::ImageLoaded { asset, .. } | AssetEvent::Failed { asset, .. } => *asset,
            AssetEvent::DatasetLoaded(_) => AssetId::Dataset,
        }
    }
}

/// Fetches and decodes the session's assets through an [`AssetSource`].
///
/// Loads are independent of each other; every load ends in exactly one
/// [`AssetEvent`], failures included.
#[derive(Clone)]
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    assets: AssetConfig,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn AssetSource>, assets: AssetConfig) -> Self {
        Self { source, assets }
    }

    pub fn location(&self, asset: AssetId) -> &str {
        match asset {
            AssetId::Basemap => &self.assets.basemap,
            AssetId::MarkerIcon => &self.assets.marker_icon,
            AssetId::HighlightedIcon => &self.assets.highlighted_icon,
            AssetId::Dataset => &self.assets.dataset,
        }
    }

    async fn fetch_and_decode(&self, asset: AssetId) -> Result<AssetEvent> {
        let location = self.location(asset);
        let bytes = self.source.fetch(location).await?;

        if asset.is_image() {
            let image = if is_svg_location(location) {
                LoadedImage::decode_svg(&bytes)?
            } else {
                LoadedImage::decode(&bytes)?
            };
            log::info!(
                "loaded {} from {} ({}x{})",
                asset,
                location,
                image.width,
                image.height
            );
            return Ok(AssetEvent::ImageLoaded {
                asset,
                image: Arc::new(image),
            });
        }

        let text = String::from_utf8(bytes)
            .map_err(|e| MapError::DataLoad(format!("dataset is not UTF-8: {}", e)))?;
        let load = parse_dataset(&text)?;
        log::info!("loaded {} records from {}", load.records.len(), location);
        Ok(AssetEvent::DatasetLoaded(load))
    }

    /// Loads a single asset; errors are folded into [`AssetEvent::Failed`]
    pub async fn load(&self, asset: AssetId) -> AssetEvent {
        match self.fetch_and_decode(asset).await {
            Ok(event) => event,
            Err(e) => {
                log::error!("failed to load {} from {}: {}", asset, self.location(asset), e);
                AssetEvent::Failed {
                    asset,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Loads every asset concurrently and returns once all have completed
    pub async fn load_all(&self) -> Vec<AssetEvent> {
        join_all(AssetId::ALL.iter().map(|&asset| self.load(asset))).await
    }

    /// Starts every load as its own task on `handle`.
    ///
    /// Each completion is sent over the returned channel as soon as it
    /// finishes, so the receiving side sees them in completion order.
    #[cfg(feature = "tokio-runtime")]
    pub fn spawn_all(&self, handle: &tokio::runtime::Handle) -> crossbeam_channel::Receiver<AssetEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        for asset in AssetId::ALL {
            let loader = self.clone();
            let tx = tx.clone();
            handle.spawn(async move {
                let event = loader.load(asset).await;
                if tx.send(event).is_err() {
                    log::debug!("{} finished after the receiver was dropped", asset);
                }
            });
        }
        rx
    }
}
