//! Configuration for the viewer
//!
//! Every field has a default, so a config file only needs to name the
//! values it overrides. Files are JSON and are checked with
//! [`ViewerConfig::validate`] after loading.

use crate::{
    core::{constants::*, geo::GeoBoundingBox},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub bounds: GeoBoundingBox,
    pub zoom: ZoomConfig,
    pub style: StyleConfig,
    pub assets: AssetConfig,
    pub interaction: InteractionOptions,
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("loaded viewer config from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        self.zoom.validate()?;
        if self.style.icon_size <= 0.0 {
            return Err(MapError::Config(format!(
                "icon_size must be positive, got {}",
                self.style.icon_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub initial_scale: f64,
    pub wheel_sensitivity: f64,
}

impl ZoomConfig {
    fn validate(&self) -> Result<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale && self.max_scale.is_finite()) {
            return Err(MapError::Config(format!(
                "scale range [{}, {}] is empty or non-positive",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.initial_scale.is_finite() && self.initial_scale > 0.0) {
            return Err(MapError::Config(format!(
                "initial_scale must be positive, got {}",
                self.initial_scale
            )));
        }
        if !(self.wheel_sensitivity.is_finite() && self.wheel_sensitivity > 0.0) {
            return Err(MapError::Config(format!(
                "wheel_sensitivity must be positive, got {}",
                self.wheel_sensitivity
            )));
        }
        Ok(())
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            initial_scale: 1.0,
            wheel_sensitivity: WHEEL_ZOOM_SENSITIVITY,
        }
    }
}

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const SHADOW: Color = Color::rgba(0, 0, 0, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub background: Color,
    pub icon_size: f64,
    pub label_min_scale: f64,
    pub label_font_size: f32,
    pub label_color: Color,
    pub line_color: Color,
    pub line_width: f32,
    pub distance_font_size: f32,
    pub header_prefix: String,
    pub header_font_size: f32,
    pub header_color: Color,
    pub header_position: (f64, f64),
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            icon_size: MARKER_ICON_SIZE,
            label_min_scale: LABEL_MIN_SCALE,
            label_font_size: LABEL_FONT_SIZE,
            label_color: Color::WHITE,
            line_color: Color::RED,
            line_width: NEAREST_LINE_WIDTH,
            distance_font_size: LABEL_FONT_SIZE,
            header_prefix: "Nearest".to_string(),
            header_font_size: HEADER_FONT_SIZE,
            header_color: Color::WHITE,
            header_position: HEADER_POSITION,
        }
    }
}

/// Where each asset is fetched from: a filesystem path or an http(s) URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub basemap: String,
    pub marker_icon: String,
    pub highlighted_icon: String,
    pub dataset: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            basemap: "resources/basemap.png".to_string(),
            marker_icon: "resources/marker.png".to_string(),
            highlighted_icon: "resources/marker_highlighted.png".to_string(),
            dataset: "markers.json".to_string(),
        }
    }
}

/// Which input transitions are enabled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionOptions {
    pub dragging: bool,
    pub scroll_wheel_zoom: bool,
    pub place_on_click: bool,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            dragging: true,
            scroll_wheel_zoom: true,
            place_on_click: true,
        }
    }
}
