//! Shared types for the vellum canvas core.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A 2D point in screen (client) or container coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A floating-point size, used for containers and displayed image boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` when either side is zero, negative, or not finite.
    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

impl From<Dimensions> for Size {
    fn from(d: Dimensions) -> Self {
        Self::new(f64::from(d.width), f64::from(d.height))
    }
}

/// A client-space rectangle, as reported by the layout engine for an
/// element's bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge in client pixels.
    pub left: f64,
    /// Top edge in client pixels.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Width and height.
    #[must_use]
    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Convert a client-space point into this rectangle's local space.
    #[must_use]
    pub fn to_local(self, client: Point) -> Point {
        client - self.origin()
    }
}

/// Natural image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or `None` for a zero height.
    #[must_use]
    pub fn aspect_ratio(self) -> Option<f64> {
        (self.height > 0).then(|| f64::from(self.width) / f64::from(self.height))
    }
}

/// Default values for a freshly placed text overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDefaults {
    /// CSS color string.
    pub color: String,
    /// Font size as a percentage of the image box width.
    pub size: f64,
    /// CSS font family.
    pub font: String,
    /// Initial horizontal position (percent).
    pub x: f64,
    /// Initial vertical position (percent).
    pub y: f64,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            color: String::from("#ffffff"),
            size: 5.0,
            font: String::from("sans-serif"),
            x: 50.0,
            y: 50.0,
        }
    }
}

/// Configuration for the canvas interaction core.
///
/// Every field has a default that matches the interaction behaviour
/// users expect; hosts normally only override the zoom sensitivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Lowest zoom factor reachable by wheel zoom.
    pub min_scale: f64,
    /// Highest zoom factor reachable by wheel zoom.
    pub max_scale: f64,
    /// Scale change per unit of wheel delta (linear).
    pub zoom_sensitivity: f64,
    /// Smallest crop width/height, in percent of the image box.
    pub min_crop_size: f64,
    /// Crop rectangle placed when the crop tool is (re)initialised,
    /// as `[x, y, width, height]` percentages.
    pub default_crop: [f64; 4],
    /// Starting attributes for the text overlay.
    pub text: TextDefaults,
    /// Brush diameter handed to the external mask painter.
    pub default_brush_size: f64,
    /// RGB tint used to visualise the mask stencil.
    pub mask_tint: [u8; 3],
    /// Opacity (0.0 to 1.0) of the mask visualisation.
    pub mask_opacity: f32,
}

impl CanvasConfig {
    /// Default lowest zoom factor.
    pub const DEFAULT_MIN_SCALE: f64 = 0.5;
    /// Default highest zoom factor.
    pub const DEFAULT_MAX_SCALE: f64 = 10.0;
    /// Default wheel sensitivity.
    pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 0.001;
    /// Default minimum crop size (percent).
    pub const DEFAULT_MIN_CROP_SIZE: f64 = 5.0;
    /// Default crop rectangle.
    pub const DEFAULT_CROP: [f64; 4] = [10.0, 10.0, 80.0, 80.0];
    /// Default mask brush size.
    pub const DEFAULT_BRUSH_SIZE: f64 = 40.0;

    /// Check the configuration for values the controllers cannot honour.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if !(self.max_scale.is_finite() && self.max_scale >= self.min_scale) {
            return Err(CanvasError::InvalidConfig(format!(
                "max_scale must be at least min_scale ({}), got {}",
                self.min_scale, self.max_scale
            )));
        }
        // The fitted view always has scale 1.
        if self.min_scale > 1.0 || self.max_scale < 1.0 {
            return Err(CanvasError::InvalidConfig(format!(
                "scale range [{}, {}] must include 1",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.zoom_sensitivity.is_finite() && self.zoom_sensitivity > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "zoom_sensitivity must be positive, got {}",
                self.zoom_sensitivity
            )));
        }
        if !(self.min_crop_size > 0.0 && self.min_crop_size <= 100.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "min_crop_size must be in (0, 100], got {}",
                self.min_crop_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mask_opacity) {
            return Err(CanvasError::InvalidConfig(format!(
                "mask_opacity must be in [0, 1], got {}",
                self.mask_opacity
            )));
        }
        Ok(())
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: Self::DEFAULT_MIN_SCALE,
            max_scale: Self::DEFAULT_MAX_SCALE,
            zoom_sensitivity: Self::DEFAULT_ZOOM_SENSITIVITY,
            min_crop_size: Self::DEFAULT_MIN_CROP_SIZE,
            default_crop: Self::DEFAULT_CROP,
            text: TextDefaults::default(),
            default_brush_size: Self::DEFAULT_BRUSH_SIZE,
            mask_tint: [255, 64, 64],
            mask_opacity: 0.5,
        }
    }
}

/// Errors produced by the canvas core.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The image payload string was empty.
    #[error("image payload is empty")]
    EmptyPayload,

    /// The payload body was not valid base64.
    #[error("invalid base64 image payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded bytes were not a recognised image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Canvas configuration is invalid.
    #[error("invalid canvas configuration: {0}")]
    InvalidConfig(String),
}
