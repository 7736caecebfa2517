//! Mask data contract.
//!
//! Stroke painting belongs to an external surface. The canvas only owns
//! the [`MaskState`] it hands that surface by shared reference, and knows
//! how to visualise a finished mask: the mask image's alpha channel is a
//! stencil, tinted with a flat color at a fixed opacity and laid over the
//! displayed image at the same size.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::payload::ImagePayload;
use crate::types::{CanvasConfig, CanvasError, Dimensions, Point, Rect};

/// What a brush stroke does to the mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskMode {
    /// Strokes add to the mask.
    #[default]
    Draw,
    /// Strokes remove from the mask.
    Erase,
    /// Painting is disabled.
    #[serde(rename = "none")]
    Off,
}

/// Mask image plus brush configuration, shared with the painting surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskState {
    /// Encoded mask raster; `None` until something has been painted.
    pub image: Option<ImagePayload>,
    /// Brush diameter in natural image pixels.
    pub brush_size: f64,
    /// Current brush mode.
    pub mode: MaskMode,
}

impl MaskState {
    /// An empty mask with the configured brush size.
    #[must_use]
    pub const fn new(brush_size: f64) -> Self {
        Self {
            image: None,
            brush_size,
            mode: MaskMode::Draw,
        }
    }

    /// `true` when there is a mask image to show or hand off.
    #[must_use]
    pub const fn has_mask(&self) -> bool {
        self.image.is_some()
    }

    /// Drop the mask image, keeping brush settings.
    pub fn clear(&mut self) {
        self.image = None;
    }
}

impl Default for MaskState {
    fn default() -> Self {
        Self::new(CanvasConfig::DEFAULT_BRUSH_SIZE)
    }
}

/// Tint a mask stencil.
///
/// Every output pixel takes the `tint` color; its alpha is the stencil's
/// alpha scaled by `opacity` (clamped to `[0, 1]`). Stencil color is
/// ignored.
#[must_use = "returns the tinted overlay"]
pub fn tint_mask(stencil: &RgbaImage, tint: [u8; 3], opacity: f32) -> RgbaImage {
    let opacity = opacity.clamp(0.0, 1.0);
    let [r, g, b] = tint;
    RgbaImage::from_fn(stencil.width(), stencil.height(), |x, y| {
        let a = f32::from(stencil.get_pixel(x, y).0[3]);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let alpha = (a * opacity).round() as u8;
        Rgba([r, g, b, alpha])
    })
}

/// Decode the mask image and tint it with the configured color.
///
/// Returns `Ok(None)` when there is no mask to show.
///
/// # Errors
///
/// Returns [`CanvasError`] when the mask payload cannot be decoded.
pub fn render_mask_overlay(
    mask: &MaskState,
    config: &CanvasConfig,
) -> Result<Option<RgbaImage>, CanvasError> {
    let Some(payload) = &mask.image else {
        return Ok(None);
    };
    let stencil = payload.decode_image()?;
    Ok(Some(tint_mask(&stencil, config.mask_tint, config.mask_opacity)))
}

/// Map a client point over the displayed image to natural image pixels.
///
/// `image_box` is the client rectangle the image currently occupies
/// (after pan and zoom). Points outside it map to `None`.
#[must_use]
pub fn mask_point(client: Point, image_box: Rect, natural: Dimensions) -> Option<Point> {
    if image_box.size().is_empty() {
        return None;
    }
    let local = image_box.to_local(client);
    if !(0.0..=image_box.width).contains(&local.x) || !(0.0..=image_box.height).contains(&local.y)
    {
        return None;
    }
    Some(Point::new(
        local.x / image_box.width * f64::from(natural.width),
        local.y / image_box.height * f64::from(natural.height),
    ))
}
