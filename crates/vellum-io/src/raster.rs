//! Raster image work done in the browser.
//!
//! Overlays computed in Rust (the tinted mask) are shown through an
//! `<img>` whose `src` is a PNG data URL. Applying a crop and stamping
//! brush dabs onto the mask stencil also happen here, on decoded
//! pixels.

use image::{ImageEncoder, Rgba, RgbaImage};
use vellum_canvas::{CanvasConfig, ImagePayload, MaskMode, MaskState, PixelCrop, Point};

/// Errors that can occur while preparing an overlay image.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),

    /// The mask payload could not be decoded.
    #[error("mask image unreadable: {0}")]
    Mask(#[from] vellum_canvas::CanvasError),
}

impl From<image::ImageError> for RasterError {
    fn from(err: image::ImageError) -> Self {
        Self::PngEncode(err.to_string())
    }
}

/// Encode an RGBA image as a PNG data URL payload.
///
/// # Errors
///
/// Returns [`RasterError::PngEncode`] if PNG encoding fails.
pub fn rgba_to_payload(image: &RgbaImage) -> Result<ImagePayload, RasterError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(ImagePayload::from_png_bytes(&png_bytes))
}

/// The tinted mask overlay as a displayable payload, if there is a mask.
///
/// # Errors
///
/// Returns [`RasterError`] if the mask cannot be decoded or re-encoded.
pub fn mask_overlay_payload(
    mask: &MaskState,
    config: &CanvasConfig,
) -> Result<Option<ImagePayload>, RasterError> {
    vellum_canvas::mask::render_mask_overlay(mask, config)?
        .map(|tinted| rgba_to_payload(&tinted))
        .transpose()
}

/// Cut `crop` out of `payload` and re-encode it as PNG.
///
/// # Errors
///
/// Returns [`RasterError`] if the payload cannot be decoded or the
/// result cannot be encoded.
pub fn crop_payload(payload: &ImagePayload, crop: PixelCrop) -> Result<ImagePayload, RasterError> {
    let source = payload.decode_image()?;
    let cropped =
        image::imageops::crop_imm(&source, crop.x, crop.y, crop.width, crop.height).to_image();
    rgba_to_payload(&cropped)
}

/// Stamp a round brush dab onto a mask stencil.
///
/// `Draw` makes covered pixels opaque, `Erase` clears them, and `Off`
/// leaves the stencil untouched. Returns `true` if any pixel changed.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn paint_dab(stencil: &mut RgbaImage, center: Point, diameter: f64, mode: MaskMode) -> bool {
    let value = match mode {
        MaskMode::Draw => Rgba([0, 0, 0, 255]),
        MaskMode::Erase => Rgba([0, 0, 0, 0]),
        MaskMode::Off => return false,
    };
    let radius = (diameter / 2.0).max(0.5);
    let x0 = (center.x - radius).floor().max(0.0) as u32;
    let y0 = (center.y - radius).floor().max(0.0) as u32;
    let x1 = ((center.x + radius).ceil().max(0.0) as u32).min(stencil.width());
    let y1 = ((center.y + radius).ceil().max(0.0) as u32).min(stencil.height());

    let mut changed = false;
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = f64::from(x) + 0.5 - center.x;
            let dy = f64::from(y) + 0.5 - center.y;
            if dx.hypot(dy) <= radius && *stencil.get_pixel(x, y) != value {
                stencil.put_pixel(x, y, value);
                changed = true;
            }
        }
    }
    changed
}
