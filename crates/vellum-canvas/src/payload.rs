//! Inline image payloads.
//!
//! Images travel between the canvas and its collaborators as base64
//! strings, either bare or wrapped in a `data:` URL. The canvas treats
//! them as opaque and only decodes them to query pixel dimensions or to
//! rasterize.

use std::fmt;
use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::types::{CanvasError, Dimensions};

/// MIME type assumed for bare base64 payloads.
pub const DEFAULT_MIME: &str = "image/png";

/// A base64-encoded raster image, optionally as a `data:` URL.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Wrap an existing payload string.
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    /// Encode raw PNG bytes as a `data:image/png;base64,` URL.
    #[must_use]
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes, DEFAULT_MIME)
    }

    /// Encode raw bytes of the given MIME type as a `data:` URL.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    /// The payload string, suitable for an `<img src>` when it is a data URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the payload string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A `src`-ready data URL, adding the PNG prefix to bare payloads.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        if self.0.starts_with("data:") {
            self.0.clone()
        } else {
            format!("data:{DEFAULT_MIME};base64,{}", self.0)
        }
    }

    /// Declared MIME type; bare payloads are assumed to be PNG.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';').or_else(|| rest.split_once(',')))
            .map_or(DEFAULT_MIME, |(mime, _)| mime)
    }

    fn base64_body(&self) -> &str {
        if self.0.starts_with("data:") {
            self.0.split_once(',').map_or("", |(_, body)| body)
        } else {
            &self.0
        }
    }

    /// Decode the base64 body into raw encoded image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::EmptyPayload`] for an empty body and
    /// [`CanvasError::InvalidBase64`] when the body is not valid base64.
    pub fn decode_bytes(&self) -> Result<Vec<u8>, CanvasError> {
        let body = self.base64_body().trim();
        if body.is_empty() {
            return Err(CanvasError::EmptyPayload);
        }
        Ok(STANDARD.decode(body)?)
    }

    /// Read the image header and report its pixel dimensions.
    ///
    /// # Errors
    ///
    /// Returns the [`decode_bytes`](Self::decode_bytes) errors, or
    /// [`CanvasError::ImageDecode`] for an unrecognised image.
    pub fn dimensions(&self) -> Result<Dimensions, CanvasError> {
        let bytes = self.decode_bytes()?;
        let (width, height) = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?
            .into_dimensions()?;
        Ok(Dimensions::new(width, height))
    }

    /// Fully decode the image to RGBA.
    ///
    /// # Errors
    ///
    /// Same as [`dimensions`](Self::dimensions).
    pub fn decode_image(&self) -> Result<RgbaImage, CanvasError> {
        let bytes = self.decode_bytes()?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

impl fmt::Debug for ImagePayload {
    // Payloads run to megabytes; show only a prefix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(32).collect();
        write!(f, "ImagePayload({prefix:?}.., {} bytes)", self.0.len())
    }
}

impl From<String> for ImagePayload {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Encode an RGBA image as PNG bytes.
    pub fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    fn solid(width: u32, height: u32) -> ImagePayload {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        ImagePayload::from_png_bytes(&png_bytes(&img))
    }

    #[test]
    fn data_url_dimensions() {
        let p = solid(17, 31);
        assert!(p.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(p.dimensions().unwrap(), Dimensions::new(17, 31));
    }

    #[test]
    fn bare_base64_is_accepted() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 0, 0]));
        let bare = ImagePayload::new(STANDARD.encode(png_bytes(&img)));
        assert_eq!(bare.mime_type(), "image/png");
        assert_eq!(bare.dimensions().unwrap(), Dimensions::new(3, 2));
        assert!(bare.to_data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn decode_image_round_trips_pixels() {
        let p = solid(2, 2);
        let img = p.decode_image().unwrap();
        assert_eq!(img.get_pixel(1, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn empty_payload_errors() {
        assert!(matches!(
            ImagePayload::new("").decode_bytes(),
            Err(CanvasError::EmptyPayload)
        ));
        assert!(matches!(
            ImagePayload::new("data:image/png;base64,").decode_bytes(),
            Err(CanvasError::EmptyPayload)
        ));
    }

    #[test]
    fn invalid_base64_errors() {
        assert!(matches!(
            ImagePayload::new("data:image/png;base64,@@@@").decode_bytes(),
            Err(CanvasError::InvalidBase64(_))
        ));
    }

    #[test]
    fn non_image_bytes_error() {
        let p = ImagePayload::from_bytes(b"definitely not an image", "image/png");
        assert!(matches!(p.dimensions(), Err(CanvasError::ImageDecode(_))));
    }

    #[test]
    fn mime_type_from_data_url() {
        assert_eq!(
            ImagePayload::new("data:image/jpeg;base64,AAAA").mime_type(),
            "image/jpeg"
        );
    }

    #[test]
    fn debug_is_truncated() {
        let p = solid(64, 64);
        let dbg = format!("{p:?}");
        assert!(dbg.len() < 100, "{dbg}");
    }
}
