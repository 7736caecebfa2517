//! Off-screen rasterization and encoding.
//!
//! The source is fully decoded first, uploaded into a `tiny-skia`
//! pixmap (premultiplied RGBA), drawn scaled into an output pixmap of
//! `natural * scale` pixels, converted back to straight RGBA, and
//! encoded.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgba, RgbaImage};
use tiny_skia::{Color, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};
use vellum_canvas::{Dimensions, ImagePayload};

use crate::error::ExportError;
use crate::options::{ExportFormat, ExportOptions};

/// Encoded export result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutput {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Encoding of `bytes`.
    pub format: ExportFormat,
}

impl ExportOutput {
    /// Output dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// MIME type of `bytes`.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Decode `payload` and export it.
///
/// # Errors
///
/// Returns [`ExportError::Payload`] or [`ExportError::ImageLoad`] when
/// the source cannot be decoded, plus everything [`export_image`] returns.
pub fn export(payload: &ImagePayload, options: &ExportOptions) -> Result<ExportOutput, ExportError> {
    let source = payload.decode_image()?;
    export_image(&source, options)
}

/// Scale and encode an already decoded image.
///
/// # Errors
///
/// Returns [`ExportError::InvalidOptions`] for bad options,
/// [`ExportError::SurfaceUnavailable`] when the output pixmap cannot be
/// allocated (zero-sized source, or an overflowing size), and
/// [`ExportError::Encode`] when encoding fails.
pub fn export_image(source: &RgbaImage, options: &ExportOptions) -> Result<ExportOutput, ExportError> {
    options.validate()?;
    let rendered = render(source, options)?;
    let (width, height) = rendered.dimensions();

    let mut bytes = Vec::new();
    match options.format {
        ExportFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(
                rendered.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgba8,
            )?;
        }
        ExportFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(rendered).to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, options.quality).write_image(
                rgb.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgb8,
            )?;
        }
    }

    log::info!(
        "exported {width}x{height} {} ({} bytes)",
        options.format,
        bytes.len()
    );
    Ok(ExportOutput {
        bytes,
        width,
        height,
        format: options.format,
    })
}

/// Draw `source` at the requested scale into straight RGBA.
///
/// JPEG output is composited over opaque white so no transparency
/// survives into the opaque encoding.
///
/// # Errors
///
/// Returns [`ExportError::SurfaceUnavailable`] when either pixmap cannot
/// be created.
#[allow(clippy::cast_precision_loss)]
pub fn render(source: &RgbaImage, options: &ExportOptions) -> Result<RgbaImage, ExportError> {
    let factor = options.scale.factor();
    let out_w = u64::from(source.width()) * u64::from(factor);
    let out_h = u64::from(source.height()) * u64::from(factor);
    let unavailable = || ExportError::SurfaceUnavailable {
        width: out_w,
        height: out_h,
    };
    if out_w == 0 || out_h == 0 {
        return Err(unavailable());
    }

    // Straight copy: a premultiplied round trip would lose colour on
    // low-alpha pixels.
    if factor == 1 && options.format == ExportFormat::Png {
        return Ok(source.clone());
    }

    let src = to_pixmap(source).ok_or_else(unavailable)?;
    let mut surface = u32::try_from(out_w)
        .ok()
        .zip(u32::try_from(out_h).ok())
        .and_then(|(w, h)| Pixmap::new(w, h))
        .ok_or_else(unavailable)?;

    if options.format == ExportFormat::Jpeg {
        surface.fill(Color::WHITE);
    }

    let paint = PixmapPaint {
        quality: if factor == 1 {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bicubic
        },
        ..PixmapPaint::default()
    };
    let scale = factor as f32;
    surface.draw_pixmap(
        0,
        0,
        src.as_ref(),
        &paint,
        Transform::from_scale(scale, scale),
        None,
    );

    Ok(from_pixmap(&surface))
}

/// Upload straight RGBA into a premultiplied pixmap.
fn to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let mut data = Vec::with_capacity(img.as_raw().len());
    for px in img.pixels() {
        let [r, g, b, a] = px.0;
        data.extend_from_slice(&[premultiply(r, a), premultiply(g, a), premultiply(b, a), a]);
    }
    Pixmap::from_vec(data, size)
}

#[allow(clippy::cast_possible_truncation)]
fn premultiply(c: u8, a: u8) -> u8 {
    ((u16::from(c) * u16::from(a) + 127) / 255) as u8
}

/// Convert a premultiplied pixmap back to straight RGBA.
#[allow(clippy::cast_possible_truncation)]
fn from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let data = pixmap.data();
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (px, chunk) in img.pixels_mut().zip(data.chunks_exact(4)) {
        let a = chunk[3];
        *px = if a == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            let un = |c: u8| ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8;
            Rgba([un(chunk[0]), un(chunk[1]), un(chunk[2]), a])
        };
    }
    img
}
