//! Integration test: export a half-transparent image through the full
//! payload -> rasterize -> encode path and decode the result.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use image::{Rgba, RgbaImage};
use vellum_canvas::ImagePayload;
use vellum_export::{ExportError, ExportFormat, ExportOptions, ExportScale, ExportSession};

/// 500x300, left half transparent, right half opaque blue.
fn fixture() -> ImagePayload {
    let img = RgbaImage::from_fn(500, 300, |x, _| {
        if x < 250 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([20, 40, 220, 255])
        }
    });
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
    ImagePayload::from_png_bytes(&buf)
}

fn options(format: ExportFormat) -> ExportOptions {
    ExportOptions {
        scale: ExportScale::X2,
        format,
        quality: 90,
    }
}

#[test]
fn scale_two_doubles_dimensions_for_every_format() {
    let payload = fixture();
    for format in [ExportFormat::Png, ExportFormat::Jpeg] {
        let out = vellum_export::export(&payload, &options(format)).unwrap();
        assert_eq!((out.width, out.height), (1000, 600), "{format}");
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1000, 600), "{format}");
    }
}

#[test]
fn jpeg_has_no_transparency() {
    let out = vellum_export::export(&fixture(), &options(ExportFormat::Jpeg)).unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert!(decoded.pixels().all(|p| p.0[3] == 255));
    // Formerly transparent area is white, away from the seam.
    let p = decoded.get_pixel(20, 20).0;
    assert!(p[0] > 245 && p[1] > 245 && p[2] > 245, "{p:?}");
}

#[test]
fn png_keeps_transparency() {
    let out = vellum_export::export(&fixture(), &options(ExportFormat::Png)).unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(20, 20).0[3], 0);
    let opaque = decoded.get_pixel(980, 580).0;
    assert!(opaque[3] > 250, "{opaque:?}");
    assert!(opaque[2] > opaque[0], "{opaque:?}");
}

#[test]
fn single_flight_rejects_concurrent_export() {
    let session = ExportSession::new();
    let payload = fixture();
    let token = session.try_begin().unwrap();
    assert!(session.run(&payload, &ExportOptions::default()).unwrap().is_none());
    drop(token);
    let out = session.run(&payload, &ExportOptions::default()).unwrap().unwrap();
    assert_eq!((out.width, out.height), (500, 300));
    assert!(!session.is_processing());
}

#[test]
fn corrupt_payload_is_an_image_load_error() {
    let payload = ImagePayload::from_png_bytes(b"not a png at all");
    let err = vellum_export::export(&payload, &ExportOptions::default()).unwrap_err();
    assert!(matches!(err, ExportError::ImageLoad(_)), "{err}");
}
