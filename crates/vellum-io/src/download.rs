//! File download via Blob URLs and direct links.
//!
//! Dioxus has no built-in file download API.  This module triggers
//! downloads by pointing a temporary `<a download>` element at either a
//! Blob object URL (exported images) or the resource URL itself
//! (videos), and programmatically clicking it.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use vellum_export::{DownloadPlan, ExportOutput};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),

    /// Rasterization must happen before a plan can be delivered.
    #[error("image results must be exported before download")]
    NotRasterized,
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Trigger a download of encoded export bytes.
///
/// Creates a `Blob` from the bytes, generates an object URL, and clicks
/// a temporary `<a download="filename">`. The object URL is revoked
/// after the click.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if any browser API call fails
/// (e.g., `Blob` creation, `URL.createObjectURL`, element creation).
pub fn trigger_download(output: &ExportOutput, filename: &str) -> Result<(), DownloadError> {
    let uint8_array = js_sys::Uint8Array::from(output.bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(output.mime_type());
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    let result = click_link(&url, filename);

    // Best-effort cleanup; the download is already initiated.
    let _ = web_sys::Url::revoke_object_url(&url);
    result
}

/// Download a hosted resource by link, without re-encoding.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if element creation fails.
pub fn trigger_link_download(url: &str, filename: &str) -> Result<(), DownloadError> {
    click_link(url, filename)
}

/// Deliver a link plan. Rasterize plans need an export first.
///
/// # Errors
///
/// Returns [`DownloadError::NotRasterized`] for rasterize plans, or the
/// link download's error.
pub fn deliver_link(plan: &DownloadPlan) -> Result<(), DownloadError> {
    match plan {
        DownloadPlan::Link { url, filename } => trigger_link_download(url, filename),
        DownloadPlan::Rasterize { .. } => Err(DownloadError::NotRasterized),
    }
}

fn click_link(href: &str, filename: &str) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;

    anchor.set_href(href);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();
    let _ = body.remove_child(&anchor);

    Ok(())
}
