//! Dioxus UI components for vellum.
//!
//! Provides the zoomable image canvas with its crop, text, and mask
//! overlays, the before/after comparator, the tool bar, the export
//! dialog, the upload zone, and draggable result thumbnails.

mod canvas;
mod comparator;
mod crop;
mod export;
mod mask;
mod text;
mod thumbnail;
mod toolbar;
mod upload;

use dioxus::html::input_data::MouseButton as DomButton;
use dioxus::prelude::*;
use vellum_canvas::{MouseButton, Point, RawPointer};

pub use canvas::ImageCanvas;
pub use comparator::ComparatorView;
pub use crop::CropOverlay;
pub use export::ExportModal;
pub use mask::MaskOverlay;
pub use text::TextLabel;
pub use thumbnail::ResultThumbnail;
pub use toolbar::ToolBar;
pub use upload::{FileUpload, Upload};

/// Convert a Dioxus mouse event into core input.
fn mouse_input(evt: &MouseEvent) -> RawPointer {
    let p = evt.client_coordinates();
    let button = match evt.trigger_button() {
        Some(DomButton::Primary) => MouseButton::Primary,
        Some(DomButton::Auxiliary) => MouseButton::Auxiliary,
        Some(DomButton::Secondary) => MouseButton::Secondary,
        _ => MouseButton::Other,
    };
    RawPointer::Mouse {
        button,
        position: Point::new(p.x, p.y),
    }
}

/// Convert a Dioxus touch event into core input, keeping touch order.
fn touch_input(evt: &TouchEvent) -> RawPointer {
    let touches = evt
        .touches()
        .iter()
        .map(|t| {
            let p = t.client_coordinates();
            Point::new(p.x, p.y)
        })
        .collect();
    RawPointer::Touch { touches }
}
