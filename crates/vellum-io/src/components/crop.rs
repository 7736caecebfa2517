//! Crop box with eight resize handles.

use dioxus::prelude::*;
use vellum_canvas::{CropHandle, HitTarget};

use super::{mouse_input, touch_input};
use crate::session::{BrowserSession, press};

/// Position of a handle on the box edge, as CSS percentages.
fn handle_style(handle: CropHandle) -> String {
    let axis = |low: bool, high: bool| {
        if low {
            0
        } else if high {
            100
        } else {
            50
        }
    };
    let left = axis(handle.moves_left(), handle.moves_right());
    let top = axis(handle.moves_top(), handle.moves_bottom());
    format!("left: {left}%; top: {top}%; cursor: {};", handle.cursor())
}

/// Props for the [`CropOverlay`] component.
#[derive(Props, Clone, PartialEq)]
pub struct CropOverlayProps {
    session: Signal<BrowserSession>,
}

/// The crop rectangle, positioned in percent of the image box.
///
/// Dragging the body moves the box; dragging a handle resizes it.
/// Presses stop propagating so the canvas never sees them.
#[component]
pub fn CropOverlay(props: CropOverlayProps) -> Element {
    let session = props.session;
    let rect = session.read().crop().rect();
    let style = format!(
        "left: {}%; top: {}%; width: {}%; height: {}%;",
        rect.x, rect.y, rect.width, rect.height,
    );

    rsx! {
        div {
            class: "vellum-crop",
            style: "{style}",
            onmousedown: move |evt| {
                evt.stop_propagation();
                evt.prevent_default();
                press(session, &mouse_input(&evt), HitTarget::Crop(None));
            },
            ontouchstart: move |evt| {
                evt.stop_propagation();
                press(session, &touch_input(&evt), HitTarget::Crop(None));
            },

            for handle in CropHandle::ALL {
                div {
                    key: "{handle}",
                    class: "vellum-crop-handle",
                    "data-handle": handle.name(),
                    style: handle_style(handle),
                    onmousedown: move |evt| {
                        evt.stop_propagation();
                        evt.prevent_default();
                        press(session, &mouse_input(&evt), HitTarget::Crop(Some(handle)));
                    },
                    ontouchstart: move |evt| {
                        evt.stop_propagation();
                        press(session, &touch_input(&evt), HitTarget::Crop(Some(handle)));
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_handles_sit_on_corners() {
        assert!(handle_style(CropHandle::Nw).starts_with("left: 0%; top: 0%;"));
        assert!(handle_style(CropHandle::Se).starts_with("left: 100%; top: 100%;"));
    }

    #[test]
    fn edge_handles_sit_mid_edge() {
        assert!(handle_style(CropHandle::N).starts_with("left: 50%; top: 0%;"));
        assert!(handle_style(CropHandle::W).starts_with("left: 0%; top: 50%;"));
        assert!(handle_style(CropHandle::E).ends_with("cursor: ew-resize;"));
    }
}
