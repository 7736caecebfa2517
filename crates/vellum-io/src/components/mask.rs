//! Mask stencil visualisation.

use dioxus::prelude::*;

use crate::raster;
use crate::session::BrowserSession;

/// Props for the [`MaskOverlay`] component.
#[derive(Props, Clone, PartialEq)]
pub struct MaskOverlayProps {
    session: Signal<BrowserSession>,
}

/// The tinted mask laid over the image box.
///
/// The tint is recomputed only when the mask image itself changes,
/// not on every pointer move that touches the session.
#[component]
pub fn MaskOverlay(props: MaskOverlayProps) -> Element {
    let session = props.session;
    let mask = use_memo(move || session.read().mask().clone());
    let overlay = use_memo(move || {
        let mask = mask();
        let config = session.peek().config().clone();
        raster::mask_overlay_payload(&mask, &config).map_err(|e| e.to_string())
    });

    match overlay() {
        Ok(Some(payload)) => rsx! {
            img {
                class: "vellum-mask",
                src: payload.to_data_url(),
                draggable: "false",
                alt: "",
            }
        },
        Ok(None) => rsx! {},
        Err(e) => {
            log::warn!("mask overlay failed: {e}");
            rsx! {}
        }
    }
}
