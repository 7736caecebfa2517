//! Before/after comparator.

use dioxus::prelude::*;
use vellum_canvas::{HitTarget, ImagePayload};

use super::{mouse_input, touch_input};
use crate::session::{BrowserSession, COMPARATOR_ID, press};

/// Props for the [`ComparatorView`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ComparatorViewProps {
    session: Signal<BrowserSession>,
    /// Revealed left of the slider.
    before: ImagePayload,
    /// Shown right of the slider; also sets the aspect ratio.
    after: ImagePayload,
}

/// Two stacked images with a draggable vertical divider.
///
/// The "before" layer is clipped from the right so it shows only left
/// of the slider. Pressing anywhere jumps the slider there.
#[component]
pub fn ComparatorView(props: ComparatorViewProps) -> Element {
    let session = props.session;
    let (position, inset, ratio) = {
        let s = session.read();
        let c = s.comparator();
        (c.position(), c.clip_inset(), c.aspect_ratio())
    };
    let ratio_style = ratio.map_or_else(String::new, |r| format!("aspect-ratio: {r};"));

    rsx! {
        div {
            id: COMPARATOR_ID,
            class: "vellum-comparator",
            style: "{ratio_style}",
            onmousedown: move |evt| {
                evt.stop_propagation();
                evt.prevent_default();
                press(session, &mouse_input(&evt), HitTarget::Comparator);
            },
            ontouchstart: move |evt| {
                evt.stop_propagation();
                press(session, &touch_input(&evt), HitTarget::Comparator);
            },

            img {
                class: "vellum-layer",
                src: props.after.to_data_url(),
                draggable: "false",
                alt: "After",
            }
            img {
                class: "vellum-layer",
                style: "clip-path: inset(0 {inset}% 0 0);",
                src: props.before.to_data_url(),
                draggable: "false",
                alt: "Before",
            }
            div { class: "vellum-slider", style: "left: {position}%;" }
        }
    }
}
