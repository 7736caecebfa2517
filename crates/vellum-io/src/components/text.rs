//! Draggable text label.

use dioxus::prelude::*;
use vellum_canvas::HitTarget;

use super::{mouse_input, touch_input};
use crate::session::{BrowserSession, press};

/// Props for the [`TextLabel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct TextLabelProps {
    session: Signal<BrowserSession>,
    /// Unscaled image box width, the reference for the font size.
    width: f64,
}

/// The text overlay, centred on its anchor, with a delete button.
#[component]
pub fn TextLabel(props: TextLabelProps) -> Element {
    let session = props.session;
    let (state, font_px) = {
        let s = session.read();
        (s.text().state().clone(), s.text().font_size_px(props.width))
    };
    let style = format!(
        "left: {}%; top: {}%; color: {}; font-family: {}; font-size: {font_px}px;",
        state.x, state.y, state.color, state.font,
    );

    rsx! {
        div {
            class: "vellum-text",
            style: "{style}",
            onmousedown: move |evt| {
                evt.stop_propagation();
                evt.prevent_default();
                press(session, &mouse_input(&evt), HitTarget::Text);
            },
            ontouchstart: move |evt| {
                evt.stop_propagation();
                press(session, &touch_input(&evt), HitTarget::Text);
            },

            "{state.text}"

            button {
                class: "vellum-text-delete",
                aria_label: "Delete text",
                onmousedown: move |evt| {
                    evt.stop_propagation();
                    press(session, &mouse_input(&evt), HitTarget::TextDelete);
                },
                ontouchstart: move |evt| {
                    evt.stop_propagation();
                    press(session, &touch_input(&evt), HitTarget::TextDelete);
                },
                "×"
            }
        }
    }
}
