//! Draggable result thumbnail with its actions.

use dioxus::prelude::*;
use vellum_canvas::{DragPayload, ImagePayload, ResultAction};

/// Props for the [`ResultThumbnail`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultThumbnailProps {
    /// The finished image.
    image: ImagePayload,
    /// Called when one of the action buttons is pressed.
    on_action: EventHandler<ResultAction>,
}

/// A finished result that can be dragged onto the upload zone.
#[component]
pub fn ResultThumbnail(props: ResultThumbnailProps) -> Element {
    let payload = DragPayload::new(props.image.clone());

    rsx! {
        div {
            class: "vellum-thumb",
            draggable: "true",
            ondragstart: move |evt| {
                let transfer = evt.data_transfer();
                for (key, value) in payload.entries() {
                    if let Err(e) = transfer.set_data(key, value) {
                        log::warn!("drag data rejected for {key}: {e:?}");
                    }
                }
            },

            img {
                src: props.image.to_data_url(),
                alt: "Result",
                draggable: "false",
            }

            div { class: "vellum-row",
                for action in ResultAction::ALL {
                    button {
                        key: "{action:?}",
                        class: "vellum-tool",
                        onclick: move |_| props.on_action.call(action),
                        {action.label()}
                    }
                }
            }
        }
    }
}
