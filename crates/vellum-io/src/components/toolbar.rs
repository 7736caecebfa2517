//! Tool selection and per-tool controls.

use dioxus::prelude::*;
use vellum_canvas::{MaskMode, ToolMode};

use crate::session::BrowserSession;

/// Props for the [`ToolBar`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ToolBarProps {
    session: Signal<BrowserSession>,
    /// Whether a result exists to compare against.
    can_compare: bool,
}

/// Exclusive tool buttons plus the controls of the active tool.
#[component]
pub fn ToolBar(props: ToolBarProps) -> Element {
    let mut session = props.session;
    let (active, text, mask) = {
        let s = session.read();
        (s.mode(), s.text().state().text.clone(), s.mask().clone())
    };

    rsx! {
        div { class: "vellum-toolbar",
            div { class: "vellum-tools", role: "radiogroup",
                for mode in ToolMode::ALL.into_iter().filter(|m| *m != ToolMode::None) {
                    button {
                        key: "{mode}",
                        class: if mode == active { "vellum-tool active" } else { "vellum-tool" },
                        disabled: mode == ToolMode::CompareSlider && !props.can_compare,
                        onclick: move |_| {
                            // Clicking the active tool turns it off.
                            let next = if session.read().mode() == mode { ToolMode::None } else { mode };
                            session.write().set_tool(next);
                        },
                        "{mode}"
                    }
                }
            }

            match active {
                ToolMode::TextDrag => rsx! {
                    input {
                        class: "vellum-input",
                        r#type: "text",
                        placeholder: "Label text",
                        value: "{text}",
                        oninput: move |evt| session.write().text_mut().set_text(evt.value()),
                    }
                },
                ToolMode::CropEdit => rsx! {
                    button {
                        class: "vellum-tool",
                        onclick: move |_| session.write().reset_crop(),
                        "Reset crop"
                    }
                },
                ToolMode::MaskPaint => rsx! {
                    for mask_mode in [MaskMode::Draw, MaskMode::Erase, MaskMode::Off] {
                        button {
                            key: "{mask_mode:?}",
                            class: if mask.mode == mask_mode { "vellum-tool active" } else { "vellum-tool" },
                            onclick: move |_| session.write().mask_mut().mode = mask_mode,
                            "{mask_mode:?}"
                        }
                    }
                    label { class: "vellum-label",
                        "Brush {mask.brush_size}"
                        input {
                            r#type: "range",
                            min: "1",
                            max: "200",
                            value: "{mask.brush_size}",
                            oninput: move |evt| {
                                if let Ok(size) = evt.value().parse::<f64>() {
                                    session.write().mask_mut().brush_size = size;
                                }
                            },
                        }
                    }
                    button {
                        class: "vellum-tool",
                        disabled: !mask.has_mask(),
                        onclick: move |_| session.write().mask_mut().clear(),
                        "Clear mask"
                    }
                },
                _ => rsx! {},
            }
        }
    }
}
