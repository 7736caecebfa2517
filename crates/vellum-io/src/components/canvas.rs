//! The zoomable, pannable image canvas.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::html::input_data::MouseButton as DomButton;
use dioxus::prelude::*;
use vellum_canvas::{HitTarget, ImagePayload, Point, ToolMode, normalize_start};

use super::{ComparatorView, CropOverlay, MaskOverlay, TextLabel, mouse_input, touch_input};
use crate::listeners::{EventListener, ListenerError};
use crate::resize::{self, ResizeWatch};
use crate::session::{BrowserSession, CANVAS_ID, press, refresh_container};

/// DOM listeners owned by a mounted canvas.
struct CanvasWatchers {
    _resize: ResizeWatch,
    _wheel: EventListener,
}

fn install(mut session: Signal<BrowserSession>) -> Result<CanvasWatchers, ListenerError> {
    let element = resize::element_by_id(CANVAS_ID)
        .ok_or_else(|| ListenerError::JsError(format!("#{CANVAS_ID} is not mounted")))?;
    let resize = ResizeWatch::new(&element, move |rect| {
        session.write().set_container(rect);
    })?;
    let target = element.clone();
    let wheel = resize::wheel_listener(&element, move |client, delta| {
        let rect = resize::element_rect(&target);
        let mut s = session.write();
        s.set_container(rect);
        s.wheel(client, delta);
    })?;
    Ok(CanvasWatchers {
        _resize: resize,
        _wheel: wheel,
    })
}

fn forward_mask(session: Signal<BrowserSession>, handler: EventHandler<Point>, client: Point) {
    refresh_container(session);
    let point = session.peek().mask_point(client);
    if let Some(point) = point {
        handler.call(point);
    }
}

/// Props for the [`ImageCanvas`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ImageCanvasProps {
    /// The interaction session this canvas renders and drives.
    session: Signal<BrowserSession>,
    /// The working image.
    image: ImagePayload,
    /// A result to compare the working image against.
    after: Option<ImagePayload>,
    /// Receives natural-pixel positions while painting the mask.
    on_mask_point: EventHandler<Point>,
}

/// The image stage with pan/zoom and the active tool's overlay.
///
/// The container tracks its own size with a `ResizeObserver` and
/// captures the wheel non-passively so zooming never scrolls the page.
/// Presses start gestures on the session; the rest of each gesture is
/// tracked at window level.
#[component]
pub fn ImageCanvas(props: ImageCanvasProps) -> Element {
    let mut session = props.session;
    let on_mask_point = props.on_mask_point;

    let watchers = use_hook(|| Rc::new(RefCell::new(Option::<CanvasWatchers>::None)));
    {
        let watchers = Rc::clone(&watchers);
        use_drop(move || {
            watchers.borrow_mut().take();
            // Unmounted mid-gesture: release the window listeners too.
            if let Ok(mut s) = session.try_write() {
                s.pointer_up();
            }
        });
    }
    let on_mounted = move |_| match install(session) {
        Ok(installed) => *watchers.borrow_mut() = Some(installed),
        Err(e) => log::warn!("canvas listeners unavailable: {e}"),
    };

    let (t, metrics, mode, grabbing, transformed, text_active) = {
        let s = session.read();
        (
            s.transform(),
            s.metrics(),
            s.mode(),
            s.is_gesture_active(),
            s.is_transformed(),
            s.text().is_active(),
        )
    };

    let cursor = match mode {
        ToolMode::Pan if grabbing => "grabbing",
        ToolMode::Pan => "grab",
        ToolMode::MaskPaint => "crosshair",
        _ => "default",
    };
    let stage_style = format!(
        "width: {}px; height: {}px; transform: translate({}px, {}px) scale({});",
        metrics.width, metrics.height, t.x, t.y, t.scale,
    );
    let comparing = mode == ToolMode::CompareSlider && props.after.is_some();
    let src = props.image.to_data_url();

    rsx! {
        div {
            id: CANVAS_ID,
            class: "vellum-canvas",
            style: "cursor: {cursor};",
            onmounted: on_mounted,
            onmousedown: move |evt| {
                evt.prevent_default();
                let raw = mouse_input(&evt);
                if mode == ToolMode::MaskPaint {
                    if let Some(start) = normalize_start(&raw) {
                        forward_mask(session, on_mask_point, start.position);
                    }
                    return;
                }
                press(session, &raw, HitTarget::Canvas);
            },
            onmousemove: move |evt| {
                if mode == ToolMode::MaskPaint && evt.held_buttons().contains(DomButton::Primary) {
                    let p = evt.client_coordinates();
                    forward_mask(session, on_mask_point, Point::new(p.x, p.y));
                }
            },
            ontouchstart: move |evt| {
                press(session, &touch_input(&evt), HitTarget::Canvas);
            },

            if comparing {
                if let Some(after) = props.after.clone() {
                    ComparatorView {
                        session,
                        before: props.image.clone(),
                        after,
                    }
                }
            } else {
                div { class: "vellum-stage", style: "{stage_style}",
                    img {
                        class: "vellum-image",
                        src: "{src}",
                        draggable: "false",
                        alt: "",
                    }
                    MaskOverlay { session }
                    if mode.shows_crop() {
                        CropOverlay { session }
                    }
                    if text_active {
                        TextLabel { session, width: metrics.width }
                    }
                }
            }

            if transformed {
                button {
                    class: "vellum-fit",
                    onmousedown: move |evt| evt.stop_propagation(),
                    onclick: move |_| session.write().reset_view(),
                    "Fit to screen"
                }
            }
        }
    }
}
