//! Browser-side canvas session.
//!
//! Wraps [`CanvasSession`] in a Dioxus signal and wires the
//! window-level pointer capture back into it, so a gesture started on
//! the canvas keeps tracking after the pointer leaves the element.

use dioxus::prelude::*;
use vellum_canvas::{CanvasConfig, CanvasSession, HitTarget, RawPointer, ToolMode};

use crate::listeners::{GlobalPointer, WindowPointerCapture};
use crate::resize;

/// Canvas session driven by window-level DOM listeners.
pub type BrowserSession = CanvasSession<WindowPointerCapture>;

/// DOM id of the canvas container element.
pub const CANVAS_ID: &str = "vellum-canvas";

/// DOM id of the comparator element.
pub const COMPARATOR_ID: &str = "vellum-comparator";

/// Create the session for this component scope.
///
/// An invalid `config` is logged and replaced by the defaults.
pub fn use_canvas_session(config: CanvasConfig) -> Signal<BrowserSession> {
    let surface = use_hook(WindowPointerCapture::default);
    let session = use_signal({
        let surface = surface.clone();
        move || {
            CanvasSession::new(config, surface.clone()).unwrap_or_else(|e| {
                log::warn!("{e}; using default canvas configuration");
                CanvasSession::with_default_config(surface)
            })
        }
    });

    use_hook(move || {
        surface.connect(move |input| {
            let mut session = session;
            match input {
                GlobalPointer::Move(raw) => {
                    session.write().pointer_move(&raw);
                }
                GlobalPointer::End => {
                    session.write().pointer_up();
                }
            }
        });
    });

    session
}

/// Re-read the canvas container's client rectangle.
///
/// A `ResizeObserver` only reports size changes, so the origin goes stale
/// when the page scrolls or content above the canvas shifts. Anything
/// that converts client coordinates calls this first.
pub fn refresh_container(mut session: Signal<BrowserSession>) {
    if let Some(rect) = resize::rect_by_id(CANVAS_ID)
        && session.peek().container() != rect
    {
        session.write().set_container(rect);
    }
}

/// Whether a press on `target` in `mode` reads the comparator's rectangle.
fn uses_comparator_rect(mode: ToolMode, target: HitTarget) -> bool {
    matches!(target, HitTarget::Comparator) || mode == ToolMode::CompareSlider
}

/// Start a gesture from a press on `target`.
///
/// The element rectangles are re-read first: the page may have scrolled
/// since the last resize notification.
pub fn press(mut session: Signal<BrowserSession>, raw: &RawPointer, target: HitTarget) {
    refresh_container(session);
    let mode = session.peek().mode();
    if uses_comparator_rect(mode, target)
        && let Some(rect) = resize::rect_by_id(COMPARATOR_ID)
    {
        session.write().set_comparator_rect(rect);
    }
    if let Err(e) = session.write().pointer_down(raw, target) {
        log::warn!("pointer capture failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparator_rect_read_for_any_press_while_comparing() {
        assert!(uses_comparator_rect(ToolMode::CompareSlider, HitTarget::Canvas));
        assert!(uses_comparator_rect(ToolMode::CompareSlider, HitTarget::Comparator));
        assert!(uses_comparator_rect(ToolMode::None, HitTarget::Comparator));
        assert!(!uses_comparator_rect(ToolMode::Pan, HitTarget::Canvas));
        assert!(!uses_comparator_rect(ToolMode::CropEdit, HitTarget::Crop(None)));
    }
}
