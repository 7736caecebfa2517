//! Element geometry: bounding rectangles, resize observation, and
//! non-passive wheel capture.

use std::fmt;

use vellum_canvas::{Point, Rect};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::listeners::{EventListener, ListenerError};

/// Look up an element by id.
#[must_use]
pub fn element_by_id(id: &str) -> Option<web_sys::Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

/// The element's client rectangle.
#[must_use]
pub fn element_rect(element: &web_sys::Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

/// The client rectangle of the element with `id`, if it is mounted.
#[must_use]
pub fn rect_by_id(id: &str) -> Option<Rect> {
    element_by_id(id).map(|e| element_rect(&e))
}

/// Observes an element's size; disconnects when dropped.
pub struct ResizeWatch {
    observer: web_sys::ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web_sys::ResizeObserver)>,
}

impl ResizeWatch {
    /// Call `on_resize` with the element's client rectangle whenever its
    /// size changes (and once right after observation starts).
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::JsError`] if the observer cannot be created.
    pub fn new(
        element: &web_sys::Element,
        mut on_resize: impl FnMut(Rect) + 'static,
    ) -> Result<Self, ListenerError> {
        let observed = element.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, web_sys::ResizeObserver)>::new(
            move |_entries: js_sys::Array, _observer: web_sys::ResizeObserver| {
                on_resize(element_rect(&observed));
            },
        );
        let observer = web_sys::ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(element);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ResizeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl fmt::Debug for ResizeWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeWatch").finish_non_exhaustive()
    }
}

/// Capture wheel events on `element`, suppressing page scroll.
///
/// `on_wheel` receives the client pointer position and the vertical
/// delta (positive when scrolling down).
///
/// # Errors
///
/// Returns [`ListenerError::JsError`] if the listener cannot be added.
pub fn wheel_listener(
    element: &web_sys::Element,
    mut on_wheel: impl FnMut(Point, f64) + 'static,
) -> Result<EventListener, ListenerError> {
    EventListener::new(element.as_ref(), "wheel", false, move |event| {
        if let Some(wheel) = event.dyn_ref::<web_sys::WheelEvent>() {
            event.prevent_default();
            let client = Point::new(f64::from(wheel.client_x()), f64::from(wheel.client_y()));
            on_wheel(client, wheel.delta_y());
        }
    })
}
