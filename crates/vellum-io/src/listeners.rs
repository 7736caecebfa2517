//! Scoped DOM event listeners.
//!
//! Every listener added here is owned by an [`EventListener`] whose
//! `Drop` removes it again, so subscription and teardown always pair up.
//! [`WindowPointerCapture`] builds on that to implement the canvas
//! core's [`PointerCapture`]: window-level move/up listeners exist only
//! while a gesture holds the returned [`CaptureGuard`].
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use vellum_canvas::{MouseButton, Point, PointerCapture, RawPointer};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, EventTarget};

/// Errors raised while installing listeners.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for ListenerError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

type Callback = Closure<dyn FnMut(web_sys::Event)>;

/// A DOM listener that is removed when dropped.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Option<Callback>,
}

impl EventListener {
    /// Listen for `event` on `target`.
    ///
    /// Non-passive listeners may call `preventDefault`, which wheel and
    /// touch-move handlers need to stop page scrolling.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::JsError`] if the browser rejects the listener.
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, ListenerError> {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback: Some(callback),
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, callback.as_ref().unchecked_ref());
        // The listener being removed may be the one currently running
        // (a mouseup ending its own gesture); free it on the next tick.
        wasm_bindgen_futures::spawn_local(async move {
            drop(callback);
        });
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Input delivered to the active gesture by the window listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalPointer {
    /// Mouse or touch moved.
    Move(RawPointer),
    /// Button released, or the touch ended or was cancelled.
    End,
}

type Sink = Rc<dyn Fn(GlobalPointer)>;

/// Window-level pointer capture for the canvas core.
///
/// Clones share the same sink. The sink is connected after the session
/// that owns this surface exists, since it usually writes back into it.
#[derive(Clone, Default)]
pub struct WindowPointerCapture {
    sink: Rc<RefCell<Option<Sink>>>,
}

impl fmt::Debug for WindowPointerCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowPointerCapture")
            .field("connected", &self.sink.borrow().is_some())
            .finish()
    }
}

impl WindowPointerCapture {
    /// Route captured input to `sink`.
    pub fn connect(&self, sink: impl Fn(GlobalPointer) + 'static) {
        *self.sink.borrow_mut() = Some(Rc::new(sink));
    }

    fn emit(sink: &Rc<RefCell<Option<Sink>>>, input: GlobalPointer) {
        // Clone out first so the sink may reconnect or drop the capture.
        let target = sink.borrow().clone();
        if let Some(target) = target {
            target(input);
        }
    }
}

/// Active window listeners for one gesture.
#[derive(Debug)]
pub struct CaptureGuard {
    _listeners: Vec<EventListener>,
}

impl PointerCapture for WindowPointerCapture {
    type Guard = CaptureGuard;
    type Error = ListenerError;

    fn capture(&self) -> Result<CaptureGuard, ListenerError> {
        let window =
            web_sys::window().ok_or_else(|| ListenerError::JsError("no global window".into()))?;
        let target: &EventTarget = window.as_ref();

        let on_mouse_move = {
            let sink = Rc::clone(&self.sink);
            move |event: web_sys::Event| {
                if let Some(raw) = event.dyn_ref::<web_sys::MouseEvent>().map(mouse_raw) {
                    Self::emit(&sink, GlobalPointer::Move(raw));
                }
            }
        };
        let on_touch_move = {
            let sink = Rc::clone(&self.sink);
            move |event: web_sys::Event| {
                if let Some(touch) = event.dyn_ref::<web_sys::TouchEvent>() {
                    event.prevent_default();
                    Self::emit(&sink, GlobalPointer::Move(touch_raw(&touch.touches())));
                }
            }
        };
        let end = |sink: Rc<RefCell<Option<Sink>>>| {
            move |_: web_sys::Event| Self::emit(&sink, GlobalPointer::End)
        };

        let listeners = vec![
            EventListener::new(target, "mousemove", true, on_mouse_move)?,
            EventListener::new(target, "mouseup", true, end(Rc::clone(&self.sink)))?,
            EventListener::new(target, "touchmove", false, on_touch_move)?,
            EventListener::new(target, "touchend", true, end(Rc::clone(&self.sink)))?,
            EventListener::new(target, "touchcancel", true, end(Rc::clone(&self.sink)))?,
        ];
        log::debug!("window pointer capture installed");
        Ok(CaptureGuard {
            _listeners: listeners,
        })
    }
}

/// Convert a DOM mouse event.
#[must_use]
pub fn mouse_raw(event: &web_sys::MouseEvent) -> RawPointer {
    RawPointer::Mouse {
        button: MouseButton::from_dom(event.button()),
        position: Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
    }
}

/// Convert a DOM touch list, keeping order.
#[must_use]
pub fn touch_raw(list: &web_sys::TouchList) -> RawPointer {
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect();
    RawPointer::Touch { touches }
}
